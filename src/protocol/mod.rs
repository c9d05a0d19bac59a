mod checksum;
mod header;

pub mod types;

pub use checksum::{checksum, Checksum, Checksummable};
pub use header::Header;
pub use types::{Command, MachineId, CHECKSUM_LEN, HEADER_LEN, MAX_PAYLOAD_LEN};
