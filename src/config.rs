use crate::protocol::MachineId;

/// Polls spent waiting on the peer while sending a bit, per wait.
pub const WRITE_TIMEOUT: u32 = 4000;

/// Polls spent waiting for the sender to release its line after we
/// acknowledged a bit.
pub const RELEASE_TIMEOUT: u32 = 4000;

/// Polls spent waiting for the next bit to start. The calculator can sit
/// idle between packets for as long as the user likes, so this is an order
/// of magnitude longer than the other waits.
pub const ENTER_TIMEOUT: u32 = 30000;

/// Link settings. Timeouts are counted in line polls, not wall time.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LinkConfig {
    pub machine_id: MachineId,
    pub write_timeout: u32,
    pub release_timeout: u32,
    pub enter_timeout: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            machine_id: MachineId::Pc84,
            write_timeout: WRITE_TIMEOUT,
            release_timeout: RELEASE_TIMEOUT,
            enter_timeout: ENTER_TIMEOUT,
        }
    }
}

impl LinkConfig {
    pub const fn with_machine_id(mut self, machine_id: MachineId) -> Self {
        self.machine_id = machine_id;
        self
    }

    pub const fn with_write_timeout(mut self, polls: u32) -> Self {
        self.write_timeout = polls;
        self
    }

    pub const fn with_release_timeout(mut self, polls: u32) -> Self {
        self.release_timeout = polls;
        self
    }

    pub const fn with_enter_timeout(mut self, polls: u32) -> Self {
        self.enter_timeout = polls;
        self
    }
}
