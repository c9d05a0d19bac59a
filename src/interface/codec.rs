//! Packet framing on top of a [`ByteLink`]. Buffers are borrowed from the
//! caller for the duration of one call.

use log::{debug, trace, warn};

use super::{ByteLink, LinkError, Maintenance};
use crate::protocol::{
    Checksummable, Command, Header, MachineId, CHECKSUM_LEN, HEADER_LEN, MAX_PAYLOAD_LEN,
};

fn send_all<T>(link: &mut T, bytes: &[u8]) -> Result<(), LinkError>
where
    T: ByteLink + ?Sized,
{
    bytes.iter().try_for_each(|b| link.send_byte(*b))
}

/// Sends `payload` as a data packet and waits for the peer's reply header,
/// which is left in `header` and returned.
///
/// The packet goes out in one attempt. The first byte that fails to send
/// aborts the packet and no reply is awaited. An empty payload goes out as a
/// bare header without a checksum.
pub fn send_packet<T, H>(
    link: &mut T,
    origin: MachineId,
    payload: &[u8],
    header: &mut [u8; HEADER_LEN],
    checksum: &mut [u8; CHECKSUM_LEN],
    hook: &mut H,
) -> Result<Header, LinkError>
where
    T: ByteLink + ?Sized,
    H: Maintenance + ?Sized,
{
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(LinkError::PayloadTooLong { len: payload.len() });
    }

    *header = Header::new(origin, Command::Data, payload.len() as u16).to_bytes();
    *checksum = payload.checksum().to_le_bytes();

    if let Err(e) = send_all(link, &header[..]) {
        warn!("error sending header: {}", e);
        return Err(e);
    }
    if let Err(e) = send_all(link, payload) {
        warn!("error sending data: {}", e);
        return Err(e);
    }
    if !payload.is_empty() {
        if let Err(e) = send_all(link, &checksum[..]) {
            warn!("error sending checksum: {}", e);
            return Err(e);
        }
    }
    debug!("sent {} byte data packet", payload.len());

    recv_exact(link, &mut header[..], hook);
    let reply = Header::from_bytes(header);
    debug!("reply: {:?}", reply.command);
    Ok(reply)
}

/// Sends a header-only packet carrying `command`. Does not wait for a reply.
pub fn send_command<T>(
    link: &mut T,
    origin: MachineId,
    command: Command,
    header: &mut [u8; HEADER_LEN],
) -> Result<(), LinkError>
where
    T: ByteLink + ?Sized,
{
    *header = Header::command(origin, command).to_bytes();
    send_all(link, &header[..])
}

/// Fills `buf` from the link, starting over from the first byte whenever a
/// byte fails. Ticks `hook` once per failed attempt. Never gives up.
pub fn recv_exact<T, H>(link: &mut T, buf: &mut [u8], hook: &mut H)
where
    T: ByteLink + ?Sized,
    H: Maintenance + ?Sized,
{
    loop {
        match fill(link, buf, hook) {
            Ok(()) => return,
            Err(e) => {
                trace!("receive of {} bytes restarting: {}", buf.len(), e);
                hook.tick();
            }
        }
    }
}

fn fill<T, H>(link: &mut T, buf: &mut [u8], hook: &mut H) -> Result<(), LinkError>
where
    T: ByteLink + ?Sized,
    H: Maintenance + ?Sized,
{
    for slot in buf.iter_mut() {
        *slot = link.recv_byte(hook)?;
    }
    Ok(())
}
