//! Frame format seen by the SPI host.
//!
//! A frame is 11 bytes, sent most significant bit first while CS# is held low. The host sends
//! the command, address and (for writes) data; the bridge answers with zeros, the read data and
//! a status byte at index 10.

use thiserror::Error;

use super::axil::Resp;
use crate::constants::frame::*;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("reply truncated to {len} bytes")]
    Truncated { len: usize },
    #[error("reserved status bits set: {status:#04x}")]
    ReservedBits { status: u8 },
}

/// Supported commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Write,
    Read,
}

impl Command {
    /// Decodes a command byte.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_WRITE => Some(Self::Write),
            CMD_READ => Some(Self::Read),
            _ => None,
        }
    }

    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Write => CMD_WRITE,
            Self::Read => CMD_READ,
        }
    }
}

/// Status byte: `{5'b0, !valid, resp[1:0]}`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    /// The bus transaction completed before the status byte was prepared.
    pub valid: bool,
    /// Response code; stale when not `valid`.
    pub resp: Resp,
}

impl Status {
    pub const fn to_byte(self) -> u8 {
        let not_valid = if self.valid { 0 } else { STATUS_NOT_VALID };
        not_valid | self.resp.bits()
    }

    pub fn from_byte(status: u8) -> Result<Self, FrameError> {
        if status & !(STATUS_NOT_VALID | STATUS_RESP_MASK) != 0 {
            return Err(FrameError::ReservedBits { status });
        }
        Ok(Self { valid: status & STATUS_NOT_VALID == 0, resp: Resp::from_bits(status & STATUS_RESP_MASK) })
    }
}

/// Host request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Write { addr: u32, data: u32 },
    Read { addr: u32 },
}

impl Request {
    pub fn command(&self) -> Command {
        match self {
            Self::Write { .. } => Command::Write,
            Self::Read { .. } => Command::Read,
        }
    }

    /// Encodes the request as the bytes the host sends; unused positions are zero.
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut bytes = [0; FRAME_LEN];
        bytes[CMD_INDEX] = self.command().to_byte();
        match *self {
            Self::Write { addr, data } => {
                bytes[ADDR_FIRST..=ADDR_LAST].copy_from_slice(&addr.to_be_bytes());
                bytes[WDATA_FIRST..=WDATA_LAST].copy_from_slice(&data.to_be_bytes());
            }
            Self::Read { addr } => bytes[ADDR_FIRST..=ADDR_LAST].copy_from_slice(&addr.to_be_bytes()),
        }
        bytes
    }
}

/// Bridge reply, decoded from the bytes the host received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    /// Read data, for read commands.
    pub data: Option<u32>,
    pub status: Status,
}

impl Reply {
    /// Decodes the bytes received during a frame of `command`. Bytes past the frame are ignored.
    pub fn decode(command: Command, bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < FRAME_LEN {
            return Err(FrameError::Truncated { len: bytes.len() });
        }
        let status = Status::from_byte(bytes[STATUS_INDEX])?;
        let data = match command {
            Command::Write => None,
            Command::Read => {
                let mut data = [0; 4];
                data.copy_from_slice(&bytes[RDATA_FIRST..=RDATA_LAST]);
                Some(u32::from_be_bytes(data))
            }
        };
        Ok(Self { data, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_layout() {
        assert_eq!(Request::Write { addr: 0x7654_3210, data: 0x1234_5678 }.to_bytes(), [
            0x00, 0x76, 0x54, 0x32, 0x10, 0x12, 0x34, 0x56, 0x78, 0x00, 0x00
        ]);
        assert_eq!(Request::Read { addr: 0x1234_5678 }.to_bytes(), [
            0x01, 0x12, 0x34, 0x56, 0x78, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00
        ]);
    }

    #[test]
    fn status_byte() {
        assert_eq!(Status { valid: true, resp: Resp::Okay }.to_byte(), 0x00);
        assert_eq!(Status { valid: true, resp: Resp::SlvErr }.to_byte(), 0x02);
        assert_eq!(Status { valid: false, resp: Resp::DecErr }.to_byte(), 0x07);
        assert_eq!(Status::from_byte(0x04).map(|s| s.valid).ok(), Some(false));
        assert!(matches!(Status::from_byte(0x08), Err(FrameError::ReservedBits { status: 0x08 })));
    }

    #[test]
    fn decode_reply() {
        let bytes = [0, 0, 0, 0, 0, 0, 0x12, 0x34, 0x56, 0x78, 0x01];
        let reply = Reply::decode(Command::Read, &bytes).map_err(|e| e.to_string());
        assert_eq!(reply, Ok(Reply { data: Some(0x1234_5678), status: Status { valid: true, resp: Resp::ExOkay } }));
        assert_eq!(Reply::decode(Command::Write, &bytes).ok().and_then(|r| r.data), None);
        assert!(matches!(Reply::decode(Command::Write, &bytes[..10]), Err(FrameError::Truncated { len: 10 })));
    }
}
