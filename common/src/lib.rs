pub mod indicators;
pub mod scenarios;
pub mod status;

pub use status::{decode, parse_status_byte, DecodeError, DeviceStatus, Summary};
