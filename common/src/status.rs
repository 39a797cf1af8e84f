use clap_num::{maybe_bin, maybe_hex};
use std::{fmt::Display, str::FromStr};
use thiserror::Error as ThisError;

pub mod constants {

    pub mod masks {
        pub const INTEGRITY_ERROR: u8 = 0b0000_0010;
        pub const OVER_RANGE: u8 = 0b0000_0100;
        pub const TARED: u8 = 0b0000_1000;
        pub const FAST_MODE: u8 = 0b0001_0000;
        pub const BATTERY_LOW: u8 = 0b0010_0000;

        /// Bits 0, 6 and 7 carry no meaning
        pub const RESERVED: u8 = 0b1100_0001;
    }

    pub mod labels {
        pub const SENSOR_ERROR: &str = "Sensor error - data not trustworthy";
        pub const OUT_OF_RANGE: &str = "Out of range";
        pub const BATTERY_LOW: &str = "Battery low";
        pub const NORMAL: &str = "Normal";

        pub const TARED: &str = "Net (Tare)";
        pub const FAST_MODE: &str = "Fast Mode";
        pub const MODE_SEPARATOR: &str = " + ";
    }
}

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("status byte out of range: {0} (expected 0..=255)")]
    OutOfRange(i128),

    #[error("invalid status byte {0:?}")]
    Parse(String),
}

/// The condition that dominates a status record.
///
/// Evaluated strictly in declaration order: an integrity failure hides
/// everything below it, and the informational modes only show up when
/// nothing is wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Summary {
    SensorError,
    OutOfRange,
    BatteryLow,
    Modes { tared: bool, fast: bool },
    Normal,
}

impl Summary {
    fn from_flags(
        integrity_error: bool,
        over_range: bool,
        battery_low: bool,
        tared: bool,
        fast: bool,
    ) -> Self {
        if integrity_error {
            Summary::SensorError
        } else if over_range {
            Summary::OutOfRange
        } else if battery_low {
            Summary::BatteryLow
        } else if tared || fast {
            Summary::Modes { tared, fast }
        } else {
            Summary::Normal
        }
    }

    pub const fn is_critical(&self) -> bool {
        matches!(self, Summary::SensorError | Summary::OutOfRange)
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use constants::labels;

        match *self {
            Summary::SensorError => f.write_str(labels::SENSOR_ERROR),
            Summary::OutOfRange => f.write_str(labels::OUT_OF_RANGE),
            Summary::BatteryLow => f.write_str(labels::BATTERY_LOW),
            Summary::Normal => f.write_str(labels::NORMAL),

            Summary::Modes { tared, fast } => {
                let parts = [(tared, labels::TARED), (fast, labels::FAST_MODE)];
                let mut first = true;
                for (_, label) in parts.iter().filter(|(on, _)| *on) {
                    if !first {
                        f.write_str(labels::MODE_SEPARATOR)?;
                    }
                    f.write_str(label)?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Summary {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A decoded device status byte.
///
/// Only [`decode`] builds these, so the derived fields always agree with
/// the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DeviceStatus {
    status_byte: u8,
    integrity_error: bool,
    over_range: bool,
    is_tared: bool,
    fast_mode: bool,
    battery_low: bool,
    has_critical_error: bool,
    has_warning: bool,
    summary: Summary,
}

/// Decodes a raw status byte. Reserved bits are ignored.
pub fn decode(status_byte: u8) -> DeviceStatus {
    use constants::masks;

    let integrity_error = (status_byte & masks::INTEGRITY_ERROR) != 0;
    let over_range = (status_byte & masks::OVER_RANGE) != 0;
    let is_tared = (status_byte & masks::TARED) != 0;
    let fast_mode = (status_byte & masks::FAST_MODE) != 0;
    let battery_low = (status_byte & masks::BATTERY_LOW) != 0;

    DeviceStatus {
        status_byte,
        integrity_error,
        over_range,
        is_tared,
        fast_mode,
        battery_low,
        has_critical_error: integrity_error || over_range,
        has_warning: battery_low,
        summary: Summary::from_flags(
            integrity_error,
            over_range,
            battery_low,
            is_tared,
            fast_mode,
        ),
    }
}

impl DeviceStatus {
    pub const fn status_byte(&self) -> u8 {
        self.status_byte
    }

    pub const fn integrity_error(&self) -> bool {
        self.integrity_error
    }

    pub const fn over_range(&self) -> bool {
        self.over_range
    }

    /// Net (tare) mode is active
    pub const fn is_tared(&self) -> bool {
        self.is_tared
    }

    pub const fn fast_mode(&self) -> bool {
        self.fast_mode
    }

    pub const fn battery_low(&self) -> bool {
        self.battery_low
    }

    /// The measurement itself cannot be trusted.
    pub const fn has_critical_error(&self) -> bool {
        self.has_critical_error
    }

    pub const fn has_warning(&self) -> bool {
        self.has_warning
    }

    pub const fn summary(&self) -> Summary {
        self.summary
    }
}

impl From<u8> for DeviceStatus {
    fn from(v: u8) -> Self {
        decode(v)
    }
}

impl From<DeviceStatus> for u8 {
    fn from(s: DeviceStatus) -> Self {
        s.status_byte
    }
}

macro_rules! try_from_wide {
    ($($t:ty),*) => {$(
        impl TryFrom<$t> for DeviceStatus {
            type Error = DecodeError;

            fn try_from(v: $t) -> Result<Self, Self::Error> {
                u8::try_from(v)
                    .map(decode)
                    .map_err(|_| DecodeError::OutOfRange(i128::from(v)))
            }
        }
    )*};
}

try_from_wide!(i16, u16, i32, u32, i64);

impl Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:02X}: {}", self.status_byte, self.summary)
    }
}

/// Parses a status byte written in decimal, `0x` hex or `0b` binary.
///
/// Anything that reads as a number but doesn't fit a byte, including
/// negative values, is `OutOfRange` rather than `Parse`.
pub fn parse_status_byte(s: &str) -> Result<u8, DecodeError> {
    let t = s.trim();

    let (negative, magnitude) = match t.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, t),
    };

    let v = if magnitude.starts_with("0b") {
        maybe_bin::<u128>(magnitude)
    } else {
        maybe_hex::<u128>(magnitude)
    }
    .map_err(|_| DecodeError::Parse(s.to_owned()))?;

    let v = i128::try_from(v).unwrap_or(i128::MAX);
    let v = if negative { -v } else { v };

    u8::try_from(v).map_err(|_| DecodeError::OutOfRange(v))
}

impl FromStr for DeviceStatus {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_status_byte(s).map(decode)
    }
}
