use crate::status::{constants::labels, DeviceStatus};
use std::{fmt::Display, time::Duration};

/// How often a critical banner toggles its marker
pub const BLINK_INTERVAL: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    Error,
    Warning,
    Ok,
    Info,
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Level::Error => "ERROR",
            Level::Warning => "WARN",
            Level::Ok => "OK",
            Level::Info => "INFO",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Indicator {
    SensorHealth,
    Battery,
    Range,
    WeighingMode,
    SamplingMode,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::SensorHealth,
        Indicator::Battery,
        Indicator::Range,
        Indicator::WeighingMode,
        Indicator::SamplingMode,
    ];

    /// Reads the tile for this indicator off a status record.
    pub fn read(self, status: &DeviceStatus) -> Tile {
        use Indicator::*;

        let (label, level) = match self {
            SensorHealth => ("Sensor", alert(status.integrity_error(), Level::Error)),
            Battery => ("Battery", alert(status.battery_low(), Level::Warning)),
            Range => ("Range", alert(status.over_range(), Level::Error)),

            WeighingMode if status.is_tared() => (labels::TARED, Level::Info),
            WeighingMode => ("Gross", Level::Info),

            SamplingMode if status.fast_mode() => (labels::FAST_MODE, Level::Info),
            SamplingMode => ("Normal", Level::Info),
        };

        Tile {
            indicator: self,
            label,
            level,
        }
    }
}

const fn alert(active: bool, level: Level) -> Level {
    if active {
        level
    } else {
        Level::Ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tile {
    pub indicator: Indicator,
    pub label: &'static str,
    pub level: Level,
}

impl Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.label)
    }
}

pub fn full_view(status: &DeviceStatus) -> [Tile; 5] {
    Indicator::ALL.map(|i| i.read(status))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Alert {
    pub label: &'static str,
    pub level: Level,
}

/// Active alerts only, or a single `Ok` entry when there are none.
///
/// Unlike the summary this is not a priority chain: a sensor error and an
/// out of range reading are listed together.
pub fn compact_view(status: &DeviceStatus) -> Vec<Alert> {
    let candidates = [
        (status.integrity_error(), "Sensor error", Level::Error),
        (status.over_range(), labels::OUT_OF_RANGE, Level::Error),
        (status.battery_low(), labels::BATTERY_LOW, Level::Warning),
    ];

    let mut alerts: Vec<Alert> = candidates
        .into_iter()
        .filter(|(active, ..)| *active)
        .map(|(_, label, level)| Alert { label, level })
        .collect();

    if !status.has_critical_error() && !status.has_warning() {
        alerts.push(Alert {
            label: labels::NORMAL,
            level: Level::Ok,
        });
    }

    alerts
}

/// The prominent live indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Banner {
    pub headline: &'static str,
    pub level: Level,
    pub detail: String,
    pub blinks: bool,
}

impl Banner {
    pub fn new(status: &DeviceStatus) -> Self {
        let (headline, level) = if status.integrity_error() {
            ("Sensor error", Level::Error)
        } else if status.over_range() {
            (labels::OUT_OF_RANGE, Level::Error)
        } else if status.battery_low() {
            (labels::BATTERY_LOW, Level::Warning)
        } else {
            (labels::NORMAL, Level::Ok)
        };

        Self {
            headline,
            level,
            detail: status.summary().to_string(),
            blinks: status.has_critical_error(),
        }
    }
}

impl Display for Banner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} ({})", self.level, self.headline, self.detail)
    }
}
