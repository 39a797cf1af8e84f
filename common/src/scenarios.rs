use crate::status::{decode, DeviceStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Scenario {
    pub id: &'static str,
    pub label: &'static str,
    pub status_byte: u8,
}

impl Scenario {
    const fn new(id: &'static str, label: &'static str, status_byte: u8) -> Self {
        Self {
            id,
            label,
            status_byte,
        }
    }

    pub fn status(&self) -> DeviceStatus {
        decode(self.status_byte)
    }
}

/// Demo status bytes, covering every single condition plus the
/// interesting overlaps.
pub static SCENARIOS: [Scenario; 10] = [
    Scenario::new("normal", "Normal - all OK", 0x00),
    Scenario::new("battery_low", "Battery low", 0x20),
    Scenario::new("sensor_error", "Sensor error", 0x02),
    Scenario::new("over_range", "Out of range", 0x04),
    Scenario::new("tare_active", "Tare active (net mode)", 0x08),
    Scenario::new("fast_mode", "Fast mode", 0x10),
    Scenario::new("battery_sensor", "Battery low + sensor error", 0x22),
    Scenario::new("all_errors", "All errors", 0x3F),
    Scenario::new("range_battery", "Over range + battery low", 0x24),
    Scenario::new("tare_fast", "Tare + fast mode", 0x18),
];

pub fn scenario(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Summary;

    #[test]
    fn lookup() {
        assert_eq!(scenario("tare_fast").map(|s| s.status_byte), Some(0x18));
        assert!(scenario("nope").is_none());
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in SCENARIOS.iter().enumerate() {
            assert!(SCENARIOS[i + 1..].iter().all(|b| b.id != a.id), "{}", a.id);
        }
    }

    #[test]
    fn scenarios_decode_as_named() {
        let expect = [
            ("normal", Summary::Normal),
            ("battery_low", Summary::BatteryLow),
            ("sensor_error", Summary::SensorError),
            ("over_range", Summary::OutOfRange),
            ("battery_sensor", Summary::SensorError),
            ("all_errors", Summary::SensorError),
            ("range_battery", Summary::OutOfRange),
        ];

        for (id, summary) in expect {
            assert_eq!(scenario(id).unwrap().status().summary(), summary, "{id}");
        }
    }
}
