use serde::Serialize;
use std::io::{self, Write};
use torquemon_common::{
    indicators::{compact_view, full_view, Alert, Banner, Tile},
    scenarios::Scenario,
    DeviceStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    status: &'a DeviceStatus,
    banner: Banner,

    #[serde(skip_serializing_if = "Option::is_none")]
    indicators: Option<[Tile; 5]>,

    #[serde(skip_serializing_if = "Option::is_none")]
    alerts: Option<Vec<Alert>>,
}

#[derive(Serialize)]
struct ScenarioReport<'a> {
    scenario: &'a Scenario,
    status: DeviceStatus,
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub format: Format,
    pub compact: bool,
}

impl Renderer {
    /// Banner plus either the indicator tiles or the compact alerts.
    pub fn status(&self, w: &mut impl Write, status: &DeviceStatus) -> io::Result<()> {
        let banner = Banner::new(status);

        match self.format {
            Format::Json => {
                let report = Report {
                    status,
                    banner,
                    indicators: (!self.compact).then(|| full_view(status)),
                    alerts: self.compact.then(|| compact_view(status)),
                };
                json_line(w, &report)
            }

            Format::Text => {
                writeln!(w, "{}  {banner}", byte_text(status.status_byte()))?;

                if self.compact {
                    for a in compact_view(status) {
                        write!(w, "  [{}] {}", a.level, a.label)?;
                    }
                } else {
                    for t in full_view(status) {
                        write!(w, "  {t}")?;
                    }
                }
                writeln!(w)
            }
        }
    }

    /// One line per record, for listing many of them.
    pub fn line(&self, w: &mut impl Write, status: &DeviceStatus) -> io::Result<()> {
        match self.format {
            Format::Json => json_line(w, status),
            Format::Text => writeln!(
                w,
                "{}  {}",
                byte_text(status.status_byte()),
                status.summary()
            ),
        }
    }

    pub fn scenario(&self, w: &mut impl Write, scenario: &Scenario) -> io::Result<()> {
        let status = scenario.status();

        match self.format {
            Format::Json => json_line(w, &ScenarioReport { scenario, status }),
            Format::Text => writeln!(
                w,
                "{:<16}0x{:02X}  {:<28}{}",
                scenario.id,
                scenario.status_byte,
                scenario.label,
                status.summary()
            ),
        }
    }

    /// Redraws the critical marker of a blinking banner.
    pub fn blink(&self, w: &mut impl Write, status: &DeviceStatus, lit: bool) -> io::Result<()> {
        if self.format != Format::Text {
            return Ok(());
        }

        let marker = if lit { '*' } else { ' ' };
        writeln!(w, "{marker} {}", Banner::new(status))
    }
}

pub fn byte_text(b: u8) -> String {
    format!("0x{b:02X} 0b{b:08b}")
}

fn json_line(w: &mut impl Write, value: &impl Serialize) -> io::Result<()> {
    serde_json::to_writer(&mut *w, value)?;
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use torquemon_common::decode;

    fn render(r: Renderer, b: u8) -> String {
        let mut out = vec![];
        r.status(&mut out, &decode(b)).unwrap();
        String::from_utf8(out).unwrap()
    }

    const TEXT: Renderer = Renderer {
        format: Format::Text,
        compact: false,
    };

    #[test]
    fn byte_formats() {
        assert_eq!(byte_text(0x22), "0x22 0b00100010");
        assert_eq!(byte_text(0), "0x00 0b00000000");
    }

    #[test]
    fn text_full_view() {
        let s = render(TEXT, 0x22);
        assert!(s.starts_with("0x22 0b00100010  [ERROR] Sensor error"));
        assert!(s.contains("[WARN] Battery"));
        assert!(s.contains("[INFO] Gross"));
    }

    #[test]
    fn text_compact_view() {
        let r = Renderer {
            compact: true,
            ..TEXT
        };
        let s = render(r, 0x18);
        assert!(s.contains("[OK] Normal"));
        assert!(!s.contains("Gross"));
    }

    #[test]
    fn json_report() {
        let r = Renderer {
            format: Format::Json,
            compact: false,
        };
        let v: serde_json::Value = serde_json::from_str(&render(r, 0x18)).unwrap();

        assert_eq!(v["statusByte"], 0x18);
        assert_eq!(v["summary"], "Net (Tare) + Fast Mode");
        assert_eq!(v["banner"]["blinks"], false);
        assert_eq!(v["indicators"].as_array().map(Vec::len), Some(5));
        assert!(v.get("alerts").is_none());
    }

    #[test]
    fn blink_toggles_marker() {
        let s = decode(0x04);
        let mut out = vec![];
        TEXT.blink(&mut out, &s, true).unwrap();
        TEXT.blink(&mut out, &s, false).unwrap();

        let out = String::from_utf8(out).unwrap();
        let mut lines = out.lines();
        assert!(lines.next().unwrap().starts_with("* [ERROR] Out of range"));
        assert!(lines.next().unwrap().starts_with("  [ERROR] Out of range"));
    }
}
