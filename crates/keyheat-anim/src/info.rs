#![forbid(unsafe_code)]

//! `--ckb-info` metadata block.
//!
//! One directive per line. Free-text fields are percent-encoded so that a
//! field never contains a space.

use std::io::{self, Write};

use keyheat_fx::config::{FADE_TIME, MAX_FADE_TIME};
use keyheat_fx::{PARAMS, ParamKind, ParamSpec};

pub const NAME: &str = "Enhanced Heat Map";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COPYRIGHT_YEAR: &str = "2026";
pub const COPYRIGHT_OWNER: &str = "keyheat developers";
pub const LICENSE: &str = "MIT";
pub const GUID: &str = "{4545e97a-0ec5-474e-a0f1-e808a3555fa2}";
pub const DESCRIPTION: &str = "Keys light up when pressed and cool down over time. \
Keys pressed repeatedly build up heat and stay lit longer, so the most used keys glow the longest.";

const PRESET_NAME: &str = "Individual Keys";

fn enc(text: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(text)
}

/// Format one parameter declaration line.
#[must_use]
pub fn param_line(spec: &ParamSpec) -> String {
    match spec.kind {
        ParamKind::Long { default, min, max } => format!(
            "param long {} {} {} {default} {min} {max}",
            spec.name,
            enc(spec.label),
            enc(spec.unit)
        ),
        ParamKind::AGradient { default } => format!(
            "param agradient {} {} {} {default}",
            spec.name,
            enc(spec.label),
            enc(spec.unit)
        ),
    }
}

fn default_of(name: &str) -> Option<i64> {
    PARAMS.iter().find(|p| p.name == name).and_then(|p| match p.kind {
        ParamKind::Long { default, .. } => Some(default),
        ParamKind::AGradient { .. } => None,
    })
}

/// Write the whole metadata block, terminated by `end`.
pub fn write_info<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out, "name {}", enc(NAME))?;
    writeln!(out, "version {}", enc(VERSION))?;
    writeln!(out, "copyright {} {}", enc(COPYRIGHT_YEAR), enc(COPYRIGHT_OWNER))?;
    writeln!(out, "license {}", enc(LICENSE))?;
    writeln!(out, "guid {GUID}")?;
    writeln!(out, "description {}", enc(DESCRIPTION))?;
    for spec in &PARAMS {
        writeln!(out, "{}", param_line(spec))?;
    }
    writeln!(out, "kpmode name")?;
    writeln!(out, "time absolute")?;
    writeln!(out, "repeat off")?;
    writeln!(out, "parammode static")?;

    write!(out, "preset {}", enc(PRESET_NAME))?;
    for name in [FADE_TIME, MAX_FADE_TIME] {
        if let Some(default) = default_of(name) {
            write!(out, " {name}={default}")?;
        }
    }
    // Trigger on key presses only, never on animation start.
    writeln!(out, " trigger=0 kptrigger=1")?;

    writeln!(out, "end")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info_text() -> String {
        let mut buf = Vec::new();
        write_info(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn block_is_framed_and_space_free_per_field() {
        let text = info_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&"name Enhanced%20Heat%20Map"));
        assert_eq!(lines.last(), Some(&"end"));
        assert!(lines.contains(&"guid {4545e97a-0ec5-474e-a0f1-e808a3555fa2}"));
        assert!(lines.contains(&"license MIT"));
        assert!(lines.contains(&"copyright 2026 keyheat%20developers"));
        let description = lines
            .iter()
            .find(|l| l.starts_with("description "))
            .unwrap();
        assert_eq!(description.split(' ').count(), 2);
    }

    #[test]
    fn declares_every_parameter_in_order() {
        let text = info_text();
        let params: Vec<&str> = text.lines().filter(|l| l.starts_with("param ")).collect();
        assert_eq!(
            params,
            [
                "param agradient fadecolor Fade%20color%3A  ffff0000",
                "param long fadetime Fade%20time%3A ms 500 0 9999999",
                "param long maxfadetime Max%20fade%20time%3A s 30 0 99999",
                "param long pressestomaxintensity Presses%20to%20max%3A key%20presses 5 1 999",
            ]
        );
    }

    #[test]
    fn modes_and_preset() {
        let text = info_text();
        for line in ["kpmode name", "time absolute", "repeat off", "parammode static"] {
            assert!(text.lines().any(|l| l == line), "missing {line}");
        }
        assert!(text.lines().any(
            |l| l == "preset Individual%20Keys fadetime=500 maxfadetime=30 trigger=0 kptrigger=1"
        ));
    }

    #[test]
    fn labels_decode_back() {
        for spec in &PARAMS {
            let line = param_line(spec);
            let label = line.split(' ').nth(3).unwrap();
            assert_eq!(urlencoding::decode(label).unwrap(), spec.label);
        }
    }
}
