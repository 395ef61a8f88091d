// Device API payloads
//
// Serde types for the documents a strip controller exchanges. Script
// entries are normalized on ingestion: the firmware reports them either
// as bare filenames or as `{fileName, name}` objects.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque script document. The client never interprets it.
pub type ScriptBody = Value;

// ── Script ──────────────────────────────────────────────────────────

/// A script stored on one device.
///
/// Two scripts are equal iff their filenames match; the display name is
/// ignored for equality and hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ScriptEntry")]
pub struct Script {
    #[serde(rename = "fileName")]
    pub filename: String,
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Script {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            display_name: None,
        }
    }

    pub fn with_name(filename: impl Into<String>, name: impl Into<String>) -> Self {
        Self::from(ScriptEntry::Detailed {
            filename: filename.into(),
            name: Some(name.into()),
        })
    }

    /// Human-readable label: the display name, or the filename.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.filename)
    }
}

impl PartialEq for Script {
    fn eq(&self, other: &Self) -> bool {
        self.filename == other.filename
    }
}

impl Eq for Script {}

impl Hash for Script {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.filename.hash(state);
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScriptEntry {
    Bare(String),
    Detailed {
        #[serde(rename = "fileName")]
        filename: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<ScriptEntry> for Script {
    fn from(entry: ScriptEntry) -> Self {
        match entry {
            ScriptEntry::Bare(filename) => Self::new(filename),
            ScriptEntry::Detailed { filename, name } => Self {
                filename,
                display_name: name.filter(|n| !n.is_empty()),
            },
        }
    }
}

// ── Configuration ───────────────────────────────────────────────────

/// One LED output pin on a controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedPin {
    pub number: u32,
    pub led_count: u32,
    pub reverse: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_brightness: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixels_per_meter: Option<u32>,
}

/// The document returned by `GET /api/config`.
///
/// Keys this type does not model are kept in `extra` so a fetched
/// config can be posted back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_brightness: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmt_offset_minutes: Option<i32>,
    #[serde(default)]
    pub pins: Vec<LedPin>,
    #[serde(default)]
    pub scripts: Vec<Script>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Commands ────────────────────────────────────────────────────────

/// Color in hue/saturation/lightness, as accepted by `/api/color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    pub fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn scripts_accept_strings_and_objects() {
        let config: DeviceConfig = serde_json::from_value(json!({
            "hostname": "kitchen",
            "scripts": [
                "rainbow",
                {"fileName": "fire", "name": "Camp Fire"},
                {"fileName": "ocean", "name": ""}
            ]
        }))
        .unwrap();

        assert_eq!(config.scripts.len(), 3);
        assert_eq!(config.scripts[0].filename, "rainbow");
        assert_eq!(config.scripts[0].label(), "rainbow");
        assert_eq!(config.scripts[1].label(), "Camp Fire");
        assert_eq!(config.scripts[2].display_name, None);
    }

    #[test]
    fn script_equality_ignores_display_name() {
        assert_eq!(Script::with_name("fire", "Camp Fire"), Script::new("fire"));
        assert_ne!(Script::new("fire"), Script::new("ocean"));
    }

    #[test]
    fn unknown_config_keys_round_trip() {
        let raw = json!({
            "hostname": "lanai",
            "brightness": 40,
            "pins": [{"number": 5, "ledCount": 120, "reverse": false, "pixelType": "NEO_GRB"}],
            "scripts": [],
            "customSetting": {"a": 1}
        });
        let config: DeviceConfig = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(config.pins[0].led_count, 120);
        assert_eq!(config.extra.get("customSetting"), Some(&json!({"a": 1})));

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back, raw);
    }
}
