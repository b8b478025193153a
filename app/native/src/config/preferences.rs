//! User preferences for automatic tiling.
//!
//! Preferences live in the durable store under a single key and are read
//! fresh for every decision. The stored form is a flat JSON object:
//!
//! ```json
//! {
//!   "auto_tiling": true,
//!   "master_window": "none",
//!   "master_ratio": "50%",
//!   "padding": "10"
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Where the master window is anchored on a display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MasterWindow {
    /// Left edge on landscape displays, top edge on portrait ones.
    Start,
    /// Right edge on landscape displays, bottom edge on portrait ones.
    End,
    /// No master window; every window goes into the grid.
    #[default]
    None,
}

impl MasterWindow {
    /// Returns `true` if a master window is reserved.
    #[must_use]
    pub const fn is_enabled(self) -> bool { !matches!(self, Self::None) }
}

/// Share of the display given to the master window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum MasterRatio {
    /// 33% of the display.
    #[serde(rename = "33%")]
    OneThird,
    /// 50% of the display.
    #[default]
    #[serde(rename = "50%")]
    Half,
    /// 66% of the display.
    #[serde(rename = "66%")]
    TwoThirds,
}

impl MasterRatio {
    /// Returns the ratio as a fraction.
    #[must_use]
    pub const fn fraction(self) -> f64 {
        match self {
            Self::OneThird => 0.33,
            Self::Half => 0.5,
            Self::TwoThirds => 0.66,
        }
    }
}

/// Space between windows and around the display edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Padding {
    /// 10 pixels.
    #[default]
    #[serde(rename = "10")]
    Small,
    /// 20 pixels.
    #[serde(rename = "20")]
    Medium,
    /// 30 pixels.
    #[serde(rename = "30")]
    Large,
    /// No padding.
    #[serde(rename = "none")]
    None,
}

impl Padding {
    /// Returns the padding in pixels.
    #[must_use]
    pub const fn pixels(self) -> i32 {
        match self {
            Self::Small => 10,
            Self::Medium => 20,
            Self::Large => 30,
            Self::None => 0,
        }
    }
}

/// The four user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UserPreferences {
    /// Whether windows are tiled automatically as they come and go.
    pub auto_tiling: bool,

    /// Master window anchor.
    pub master_window: MasterWindow,

    /// Master window share.
    pub master_ratio: MasterRatio,

    /// Window padding.
    pub padding: Padding,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            auto_tiling: true,
            master_window: MasterWindow::default(),
            master_ratio: MasterRatio::default(),
            padding: Padding::default(),
        }
    }
}

/// Names one of the user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    AutoTiling,
    MasterWindow,
    MasterRatio,
    Padding,
}

impl PreferenceKey {
    /// All keys, in stored order.
    pub const ALL: [Self; 4] = [Self::AutoTiling, Self::MasterWindow, Self::MasterRatio, Self::Padding];

    /// Returns the stored field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutoTiling => "auto_tiling",
            Self::MasterWindow => "master_window",
            Self::MasterRatio => "master_ratio",
            Self::Padding => "padding",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for PreferenceKey {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| PreferenceError::UnknownKey(s.to_string()))
    }
}

/// Errors from parsing a preference name or value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    /// No preference has this name.
    #[error("unknown preference: {0}")]
    UnknownKey(String),

    /// The value is not one the preference accepts.
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: PreferenceKey, value: String },
}

/// Outcome of normalising a stored preferences object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// The parsed preferences, with defaults filled in.
    pub preferences: UserPreferences,

    /// `true` if the stored object differs from the canonical form and
    /// should be written back.
    pub changed: bool,
}

impl UserPreferences {
    /// Parses a stored preferences object one key at a time.
    ///
    /// Unknown keys are dropped; missing or unparsable keys take their
    /// defaults. Values wrapped as `{"value": ...}` are unwrapped.
    #[must_use]
    pub fn normalize(stored: &Value) -> Normalized {
        let defaults = Self::default();
        let Some(object) = stored.as_object() else {
            return Normalized { preferences: defaults, changed: true };
        };

        let preferences = Self {
            auto_tiling: field(object, PreferenceKey::AutoTiling).unwrap_or(defaults.auto_tiling),
            master_window: field(object, PreferenceKey::MasterWindow)
                .unwrap_or(defaults.master_window),
            master_ratio: field(object, PreferenceKey::MasterRatio).unwrap_or(defaults.master_ratio),
            padding: field(object, PreferenceKey::Padding).unwrap_or(defaults.padding),
        };

        let changed = preferences.to_value() != *stored;
        Normalized { preferences, changed }
    }

    /// Returns the canonical stored form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(PreferenceKey::AutoTiling.to_string(), Value::Bool(self.auto_tiling));
        object.insert(PreferenceKey::MasterWindow.to_string(), enum_value(&self.master_window));
        object.insert(PreferenceKey::MasterRatio.to_string(), enum_value(&self.master_ratio));
        object.insert(PreferenceKey::Padding.to_string(), enum_value(&self.padding));
        Value::Object(object)
    }
}

fn field<T: serde::de::DeserializeOwned>(object: &Map<String, Value>, key: PreferenceKey) -> Option<T> {
    let raw = object.get(key.as_str())?;
    let raw = raw.get("value").unwrap_or(raw);
    serde_json::from_value(raw.clone()).ok()
}

fn enum_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = UserPreferences::default();
        assert!(prefs.auto_tiling);
        assert_eq!(prefs.master_window, MasterWindow::None);
        assert_eq!(prefs.master_ratio, MasterRatio::Half);
        assert_eq!(prefs.padding, Padding::Small);
    }

    #[test]
    fn test_canonical_form() {
        assert_eq!(
            UserPreferences::default().to_value(),
            json!({
                "auto_tiling": true,
                "master_window": "none",
                "master_ratio": "50%",
                "padding": "10"
            })
        );
    }

    #[test]
    fn test_serde_matches_canonical_form() {
        let prefs = UserPreferences {
            auto_tiling: false,
            master_window: MasterWindow::End,
            master_ratio: MasterRatio::TwoThirds,
            padding: Padding::None,
        };

        assert_eq!(serde_json::to_value(prefs).unwrap(), prefs.to_value());
    }

    #[test]
    fn test_padding_pixels() {
        assert_eq!(Padding::Small.pixels(), 10);
        assert_eq!(Padding::Medium.pixels(), 20);
        assert_eq!(Padding::Large.pixels(), 30);
        assert_eq!(Padding::None.pixels(), 0);
    }

    #[test]
    fn test_ratio_fraction() {
        assert!((MasterRatio::OneThird.fraction() - 0.33).abs() < f64::EPSILON);
        assert!((MasterRatio::Half.fraction() - 0.5).abs() < f64::EPSILON);
        assert!((MasterRatio::TwoThirds.fraction() - 0.66).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_canonical_is_unchanged() {
        let stored = json!({
            "auto_tiling": false,
            "master_window": "start",
            "master_ratio": "33%",
            "padding": "30"
        });

        let result = UserPreferences::normalize(&stored);
        assert!(!result.changed);
        assert_eq!(result.preferences.master_window, MasterWindow::Start);
        assert_eq!(result.preferences.master_ratio, MasterRatio::OneThird);
        assert_eq!(result.preferences.padding, Padding::Large);
        assert!(!result.preferences.auto_tiling);
    }

    #[test]
    fn test_normalize_prunes_unknown_keys() {
        let stored = json!({
            "auto_tiling": true,
            "master_window": "none",
            "master_ratio": "50%",
            "padding": "10",
            "rate_extension": true
        });

        let result = UserPreferences::normalize(&stored);
        assert!(result.changed);
        assert_eq!(result.preferences, UserPreferences::default());
        assert!(result.preferences.to_value().get("rate_extension").is_none());
    }

    #[test]
    fn test_normalize_fills_missing_and_invalid_keys() {
        let stored = json!({ "master_window": "end", "padding": "15" });

        let result = UserPreferences::normalize(&stored);
        assert!(result.changed);
        assert_eq!(result.preferences.master_window, MasterWindow::End);
        assert_eq!(result.preferences.padding, Padding::Small);
        assert!(result.preferences.auto_tiling);
    }

    #[test]
    fn test_normalize_unwraps_value_objects() {
        let stored = json!({
            "auto_tiling": { "type": "checkbox", "value": false },
            "padding": { "value": "20" }
        });

        let result = UserPreferences::normalize(&stored);
        assert!(result.changed);
        assert!(!result.preferences.auto_tiling);
        assert_eq!(result.preferences.padding, Padding::Medium);
    }

    #[test]
    fn test_normalize_non_object() {
        let result = UserPreferences::normalize(&Value::Null);
        assert!(result.changed);
        assert_eq!(result.preferences, UserPreferences::default());
    }

    #[test]
    fn test_preference_key_parsing() {
        assert_eq!("master_ratio".parse::<PreferenceKey>(), Ok(PreferenceKey::MasterRatio));
        assert_eq!(
            "rate_extension".parse::<PreferenceKey>(),
            Err(PreferenceError::UnknownKey("rate_extension".to_string()))
        );
    }
}
