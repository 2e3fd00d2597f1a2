use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Contents of `site.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    pub version: u32,
    #[serde(default)]
    pub backdrop: BackdropSettings,
    #[serde(default)]
    pub countdown: CountdownSettings,
    /// Replaces the built-in event catalogue when non-empty.
    #[serde(default)]
    pub events: Vec<EventEntry>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BackdropSettings {
    pub fps: Option<f32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub gpu_power: Option<GpuPowerSetting>,
    pub page_height: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuPowerSetting {
    Low,
    High,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CountdownSettings {
    #[serde(
        default = "default_countdown_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub interval: Duration,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            interval: default_countdown_interval(),
        }
    }
}

/// Text given either as a plain string or as an `{ en, hi }` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TextEntry {
    Plain(String),
    Bilingual { en: String, hi: Option<String> },
}

impl TextEntry {
    pub fn english(&self) -> &str {
        match self {
            TextEntry::Plain(text) => text,
            TextEntry::Bilingual { en, .. } => en,
        }
    }

    pub fn hindi(&self) -> Option<&str> {
        match self {
            TextEntry::Plain(_) => None,
            TextEntry::Bilingual { hi, .. } => hi.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventEntry {
    pub id: u32,
    pub title: TextEntry,
    #[serde(default)]
    pub image: String,
    /// Display date, e.g. `March 15, 2024`.
    pub date: String,
    /// Display time, e.g. `6:00 PM`.
    pub time: String,
    pub venue: TextEntry,
    pub description: TextEntry,
    #[serde(default)]
    pub organizer: Option<TextEntry>,
    /// Explicit countdown target (`YYYY-MM-DDTHH:MM:SS`, local time). When
    /// absent the target is derived from `date` and `time`.
    #[serde(default)]
    pub starts_at: Option<String>,
}

fn default_countdown_interval() -> Duration {
    Duration::from_secs(1)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_duration_opt(deserializer).map(|d| d.unwrap_or(default_countdown_interval()))
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_secs(v)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs_f64(v)))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(Visitor)
}

impl SiteConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: SiteConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn event(&self, id: u32) -> Option<&EventEntry> {
        self.events.iter().find(|entry| entry.id == id)
    }

    pub fn surface_size(&self) -> Option<(u32, u32)> {
        match (self.backdrop.width, self.backdrop.height) {
            (Some(width), Some(height)) => Some((width, height)),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        if let Some(fps) = self.backdrop.fps {
            if !fps.is_finite() || fps < 0.0 {
                return Err(ConfigError::Invalid("backdrop.fps must be >= 0".into()));
            }
        }

        if self.backdrop.width.is_some() != self.backdrop.height.is_some() {
            return Err(ConfigError::Invalid(
                "backdrop.width and backdrop.height must be set together".into(),
            ));
        }

        if matches!(self.backdrop.width, Some(0)) || matches!(self.backdrop.height, Some(0)) {
            return Err(ConfigError::Invalid(
                "backdrop dimensions must be greater than zero".into(),
            ));
        }

        if let Some(page_height) = self.backdrop.page_height {
            if !page_height.is_finite() || page_height < 0.0 {
                return Err(ConfigError::Invalid(
                    "backdrop.page_height must be >= 0".into(),
                ));
            }
        }

        if self.countdown.interval.is_zero() {
            return Err(ConfigError::Invalid(
                "countdown.interval must be greater than zero".into(),
            ));
        }

        let mut seen = BTreeSet::new();
        for entry in &self.events {
            if !seen.insert(entry.id) {
                return Err(ConfigError::Invalid(format!(
                    "event id {} is defined more than once",
                    entry.id
                )));
            }

            if entry.title.english().trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "event {} must have an English title",
                    entry.id
                )));
            }

            if entry.date.trim().is_empty() || entry.time.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "event {} must have both a date and a time",
                    entry.id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 1

[backdrop]
fps = 30
width = 1920
height = 1080
gpu_power = "high"

[countdown]
interval = "500ms"

[[events]]
id = 1
title = { en = "Annual Cultural Fest", hi = "वार्षिक सांस्कृतिक उत्सव" }
image = "fest.jpg"
date = "March 15, 2024"
time = "10:00 AM"
venue = "Main Auditorium, NSUT"
description = "Music, dance and drama all day."
organizer = { en = "Cultural Society" }

[[events]]
id = 2
title = "Tech Workshop"
date = "March 20, 2024"
time = "2:00 PM"
venue = "Tech Lab 101"
description = "Hands-on coding sessions."
starts_at = "2024-03-20T14:00:00"
"#;

    #[test]
    fn parses_sample_config() {
        let config = SiteConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.version, 1);
        assert_eq!(config.surface_size(), Some((1920, 1080)));
        assert_eq!(config.backdrop.gpu_power, Some(GpuPowerSetting::High));
        assert_eq!(config.countdown.interval, Duration::from_millis(500));
        assert_eq!(config.events.len(), 2);

        let fest = config.event(1).unwrap();
        assert_eq!(fest.title.english(), "Annual Cultural Fest");
        assert_eq!(fest.title.hindi(), Some("वार्षिक सांस्कृतिक उत्सव"));
        assert_eq!(
            fest.organizer.as_ref().map(TextEntry::english),
            Some("Cultural Society")
        );

        let workshop = config.event(2).unwrap();
        assert_eq!(workshop.title, TextEntry::Plain("Tech Workshop".into()));
        assert!(workshop.image.is_empty());
        assert_eq!(workshop.starts_at.as_deref(), Some("2024-03-20T14:00:00"));
    }

    #[test]
    fn countdown_interval_defaults_to_one_second() {
        let config = SiteConfig::from_toml_str("version = 1").unwrap();
        assert_eq!(config.countdown.interval, Duration::from_secs(1));
        assert!(config.events.is_empty());
        assert_eq!(config.surface_size(), None);
    }

    #[test]
    fn rejects_duplicate_event_ids() {
        let config = r#"
version = 1

[[events]]
id = 3
title = "One"
date = "April 1, 2024"
time = "2:00 PM"
venue = "Hall"
description = "First"

[[events]]
id = 3
title = "Two"
date = "April 2, 2024"
time = "2:00 PM"
venue = "Hall"
description = "Second"
"#;
        let err = SiteConfig::from_toml_str(config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_version_and_half_sizes() {
        assert!(matches!(
            SiteConfig::from_toml_str("version = 2").unwrap_err(),
            ConfigError::Invalid(_)
        ));
        assert!(matches!(
            SiteConfig::from_toml_str("version = 1\n[backdrop]\nwidth = 800\n").unwrap_err(),
            ConfigError::Invalid(_)
        ));
        assert!(matches!(
            SiteConfig::from_toml_str("version = 1\n[countdown]\ninterval = 0\n").unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }

    #[test]
    fn reports_parse_errors() {
        let err = SiteConfig::from_toml_str("version = \"one\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
