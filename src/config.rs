use std::path::PathBuf;
use std::{env, fs};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::i18n::Locale;

const CONFIG_ENV: &str = "NETGAUGE_CONFIG";
const CONFIG_RELATIVE: &str = ".config/netgauge/config.toml";

/// Persisted preferences. Only the locale survives restarts; everything
/// else is per-session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub locale: Locale,
}

impl Settings {
    /// Loads from disk, falling back to defaults on any failure.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(raw) => Self::parse(&raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Self::default()
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read settings");
                Self::default()
            }
        }
    }

    /// Best-effort write; a failure is logged and otherwise ignored.
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            return;
        };
        let raw = match toml::to_string_pretty(self) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "failed to serialize settings");
                return;
            }
        };
        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), %err, "failed to create settings directory");
                return;
            }
        }
        if let Err(err) = fs::write(&path, raw) {
            warn!(path = %path.display(), %err, "failed to write settings");
        }
    }

    fn parse(raw: &str) -> Self {
        toml::from_str(raw).unwrap_or_else(|err| {
            warn!(%err, "malformed settings file, using defaults");
            Self::default()
        })
    }

    fn path() -> Option<PathBuf> {
        if let Some(explicit) = env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(explicit));
        }
        let home = env::var_os("HOME")?;
        Some(PathBuf::from(home).join(CONFIG_RELATIVE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip() {
        let settings = Settings { locale: Locale::Ar };
        let raw = toml::to_string_pretty(&settings).unwrap();
        let parsed = Settings::parse(&raw);
        assert_eq!(parsed.locale, Locale::Ar);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let parsed = Settings::parse("locale = 12345");
        assert_eq!(parsed.locale, Locale::default());
    }

    #[test]
    fn missing_keys_use_defaults() {
        let parsed = Settings::parse("");
        assert_eq!(parsed.locale, Locale::default());
    }
}
