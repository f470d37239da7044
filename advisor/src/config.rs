//! Advisor configuration.
//!
//! Every field has a default that reproduces the fixed artifact paths, so a
//! config file is optional. Relative paths resolve against the working
//! directory.

use std::path::{Path, PathBuf};

use northstar_params::RangePolicy;
use serde::Deserialize;
use thiserror::Error;

/// Default model artifact path.
pub const MODEL_PATH: &str = "best_model_smote.json";

/// Default media asset path.
pub const VIDEO_PATH: &str = "static/Video.mp4";

/// Environment variable naming a config file when none is passed explicitly.
pub const CONFIG_ENV: &str = "NORTHSTAR_CONFIG";

/// Largest accepted `probability_precision`.
const MAX_PRECISION: usize = 15;

/// Errors raised while reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file cannot be read.
    #[error("cannot read config {}: {source}", path.display())]
    Unreadable {
        /// Config path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid advisor TOML.
    #[error("invalid config {}: {reason}", path.display())]
    Invalid {
        /// Config path.
        path: PathBuf,
        /// Parse or validation failure.
        reason: String,
    },
}

/// Runtime settings for the advisor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdvisorConfig {
    /// Pipeline artifact location.
    pub model_path: PathBuf,
    /// Video embedded at the top of the page.
    pub video_path: PathBuf,
    /// What numeric widgets do with out-of-range input.
    pub out_of_range: RangePolicy,
    /// Decimal places shown for the success probability.
    pub probability_precision: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(MODEL_PATH),
            video_path: PathBuf::from(VIDEO_PATH),
            out_of_range: RangePolicy::Reject,
            probability_precision: 5,
        }
    }
}

impl AdvisorConfig {
    /// Parses a TOML document. `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for malformed TOML, unknown keys, or
    /// a precision above 15.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: AdvisorConfig = toml::from_str(text).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if config.probability_precision > MAX_PRECISION {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                reason: format!(
                    "probability_precision must be at most {}, got {}",
                    MAX_PRECISION, config.probability_precision
                ),
            });
        }
        Ok(config)
    }

    /// Reads a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unreadable`] if the file cannot be read and
    /// [`ConfigError::Invalid`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text, path)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolves the effective config: `explicit` if given, otherwise the
    /// file named by `NORTHSTAR_CONFIG`, otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Propagates [`AdvisorConfig::load`] errors for the chosen file.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => match std::env::var_os(CONFIG_ENV) {
                Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Applies command-line overrides on top of the file values.
    #[must_use]
    pub fn with_overrides(mut self, model: Option<PathBuf>, video: Option<PathBuf>) -> Self {
        if let Some(model) = model {
            self.model_path = model;
        }
        if let Some(video) = video {
            self.video_path = video;
        }
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_fixed_paths() {
        let config = AdvisorConfig::default();
        assert_eq!(config.model_path, PathBuf::from("best_model_smote.json"));
        assert_eq!(config.video_path, PathBuf::from("static/Video.mp4"));
        assert_eq!(config.out_of_range, RangePolicy::Reject);
        assert_eq!(config.probability_precision, 5);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = AdvisorConfig::from_toml(
            "model_path = \"models/m.json\"\nout_of_range = \"clamp\"\n",
            Path::new("advisor.toml"),
        )
        .unwrap();
        assert_eq!(config.model_path, PathBuf::from("models/m.json"));
        assert_eq!(config.video_path, PathBuf::from(VIDEO_PATH));
        assert_eq!(config.out_of_range, RangePolicy::Clamp);
    }

    #[test]
    fn unknown_keys_and_bad_precision_are_rejected() {
        let err = AdvisorConfig::from_toml("modle_path = \"x\"", Path::new("a.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        let err = AdvisorConfig::from_toml("probability_precision = 40", Path::new("a.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("at most 15"));
    }

    #[test]
    fn overrides_win() {
        let config = AdvisorConfig::default().with_overrides(Some(PathBuf::from("m.json")), None);
        assert_eq!(config.model_path, PathBuf::from("m.json"));
        assert_eq!(config.video_path, PathBuf::from(VIDEO_PATH));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = AdvisorConfig::load(Path::new("/nonexistent/northstar.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.toml");
        std::fs::write(&path, "probability_precision = 3\n").unwrap();
        let config = AdvisorConfig::resolve(Some(path.as_path())).unwrap();
        assert_eq!(config.probability_precision, 3);
        assert_eq!(config.model_path, PathBuf::from(MODEL_PATH));
    }

    // The only test that touches NORTHSTAR_CONFIG.
    #[test]
    fn environment_fallback_order() {
        let dir = tempfile::tempdir().unwrap();
        let from_env = dir.path().join("env.toml");
        let explicit = dir.path().join("explicit.toml");
        std::fs::write(&from_env, "out_of_range = \"clamp\"\n").unwrap();
        std::fs::write(&explicit, "video_path = \"clip.mp4\"\n").unwrap();

        std::env::remove_var(CONFIG_ENV);
        assert_eq!(AdvisorConfig::resolve(None).unwrap(), AdvisorConfig::default());

        std::env::set_var(CONFIG_ENV, &from_env);
        let config = AdvisorConfig::resolve(None).unwrap();
        assert_eq!(config.out_of_range, RangePolicy::Clamp);

        let config = AdvisorConfig::resolve(Some(explicit.as_path())).unwrap();
        assert_eq!(config.video_path, PathBuf::from("clip.mp4"));
        assert_eq!(config.out_of_range, RangePolicy::Reject);

        std::env::set_var(CONFIG_ENV, "");
        assert_eq!(AdvisorConfig::resolve(None).unwrap(), AdvisorConfig::default());

        std::env::set_var(CONFIG_ENV, dir.path().join("absent.toml"));
        let err = AdvisorConfig::resolve(None).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));

        std::env::remove_var(CONFIG_ENV);
    }
}
