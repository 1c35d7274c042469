use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct GameConfiguration {
    /// Chance that a piece counts a given comrade as a friend.
    #[serde(default = "default_friendship_probability")]
    pub friendship_probability: f64,
    /// How long a single combat may take before it is abandoned. Zero waits
    /// forever.
    #[serde(default = "default_combat_timeout_ms")]
    pub combat_timeout_ms: u64,
    /// Prepended to every prompt sent to the narrator, for models that expect
    /// an instruction marker.
    #[serde(default)]
    pub prompt_prefix: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_friendship_probability() -> f64 {
    0.70
}

fn default_combat_timeout_ms() -> u64 {
    60_000
}

impl Default for GameConfiguration {
    fn default() -> Self {
        GameConfiguration {
            friendship_probability: default_friendship_probability(),
            combat_timeout_ms: default_combat_timeout_ms(),
            prompt_prefix: String::new(),
            seed: None,
        }
    }
}

impl GameConfiguration {
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: GameConfiguration =
            toml::from_str(toml_str).map_err(|err| Error::Configuration(err.to_string()))?;
        config.validate()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let toml_str = std::fs::read_to_string(path)
            .map_err(|err| Error::Configuration(format!("{}: {}", path.display(), err)))?;
        Self::from_toml_str(&toml_str)
    }

    pub fn combat_timeout(&self) -> Option<Duration> {
        (self.combat_timeout_ms > 0).then(|| Duration::from_millis(self.combat_timeout_ms))
    }

    pub(crate) fn validate(self) -> Result<Self> {
        if !(0.0..=1.0).contains(&self.friendship_probability) {
            return Err(Error::Configuration(format!(
                "friendship_probability must be within [0, 1], got {}",
                self.friendship_probability
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = GameConfiguration::from_toml_str("").unwrap();
        assert_eq!(config, GameConfiguration::default());
        assert_eq!(config.combat_timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn fields_override_defaults() {
        let config = GameConfiguration::from_toml_str(
            r####"
            friendship_probability = 0.25
            combat_timeout_ms = 0
            prompt_prefix = "### Instruction: "
            seed = 7
            "####,
        )
        .unwrap();
        assert_eq!(config.friendship_probability, 0.25);
        assert_eq!(config.combat_timeout(), None);
        assert_eq!(config.prompt_prefix, "### Instruction: ");
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn probability_out_of_range_is_rejected() {
        let err = GameConfiguration::from_toml_str("friendship_probability = 1.5").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn malformed_toml_is_a_configuration_error() {
        let err = GameConfiguration::from_toml_str("seed = \"seven\"").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
