use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub seed: Option<u64>,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    pub script: Option<PathBuf>,
}

fn default_max_rounds() -> u32 {
    20
}

pub fn config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("skirmish");
    path.push("skirmish.toml");
    Some(path)
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = config_path() {
            builder = builder.add_source(File::from(path).required(false));
        }
        let builder = builder.add_source(Environment::with_prefix("SKIRMISH").try_parsing(true));

        Self::from_builder(builder)
    }

    fn from_builder(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    #[test]
    fn defaults_without_sources() {
        let settings = Settings::from_builder(Config::builder()).unwrap();

        assert_eq!(
            settings,
            Settings {
                seed: None,
                max_rounds: 20,
                script: None,
            }
        );
    }

    #[test]
    fn reads_toml() {
        let builder = Config::builder().add_source(File::from_str(
            "seed = 7\nmax_rounds = 5\nscript = \"heroes.rhai\"",
            FileFormat::Toml,
        ));
        let settings = Settings::from_builder(builder).unwrap();

        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.max_rounds, 5);
        assert_eq!(settings.script, Some(PathBuf::from("heroes.rhai")));
    }
}
