// lio_example/src/config.rs

//! Layered configuration: built-in defaults, then a TOML file, then `LIO_*`
//! environment variables.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use lio_core::params::ParamMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables that may override file settings, e.g. `LIO_DATA_DIR`.
const ENV_KEYS: [&str; 4] = ["data_dir", "seed", "log_filter", "output_dir"];

/// # ExampleConfig
/// Everything the `lio-example` binary needs to locate data and configure a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ExampleConfig {
    /// Root directory datasets are stored under.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Seed for the synthetic dataset. `None` draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Where estimated trajectories are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Pipeline parameter overrides, layered over each pipeline's defaults.
    #[serde(default)]
    pub params: ParamMap,
}

fn default_data_dir() -> PathBuf {
    "./lio_data".into()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_output_dir() -> PathBuf {
    "./lio_results".into()
}

impl Default for ExampleConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            seed: None,
            log_filter: default_log_filter(),
            output_dir: default_output_dir(),
            params: ParamMap::new(),
        }
    }
}

impl ExampleConfig {
    /// The provider stack, exposed so callers can add their own layers.
    /// A missing file is not an error; its layer is simply empty.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(ExampleConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("LIO_").only(&ENV_KEYS))
    }

    pub fn load(path: &Path) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use lio_core::params::Param;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = ExampleConfig::load(Path::new("absent.toml"))?;
            assert_eq!(config, ExampleConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "lio.toml",
                r#"
                data_dir = "/data/from_file"
                seed = 7

                [params]
                param2 = 5
                param4 = "five"
                "#,
            )?;
            jail.set_env("LIO_DATA_DIR", "/data/from_env");

            let config = ExampleConfig::load(Path::new("lio.toml"))?;
            assert_eq!(config.data_dir, PathBuf::from("/data/from_env"));
            assert_eq!(config.seed, Some(7));
            assert_eq!(config.log_filter, "info");
            assert_eq!(config.params["param2"], Param::Int(5));
            assert_eq!(config.params["param4"], Param::Str("five".into()));
            Ok(())
        });
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("lio.toml", "scenario = \"nope\"\n")?;
            assert!(ExampleConfig::load(Path::new("lio.toml")).is_err());
            Ok(())
        });
    }
}
