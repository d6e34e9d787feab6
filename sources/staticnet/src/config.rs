//! The config module reads the options a caller can set for compilation and wizard composition
//! from a TOML file:
//!
//! ```toml
//! nic-name = "ens3"
//!
//! [features]
//! custom-manifests = true
//! single-cluster = false
//! ```
//!
//! Every key is optional.
use crate::compile::DEFAULT_NIC_NAME;
use crate::reconcile::ViewReconciler;
use crate::wizard::WizardFeatures;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Interface name used in compiled documents and their MAC mappings.
    #[serde(default = "default_nic_name")]
    pub nic_name: String,
    #[serde(default)]
    pub features: WizardFeatures,
}

fn default_nic_name() -> String {
    DEFAULT_NIC_NAME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nic_name: default_nic_name(),
            features: WizardFeatures::default(),
        }
    }
}

impl Config {
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let s = fs::read_to_string(path).context(error::ConfigReadSnafu { path })?;
        toml::from_str(&s).context(error::ConfigParseSnafu { path })
    }

    pub fn reconciler(&self) -> ViewReconciler {
        ViewReconciler::new(self.nic_name.as_str())
    }
}

mod error {
    use snafu::Snafu;
    use std::io;
    use std::path::PathBuf;

    #[derive(Debug, Snafu)]
    #[snafu(visibility(pub(crate)))]
    pub enum Error {
        #[snafu(display("Failed to read config file {}: {}", path.display(), source))]
        ConfigRead { path: PathBuf, source: io::Error },

        #[snafu(display("Failed to parse config file {}: {}", path.display(), source))]
        ConfigParse {
            path: PathBuf,
            source: toml::de::Error,
        },
    }
}

pub use error::Error;
type Result<T> = std::result::Result<T, error::Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_config() {
        let file = write_config(
            r#"
nic-name = "ens3"

[features]
custom-manifests = true
single-cluster = true
"#,
        );
        let config = Config::from_path(file.path()).unwrap();
        assert_eq!(config.nic_name, "ens3");
        assert!(config.features.custom_manifests);
        assert!(config.features.single_cluster);
        assert_eq!(config.reconciler().nic_name(), "ens3");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let file = write_config("");
        assert_eq!(Config::from_path(file.path()).unwrap(), Config::default());
        assert_eq!(Config::default().nic_name, "eth0");
    }

    #[test]
    fn unknown_keys_rejected() {
        for bad in [
            "route-table-id = 100",
            "[features]\noperators = false",
            "nic_name = \"eth1\"",
        ] {
            let file = write_config(bad);
            assert!(matches!(
                Config::from_path(file.path()),
                Err(Error::ConfigParse { .. })
            ));
        }
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_path(dir.path().join("staticnet.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }
}
