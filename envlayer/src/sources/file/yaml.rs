//! YAML provider backed by `serde-saphyr`.

use camino::{Utf8Path, Utf8PathBuf};
use figment::{
    Metadata, Profile, Provider,
    error::Kind,
    value::{Dict, Map, Value as FigmentValue},
};
use serde_saphyr::Options;

/// Figment provider for YAML text that has already been read from `path`.
#[derive(Debug, Clone)]
pub struct SaphyrYaml {
    path: Utf8PathBuf,
    contents: String,
}

impl SaphyrYaml {
    /// Wrap `contents` read from `path`.
    #[must_use]
    pub fn new(path: &Utf8Path, contents: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            contents: contents.to_owned(),
        }
    }

    /// YAML 1.2 booleans only, so `yes`/`no` stay strings.
    fn parse_value(&self) -> Result<FigmentValue, serde_saphyr::Error> {
        serde_saphyr::from_str_with_options(
            &self.contents,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
    }
}

impl Provider for SaphyrYaml {
    fn metadata(&self) -> Metadata {
        Metadata::from("Saphyr YAML", self.path.as_std_path())
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let value = self.parse_value().map_err(|err| {
            figment::Error::from(Kind::Message(format!("failed to parse {}: {err}", self.path)))
        })?;
        let actual = value.to_actual();
        let dict = value
            .into_dict()
            .ok_or_else(|| figment::Error::from(Kind::InvalidType(actual, "map".into())))?;
        Ok(Profile::Default.collect(dict))
    }
}
