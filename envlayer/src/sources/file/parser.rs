//! Format-specific parsing for override files.

use camino::Utf8Path;
use figment::{
    Figment,
    providers::{Format, Json, Toml},
};
#[cfg(feature = "json5")]
use figment_json5::Json5;

use crate::{EnvLayerError, EnvLayerResult};

#[cfg(feature = "yaml")]
use super::yaml::SaphyrYaml;

/// File extensions that mark a layer token as an override file.
pub const CONFIG_FILE_EXTENSIONS: [&str; 5] = ["json", "json5", "toml", "yaml", "yml"];

/// Returns `true` when `path` ends in one of [`CONFIG_FILE_EXTENSIONS`].
///
/// The comparison ignores ASCII case.
#[must_use]
pub fn has_config_extension(path: &Utf8Path) -> bool {
    path.extension().is_some_and(|ext| {
        CONFIG_FILE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    })
}

/// Parse configuration data according to the file extension.
///
/// # Errors
///
/// Returns an [`EnvLayerError::File`] if the extension is not supported, its
/// feature is disabled, or TOML validation fails.
pub(super) fn parse_config_by_format(path: &Utf8Path, data: &str) -> EnvLayerResult<Figment> {
    let ext = path.extension().map(str::to_ascii_lowercase);
    let figment = match ext.as_deref() {
        Some("json") => Figment::from(Json::string(data)),
        Some("json5") => {
            #[cfg(feature = "json5")]
            {
                Figment::from(Json5::string(data))
            }
            #[cfg(not(feature = "json5"))]
            {
                return Err(unsupported(path, "json5 feature disabled: enable the 'json5' feature to load this file"));
            }
        }
        Some("yaml" | "yml") => {
            #[cfg(feature = "yaml")]
            {
                Figment::from(SaphyrYaml::new(path, data))
            }
            #[cfg(not(feature = "yaml"))]
            {
                return Err(unsupported(path, "yaml feature disabled: enable the 'yaml' feature to load this file"));
            }
        }
        Some("toml") => {
            // Validate first so parse failures carry this file's path.
            toml::from_str::<toml::Table>(data)
                .map_err(|err| EnvLayerError::file_arc(path, err))?;
            Figment::from(Toml::string(data))
        }
        _ => return Err(unsupported(path, "unsupported configuration file extension")),
    };
    Ok(figment)
}

fn unsupported(path: &Utf8Path, message: &str) -> std::sync::Arc<EnvLayerError> {
    EnvLayerError::file_arc(
        path,
        std::io::Error::new(std::io::ErrorKind::Unsupported, message.to_owned()),
    )
}
