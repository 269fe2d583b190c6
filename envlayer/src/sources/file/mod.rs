//! Loading override files named by layer tokens.

mod parser;
#[cfg(feature = "yaml")]
mod yaml;

use camino::Utf8Path;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::value::ConfigValue;
use crate::{EnvLayerError, EnvLayerResult};

pub use parser::{CONFIG_FILE_EXTENSIONS, has_config_extension};
#[cfg(feature = "yaml")]
pub use yaml::SaphyrYaml;

/// Turns a path into a mapping of settings.
pub trait FileLoader {
    /// Load `path` as a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`EnvLayerError::File`] when the file cannot be read or parsed.
    fn load(&self, path: &Utf8Path) -> EnvLayerResult<ConfigValue>;
}

impl<T: FileLoader + ?Sized> FileLoader for &T {
    fn load(&self, path: &Utf8Path) -> EnvLayerResult<ConfigValue> {
        (**self).load(path)
    }
}

/// Reads files from disk and parses them by extension.
///
/// JSON and TOML are always available; JSON5 and YAML require the `json5` and
/// `yaml` features. The top level of every file must be a table/object.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLoader;

impl FileLoader for FsLoader {
    fn load(&self, path: &Utf8Path) -> EnvLayerResult<ConfigValue> {
        let data =
            std::fs::read_to_string(path).map_err(|err| EnvLayerError::file_arc(path, err))?;
        let figment = parser::parse_config_by_format(path, &data)?;
        let value: JsonValue = figment
            .extract()
            .map_err(|err| EnvLayerError::file_arc(path, err))?;
        debug!(path = %path, "loaded configuration file");
        Ok(ConfigValue::from(value))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Context, Result};
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use serde_json::json;

    use super::{FileLoader, FsLoader};
    use crate::EnvLayerError;

    fn scratch_file(name: &str, contents: &str) -> Result<(tempfile::TempDir, Utf8PathBuf)> {
        let dir = tempfile::tempdir()?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow::anyhow!("non UTF-8 temp dir: {}", path.display()))?;
        let path = root.join(name);
        std::fs::write(&path, contents).context("write scratch file")?;
        Ok((dir, path))
    }

    #[rstest]
    #[case::json("site.json", r#"{"db": {"hosts": ["a", "b"]}}"#)]
    #[case::toml("site.toml", "[db]\nhosts = [\"a\", \"b\"]\n")]
    fn loads_absolute_paths(#[case] name: &str, #[case] contents: &str) -> Result<()> {
        let (_dir, path) = scratch_file(name, contents)?;
        let value = FsLoader.load(&path)?;
        assert_eq!(value.to_json(), json!({"db": {"hosts": ["a", "b"]}}));
        Ok(())
    }

    #[rstest]
    fn missing_files_report_their_path() -> Result<()> {
        let (_dir, path) = scratch_file("present.json", "{}")?;
        let missing = path.with_file_name("absent.json");
        let err = FsLoader
            .load(&missing)
            .expect_err("absent file must fail");
        assert!(matches!(&*err, EnvLayerError::File { path: reported, .. } if *reported == missing));
        Ok(())
    }
}
