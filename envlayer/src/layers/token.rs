//! Parsing of layer token strings.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};

use crate::sources::file::has_config_extension;

/// Word replaced by the site config file list before tokenising.
pub const SITE_CONFIG_PLACEHOLDER: &str = "SITE_CONFIG";

const ARGV_TOKEN: &str = "ARGV";
const ENV_TOKEN: &str = "ENV";

/// One source named in an environment's token list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceToken {
    /// Parsed command-line arguments.
    Argv,
    /// Snapshot of the process environment.
    Env,
    /// Override file, relative to the working directory unless absolute.
    File(Utf8PathBuf),
    /// Top-level key of the caller's configuration mapping.
    Named(String),
}

impl SourceToken {
    /// Classify a single non-empty word.
    ///
    /// ```rust
    /// use envlayer::layers::SourceToken;
    ///
    /// assert_eq!(SourceToken::parse("ARGV"), SourceToken::Argv);
    /// assert_eq!(SourceToken::parse("site.toml"), SourceToken::File("site.toml".into()));
    /// assert_eq!(SourceToken::parse("common"), SourceToken::Named("common".into()));
    /// ```
    #[must_use]
    pub fn parse(word: &str) -> Self {
        match word {
            ARGV_TOKEN => Self::Argv,
            ENV_TOKEN => Self::Env,
            _ if has_config_extension(Utf8Path::new(word)) => Self::File(Utf8PathBuf::from(word)),
            _ => Self::Named(word.to_owned()),
        }
    }
}

impl fmt::Display for SourceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Argv => f.write_str(ARGV_TOKEN),
            Self::Env => f.write_str(ENV_TOKEN),
            Self::File(path) => write!(f, "{path}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Split `tokens` on whitespace and classify each word.
///
/// Every [`SITE_CONFIG_PLACEHOLDER`] word is replaced by `site_config`, in
/// order. Empty words never produce a token.
#[must_use]
pub fn tokenize(tokens: &str, site_config: &[String]) -> Vec<SourceToken> {
    tokens
        .split_whitespace()
        .flat_map(|word| {
            if word == SITE_CONFIG_PLACEHOLDER {
                site_config.iter().map(String::as_str).collect()
            } else {
                vec![word]
            }
        })
        .map(SourceToken::parse)
        .collect()
}

/// Split a site config list on whitespace and commas.
#[must_use]
pub fn split_site_config(list: &str) -> Vec<String> {
    list.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
