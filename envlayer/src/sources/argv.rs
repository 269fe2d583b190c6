//! Command-line arguments as a flat mapping.

use std::ffi::OsString;
use std::sync::OnceLock;

use clap_lex::{ArgCursor, ParsedArg, RawArgs};

use crate::value::{ConfigMap, ConfigValue};

/// Key holding positional arguments.
pub const POSITIONAL_KEY: &str = "_";

/// Command-line arguments parsed on first use and kept for later calls.
///
/// The parse result is owned by the `Argv` value rather than cached
/// process-wide; whoever constructs the loader decides how long it lives.
///
/// Recognised forms:
///
/// - `--key value` and `--key=value` set `key` to the string `value`;
/// - a `--flag` followed by another flag, or by nothing, sets `true`, and
///   `--no-flag` sets `flag` to `false`;
/// - `-abc` sets `a`, `b` and `c` to `true`, and `-k value` sets `k`;
/// - other arguments, and everything after `--`, are collected under `_`.
///
/// Repeating a key collects its values into a sequence. Values stay strings.
///
/// ```rust
/// use envlayer::sources::Argv;
/// use serde_json::json;
///
/// let argv = Argv::from_args(["serve", "--port", "8080", "--verbose"]);
/// assert_eq!(
///     argv.parsed().to_json(),
///     json!({"port": "8080", "verbose": true, "_": ["serve"]})
/// );
///
/// // A plain word after a flag is taken as its value.
/// let argv = Argv::from_args(["--verbose", "serve"]);
/// assert_eq!(argv.parsed().to_json(), json!({"verbose": "serve", "_": []}));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Argv {
    args: Vec<OsString>,
    parsed: OnceLock<ConfigValue>,
}

impl Argv {
    /// Number of leading process arguments skipped by [`Argv::from_process`]:
    /// the program name.
    pub const DEFAULT_OFFSET: usize = 1;

    /// Capture the arguments of the running process after the program name.
    #[must_use]
    pub fn from_process() -> Self {
        Self::from_process_with_offset(Self::DEFAULT_OFFSET)
    }

    /// Capture the arguments of the running process, skipping `offset`
    /// leading entries.
    #[must_use]
    pub fn from_process_with_offset(offset: usize) -> Self {
        Self::from_args(std::env::args_os().skip(offset))
    }

    /// Use an explicit argument list. No entries are skipped.
    #[must_use]
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            parsed: OnceLock::new(),
        }
    }

    /// Parsed mapping, computed on the first call.
    #[must_use]
    pub fn parsed(&self) -> &ConfigValue {
        self.parsed.get_or_init(|| parse(&self.args))
    }

    /// Drop the cached parse so the next [`Argv::parsed`] call recomputes it.
    pub fn invalidate(&mut self) {
        self.parsed = OnceLock::new();
    }
}

fn parse(args: &[OsString]) -> ConfigValue {
    let raw = RawArgs::new(args.iter());
    let mut cursor = raw.cursor();
    let mut entries = ConfigMap::new();
    let mut positionals = Vec::new();

    while let Some(arg) = raw.next(&mut cursor) {
        if arg.is_escape() {
            positionals.extend(raw.remaining(&mut cursor).map(lossy));
            break;
        }
        if arg.is_negative_number() || arg.is_stdio() {
            positionals.push(lossy(arg.to_value_os()));
        } else if let Some((name, inline)) = arg.to_long() {
            let Ok(key) = name else {
                positionals.push(lossy(arg.to_value_os()));
                continue;
            };
            let value = match (inline, key.strip_prefix("no-")) {
                (Some(text), _) => ConfigValue::String(text.to_string_lossy().into_owned()),
                (None, Some(negated)) => {
                    record(&mut entries, negated.to_owned(), ConfigValue::Bool(false));
                    continue;
                }
                (None, None) => take_value(&raw, &mut cursor).unwrap_or(ConfigValue::Bool(true)),
            };
            record(&mut entries, key.to_owned(), value);
        } else if let Some(shorts) = arg.to_short() {
            let letters: Vec<char> = shorts.filter_map(Result::ok).collect();
            let Some((last, leading)) = letters.split_last() else {
                continue;
            };
            for letter in leading {
                record(&mut entries, letter.to_string(), ConfigValue::Bool(true));
            }
            let value = take_value(&raw, &mut cursor).unwrap_or(ConfigValue::Bool(true));
            record(&mut entries, last.to_string(), value);
        } else {
            positionals.push(lossy(arg.to_value_os()));
        }
    }

    entries.insert(
        POSITIONAL_KEY.to_owned(),
        ConfigValue::Sequence(positionals),
    );
    ConfigValue::Mapping(entries)
}

/// Consume the next argument as an option value when it is not itself a flag.
fn take_value(raw: &RawArgs, cursor: &mut ArgCursor) -> Option<ConfigValue> {
    let value = raw.peek(cursor).filter(is_value).map(|next| lossy(next.to_value_os()))?;
    raw.next(cursor);
    Some(value)
}

fn is_value(arg: &ParsedArg<'_>) -> bool {
    arg.is_negative_number() || arg.is_stdio() || !(arg.is_long() || arg.is_short() || arg.is_escape())
}

fn lossy(text: &std::ffi::OsStr) -> ConfigValue {
    ConfigValue::String(text.to_string_lossy().into_owned())
}

fn record(entries: &mut ConfigMap, key: String, value: ConfigValue) {
    let merged = match entries.remove(&key) {
        None => value,
        Some(ConfigValue::Sequence(mut items)) => {
            items.push(value);
            ConfigValue::Sequence(items)
        }
        Some(previous) => ConfigValue::Sequence(vec![previous, value]),
    };
    entries.insert(key, merged);
}
