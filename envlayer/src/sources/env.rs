//! Snapshot of environment variables as a nested mapping.

use tracing::trace;

use super::EnvSource;
use crate::value::{ConfigMap, ConfigValue};

/// Snapshot `source` into a mapping of string values.
///
/// A name containing `.` after its first character is split on `.` and the
/// pieces become a nested path, so `MINCONF.db.pass=secret` yields
/// `{"MINCONF": {"db": {"pass": "secret"}}}`. Names with a leading dot are kept
/// whole. Values are never coerced.
///
/// Variables are applied in sorted name order and later writes win. When one
/// name is a prefix path of another (`A.B` and `A.B.C`), the longer name sorts
/// last and its nested mapping replaces the shorter name's leaf.
///
/// ```rust
/// use envlayer::sources::{MapEnv, env_snapshot};
///
/// let env = MapEnv::from_iter([("MINCONF.db.pass", "secret"), ("HOME", "/root")]);
/// let snapshot = env_snapshot(&env);
/// assert_eq!(snapshot.lookup("MINCONF.db.pass").and_then(|v| v.as_str()), Some("secret"));
/// assert_eq!(snapshot["HOME"].as_str(), Some("/root"));
/// ```
#[must_use]
pub fn env_snapshot(source: &dyn EnvSource) -> ConfigValue {
    let mut vars = source.vars();
    vars.sort_by(|left, right| left.0.cmp(&right.0));
    let mut root = ConfigMap::new();
    for (name, value) in vars {
        insert_dotted(&mut root, &name, value);
    }
    ConfigValue::Mapping(root)
}

fn insert_dotted(root: &mut ConfigMap, name: &str, value: String) {
    let nested = name.find('.').is_some_and(|at| at > 0);
    if !nested {
        root.insert(name.to_owned(), ConfigValue::String(value));
        return;
    }
    let segments: Vec<&str> = name.split('.').collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };
    let mut cursor = root;
    for segment in parents {
        let slot = cursor
            .entry((*segment).to_owned())
            .or_insert_with(ConfigValue::mapping);
        if !slot.is_mapping() {
            trace!(variable = name, segment, "nested variable replaces a leaf value");
            *slot = ConfigValue::mapping();
        }
        cursor = match slot {
            ConfigValue::Mapping(next) => next,
            _ => return,
        };
    }
    cursor.insert((*leaf).to_owned(), ConfigValue::String(value));
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::env_snapshot;
    use crate::sources::MapEnv;

    #[rstest]
    fn plain_names_stay_flat() {
        let env = MapEnv::from_iter([("PATH", "/bin"), ("APP_ENV", "test")]);
        assert_eq!(
            env_snapshot(&env).to_json(),
            json!({"PATH": "/bin", "APP_ENV": "test"})
        );
    }

    #[rstest]
    fn dotted_names_share_parents() {
        let env = MapEnv::from_iter([("app.db.user", "svc"), ("app.db.pass", "secret")]);
        assert_eq!(
            env_snapshot(&env).to_json(),
            json!({"app": {"db": {"user": "svc", "pass": "secret"}}})
        );
    }

    #[rstest]
    fn leading_dot_is_not_a_path() {
        let env = MapEnv::from_iter([(".hidden.name", "x")]);
        assert_eq!(env_snapshot(&env).to_json(), json!({".hidden.name": "x"}));
    }

    #[rstest]
    fn deeper_path_replaces_prefix_leaf() {
        let env = MapEnv::from_iter([("A.B", "leaf"), ("A.B.C", "nested")]);
        assert_eq!(
            env_snapshot(&env).to_json(),
            json!({"A": {"B": {"C": "nested"}}})
        );
    }

    #[rstest]
    fn values_are_not_coerced() {
        let env = MapEnv::from_iter([("PORT", "8080"), ("DEBUG", "true")]);
        let snapshot = env_snapshot(&env);
        assert_eq!(snapshot["PORT"].as_str(), Some("8080"));
        assert_eq!(snapshot["DEBUG"].as_str(), Some("true"));
    }
}
