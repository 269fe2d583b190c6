//! Unit tests for environment resolution and gated merging.

use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Assembler, DEFAULT_ENVIRONMENT};
use crate::EnvLayerError;
use crate::sources::MapEnv;

fn layer(json: Value) -> crate::ConfigValue {
    crate::ConfigValue::from(json)
}

#[fixture]
fn development() -> Assembler {
    Assembler::for_environment(DEFAULT_ENVIRONMENT)
}

#[rstest]
#[case::defaults_apply(None, None, MapEnv::new(), "development")]
#[case::default_selector_read(None, None, MapEnv::from_iter([("APP_ENV", "prod")]), "prod")]
#[case::custom_selector_unset(Some("MINICONF_ENV"), Some("dev"), MapEnv::new(), "dev")]
#[case::custom_selector_set(
    Some("MINICONF_ENV"),
    Some("dev"),
    MapEnv::from_iter([("MINICONF_ENV", "staging")]),
    "staging"
)]
#[case::default_without_selector(
    None,
    Some("t"),
    MapEnv::from_iter([("APP_ENV", "ignored")]),
    "t"
)]
#[case::empty_value_is_unset(Some("SEL"), Some("dev"), MapEnv::from_iter([("SEL", "")]), "dev")]
#[case::empty_arguments_are_missing(
    Some(""),
    Some(""),
    MapEnv::from_iter([("APP_ENV", "qa")]),
    "qa"
)]
fn resolves_environment(
    #[case] selector: Option<&str>,
    #[case] default: Option<&str>,
    #[case] env: MapEnv,
    #[case] expected: &str,
) {
    let assembler = Assembler::with_source(selector, default, &env);
    assert_eq!(assembler.environment(), expected);
}

#[rstest]
fn set_reads_properties(mut development: Assembler) -> anyhow::Result<()> {
    development.set("development", [layer(json!({"x": 1}))])?;
    assert_eq!(development.config()["x"].as_i64(), Some(1));
    Ok(())
}

#[rstest]
fn set_merges_sources_in_order(mut development: Assembler) -> anyhow::Result<()> {
    development.set(
        "development",
        [layer(json!({"x": 1, "y": 1})), layer(json!({"y": 2, "z": 1}))],
    )?;
    assert_eq!(development.config().to_json(), json!({"x": 1, "y": 2, "z": 1}));
    Ok(())
}

#[rstest]
fn set_accepts_borrowed_sources(mut development: Assembler) -> anyhow::Result<()> {
    let sources = vec![layer(json!({"x": 1})), layer(json!({"y": 2}))];
    development.set("development", &sources)?;
    assert_eq!(development.config().to_json(), json!({"x": 1, "y": 2}));
    Ok(())
}

#[rstest]
fn set_replaces_hierarchical_values(mut development: Assembler) -> anyhow::Result<()> {
    let common = layer(json!({"parent": {"sub": {"a": 0, "array": [1, 2], "sub": {"x": 1}}}}));
    let staging = layer(json!({"parent": {"sub": {"a": 10, "array": [100, 200], "sub": {"y": 2}}}}));
    development.set("development", [common, staging])?;
    assert_eq!(
        development.config().to_json(),
        json!({"parent": {"sub": {"a": 10, "array": [100, 200], "sub": {"x": 1, "y": 2}}}})
    );
    Ok(())
}

#[rstest]
fn inactive_environments_are_ignored(mut development: Assembler) -> anyhow::Result<()> {
    development.set("staging", [layer(json!({"x": 1}))])?;
    assert_eq!(development.config().to_json(), json!({}));
    development.set("development", [layer(json!({"x": 1}))])?;
    assert_eq!(development.config().to_json(), json!({"x": 1}));
    Ok(())
}

#[rstest]
fn merge_always_targets_resolved_environment() -> anyhow::Result<()> {
    let mut assembler = Assembler::for_environment("staging");
    assembler
        .set("development", [layer(json!({"x": 1}))])?
        .set("staging", [layer(json!({"x": 2}))])?
        .merge([layer(json!({"y": 3}))])?;
    assert_eq!(assembler.config().to_json(), json!({"x": 2, "y": 3}));
    Ok(())
}

#[rstest]
#[case::empty_environment("", 1)]
#[case::no_sources("development", 0)]
#[case::no_sources_inactive("staging", 0)]
fn set_rejects_missing_arguments(
    mut development: Assembler,
    #[case] environment: &str,
    #[case] count: usize,
) {
    let sources = vec![layer(json!({"x": 1})); count];
    let err = development
        .set(environment, &sources)
        .expect_err("missing arguments must fail");
    assert!(matches!(&*err, EnvLayerError::Argument { .. }));
    assert_eq!(development.config().to_json(), json!({}));
}

#[derive(Debug, Deserialize, PartialEq)]
struct Database {
    host: String,
    port: u16,
}

#[rstest]
fn extracts_typed_configuration(mut development: Assembler) -> anyhow::Result<()> {
    development.merge([layer(json!({"host": "db.local", "port": 5432, "extra": true}))])?;
    let db: Database = development.extract()?;
    assert_eq!(
        db,
        Database {
            host: "db.local".to_owned(),
            port: 5432
        }
    );
    Ok(())
}

#[rstest]
fn extraction_reports_mismatches(mut development: Assembler) -> anyhow::Result<()> {
    development.merge([layer(json!({"host": "db.local", "port": "5432"}))])?;
    let err = development
        .extract::<Database>()
        .expect_err("string port must not coerce");
    assert!(matches!(&*err, EnvLayerError::Extract(_)));
    Ok(())
}
