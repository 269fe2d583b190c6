//! End-to-end assembly with in-memory sources.

use anyhow::{Result, anyhow, ensure};
use envlayer::layers::Loader;
use envlayer::sources::{Argv, MapEnv};
use envlayer::{Assembler, ConfigValue, EnvLayerError};
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, PartialEq, Eq)]
struct Settings {
    name: String,
    db: Database,
    #[serde(default)]
    features: Vec<String>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
struct Database {
    host: String,
    user: String,
    pass: Option<String>,
}

#[fixture]
fn config() -> ConfigValue {
    ConfigValue::from(json!({
        "_layers": {
            "options": {"envSelector": "MINCONF_ENV"},
            "envs": {
                "development": "common ARGV ENV",
                "test": "common test ARGV ENV"
            }
        },
        "common": {
            "name": "foo",
            "db": {"host": "localhost", "user": "app"},
            "features": ["auth", "search", "billing"]
        },
        "test": {
            "name": "bar",
            "db": {"host": "test-db"},
            "features": ["auth-stub"]
        }
    }))
}

fn loader(vars: &[(&str, &str)], args: &[&str]) -> Loader<MapEnv> {
    Loader::new()
        .with_env(vars.iter().copied().collect::<MapEnv>())
        .with_argv(Argv::from_args(args.iter().copied()))
}

#[rstest]
fn matching_environment_layers_apply_in_order(config: ConfigValue) -> Result<()> {
    let assembler = loader(&[("MINCONF_ENV", "test")], &[]).load(&config, None)?;
    ensure!(assembler.environment() == "test");
    let settings: Settings = assembler.extract()?;
    ensure!(
        settings
            == Settings {
                name: "bar".to_owned(),
                db: Database {
                    host: "test-db".to_owned(),
                    user: "app".to_owned(),
                    pass: None,
                },
                features: vec![
                    "auth-stub".to_owned(),
                    "search".to_owned(),
                    "billing".to_owned()
                ],
            },
        "unexpected settings: {settings:?}"
    );
    Ok(())
}

#[rstest]
fn dotted_variables_reach_nested_settings(config: ConfigValue) -> Result<()> {
    let vars = [("MINCONF_ENV", "test"), ("db.pass", "secret"), ("db.user", "ci")];
    let assembler = loader(&vars, &[]).load(&config, None)?;
    let settings: Settings = assembler.extract()?;
    ensure!(settings.db.pass.as_deref() == Some("secret"));
    ensure!(settings.db.user == "ci");
    ensure!(settings.db.host == "test-db");
    Ok(())
}

#[rstest]
fn arguments_override_named_layers(config: ConfigValue) -> Result<()> {
    let assembler = loader(&[], &["--name", "cli", "--db.host=ignored"]).load(&config, None)?;
    ensure!(assembler.environment() == "development");
    ensure!(assembler.config()["name"].as_str() == Some("cli"));
    ensure!(assembler.config()["db.host"].as_str() == Some("ignored"));
    ensure!(assembler.config().lookup("db.host").and_then(ConfigValue::as_str) == Some("localhost"));
    Ok(())
}

#[rstest]
fn failed_load_leaves_no_partial_result(config: ConfigValue) -> Result<()> {
    let mut broken = config;
    if let ConfigValue::Mapping(entries) = &mut broken {
        entries.insert(
            "_layers".to_owned(),
            ConfigValue::from(json!({"envs": {"development": "common missing"}})),
        );
    }
    let err = loader(&[], &[])
        .load(&broken, None)
        .err()
        .ok_or_else(|| anyhow!("`missing` is not a top-level key"))?;
    ensure!(matches!(&*err, EnvLayerError::UnresolvedToken { token, .. } if token == "missing"));
    Ok(())
}

#[rstest]
fn manual_assembly_matches_declarative_load(config: ConfigValue) -> Result<()> {
    let declared = loader(&[("MINCONF_ENV", "test")], &[]).load(&config, None)?;

    let mut manual = Assembler::for_environment("test");
    manual
        .set("development", [&config["common"]])?
        .set("test", [&config["common"], &config["test"]])?;
    ensure!(
        declared.config()["name"] == manual.config()["name"]
            && declared.config()["db"] == manual.config()["db"]
            && declared.config()["features"] == manual.config()["features"]
    );
    Ok(())
}
