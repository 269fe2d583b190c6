//! Unit tests for error construction and rendering.

use camino::Utf8Path;
use rstest::rstest;

use super::EnvLayerError;

#[rstest]
fn unresolved_token_names_environment_and_token() {
    let err = EnvLayerError::unresolved_token("test", "cmmon");
    let rendered = err.to_string();
    assert!(rendered.contains("'cmmon'"), "unexpected message: {rendered}");
    assert!(rendered.contains("'test'"), "unexpected message: {rendered}");
}

#[rstest]
fn file_errors_keep_their_source() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err = EnvLayerError::file_arc(Utf8Path::new("conf/site.json"), io);
    assert!(matches!(&*err, EnvLayerError::File { path, .. } if path == "conf/site.json"));
    let source = std::error::Error::source(&*err).map(ToString::to_string);
    assert_eq!(source.as_deref(), Some("gone"));
}

#[rstest]
fn layer_spec_errors_render_their_message() {
    let err = EnvLayerError::layer_spec("missing `_layers` key");
    assert_eq!(
        err.to_string(),
        "Invalid layer specification: missing `_layers` key"
    );
}

#[rstest]
fn converts_into_figment_errors() {
    let err = figment::Error::from(EnvLayerError::argument("sources"));
    assert!(err.to_string().contains("sources"));
}
