//! Shared test helpers for configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::GitwardenConfig;

/// Applies a configuration layer to the composer based on the layer type.
pub fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

/// Composes a [`GitwardenConfig`] from a sequence of `(layer_type, value)`
/// pairs on top of the built-in defaults.
pub fn build_config_from_layers(layers: &[(&str, Value)]) -> GitwardenConfig {
    let mut composer = MergeComposer::new();
    let defaults =
        serde_json::to_value(GitwardenConfig::default()).expect("defaults should serialise");
    composer.push_defaults(defaults);

    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value.clone());
    }

    GitwardenConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}

/// A configuration with a token and the PR checker enabled for one
/// repository.
pub fn enabled_config() -> GitwardenConfig {
    GitwardenConfig {
        token: Some("file-token".to_owned()),
        pr_checker_enabled: true,
        pr_repositories: vec!["acme/widgets".to_owned()],
        ..GitwardenConfig::default()
    }
}
