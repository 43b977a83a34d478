//! Builds every diagram in fixtures/ and validates the interchange JSON
//! against the formal model schema at schema/model-schema.json.

use fsmgen_core::{compile, to_json, BuildOptions};
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn load_validator() -> jsonschema::Validator {
    let schema_path = workspace_root().join("schema/model-schema.json");
    let schema_src = std::fs::read_to_string(&schema_path)
        .unwrap_or_else(|e| panic!("Failed to read schema at {}: {}", schema_path.display(), e));
    let schema_value: serde_json::Value = serde_json::from_str(&schema_src).unwrap();
    jsonschema::validator_for(&schema_value)
        .unwrap_or_else(|e| panic!("Failed to compile schema: {}", e))
}

fn collect_diagrams(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |e| e == "puml"))
        .collect();
    paths.sort();
    paths
}

#[test]
fn validate_all_fixture_models_against_schema() {
    let validator = load_validator();
    let mut tested = 0usize;
    let mut failures = Vec::new();

    for path in collect_diagrams(&workspace_root().join("fixtures")) {
        let sm = compile(&path, BuildOptions::default())
            .unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
        let instance = to_json(&sm);
        if let Err(error) = validator.validate(&instance) {
            failures.push(format!("{}: {}", path.display(), error));
        }
        tested += 1;
    }

    assert!(tested >= 3, "expected at least 3 fixtures, found {}", tested);
    assert!(
        failures.is_empty(),
        "{} of {} models failed schema validation:\n{}",
        failures.len(),
        tested,
        failures.join("\n")
    );
}

#[test]
fn schema_rejects_unknown_vertex_kind() {
    let validator = load_validator();
    let sm = compile(&workspace_root().join("fixtures/door.puml"), BuildOptions::default()).unwrap();
    let mut instance = to_json(&sm);
    instance["vertices"][0]["kind"] = serde_json::json!("HistoryState");
    assert!(validator.validate(&instance).is_err());
}

#[test]
fn schema_rejects_missing_metadata() {
    let validator = load_validator();
    let sm = compile(&workspace_root().join("fixtures/door.puml"), BuildOptions::default()).unwrap();
    let mut instance = to_json(&sm);
    instance.as_object_mut().unwrap().remove("metadata");
    assert!(validator.validate(&instance).is_err());
}

#[test]
fn schema_rejects_state_fields_on_pseudostates() {
    let validator = load_validator();
    let sm = compile(&workspace_root().join("fixtures/door.puml"), BuildOptions::default()).unwrap();
    let mut instance = to_json(&sm);
    let initial = instance["vertices"]
        .as_array_mut()
        .unwrap()
        .iter_mut()
        .find(|v| v["kind"] == "InitialState")
        .unwrap();
    initial["type"] = serde_json::json!("Simple");
    assert!(validator.validate(&instance).is_err());
}
