use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Backend JSON for one conversation, as `GET /api/conversations` sends it
#[allow(dead_code)]
pub fn conversation_json(
    id: &str,
    alias: &str,
    kind: &str,
    created_at: &str,
    starred_at: Option<&str>,
) -> serde_json::Value {
    let mut value = serde_json::json!({
        "conversation_id": id,
        "alias": alias,
        "type": kind,
        "created_at": created_at,
        "updated_at": created_at,
        "starred": starred_at.is_some(),
    });
    if let Some(at) = starred_at {
        value["starred_at"] = serde_json::Value::String(at.to_string());
    }
    value
}
