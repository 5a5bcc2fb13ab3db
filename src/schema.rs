//! JSON schema lookup and response validation
//!
//! Schemas are resolved by file name: the configured schema directory is
//! searched first, then the set bundled into the binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use jsonschema::Validator;
use serde_json::Value;

use crate::common::{Error, Result};

/// Schemas compiled into the binary, keyed by file name
const BUNDLED: &[(&str, &str)] = &[(
    "loginResponseSchema.json",
    include_str!("../resources/schemas/loginResponseSchema.json"),
)];

/// Resolves schema names and caches compiled validators
pub struct SchemaStore {
    dir: Option<PathBuf>,
    validators: HashMap<String, Validator>,
}

impl SchemaStore {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            validators: HashMap::new(),
        }
    }

    /// Validate `instance` against the named schema
    ///
    /// Returns every violation message; an empty list means the instance
    /// conforms.
    pub fn validate(&mut self, name: &str, instance: &Value) -> Result<Vec<String>> {
        if !self.validators.contains_key(name) {
            let schema = self.load(name)?;
            let validator =
                jsonschema::validator_for(&schema).map_err(|e| Error::SchemaInvalid {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
            self.validators.insert(name.to_string(), validator);
        }

        let validator = self
            .validators
            .get(name)
            .ok_or_else(|| Error::SchemaNotFound(name.to_string()))?;

        Ok(validator
            .iter_errors(instance)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", path, e)
                }
            })
            .collect())
    }

    fn load(&self, name: &str) -> Result<Value> {
        if let Some(dir) = &self.dir {
            let path = dir.join(name);
            if path.is_file() {
                tracing::debug!(schema = name, path = %path.display(), "loading schema from directory");
                return read_schema(name, &path);
            }
        }

        let (_, text) = BUNDLED
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .ok_or_else(|| Error::SchemaNotFound(name.to_string()))?;
        serde_json::from_str(text).map_err(|e| Error::SchemaInvalid {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

fn read_schema(name: &str, path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| Error::SchemaInvalid {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LOGIN: &str = "loginResponseSchema.json";

    #[test]
    fn test_bundled_login_schema_accepts_login_response() {
        let mut store = SchemaStore::new(None);
        let violations = store
            .validate(
                LOGIN,
                &json!({
                    "code": 200,
                    "type": "unknown",
                    "message": "logged in user session:1718000000000"
                }),
            )
            .unwrap();
        assert!(violations.is_empty(), "{:?}", violations);
    }

    #[test]
    fn test_bundled_login_schema_rejects_wrong_shape() {
        let mut store = SchemaStore::new(None);
        let violations = store
            .validate(LOGIN, &json!({"code": "200", "type": "unknown"}))
            .unwrap();
        assert!(!violations.is_empty());

        let violations = store
            .validate(
                LOGIN,
                &json!({"code": 200, "type": "unknown", "message": "logged in user session:1", "extra": 1}),
            )
            .unwrap();
        assert!(!violations.is_empty());
    }

    #[test]
    fn test_unknown_schema() {
        let mut store = SchemaStore::new(None);
        assert!(matches!(
            store.validate("missing.json", &json!({})),
            Err(Error::SchemaNotFound(_))
        ));
    }

    #[test]
    fn test_directory_overrides_bundled() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(LOGIN),
            r#"{"type": "object", "required": ["token"]}"#,
        )
        .unwrap();

        let mut store = SchemaStore::new(Some(dir.path().to_path_buf()));
        assert!(store.validate(LOGIN, &json!({"token": "t"})).unwrap().is_empty());
        assert!(!store.validate(LOGIN, &json!({"code": 200})).unwrap().is_empty());
    }

    #[test]
    fn test_directory_schema_must_be_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let mut store = SchemaStore::new(Some(dir.path().to_path_buf()));
        assert!(matches!(
            store.validate("broken.json", &json!({})),
            Err(Error::SchemaInvalid { .. })
        ));
    }
}
