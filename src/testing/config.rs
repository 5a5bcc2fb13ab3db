//! Test scenario configuration types
//!
//! Defines the data structures for deserializing YAML test scenarios.

use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::common::{Error, Result};

/// The user lifecycle scenario shipped with the binary
pub const BUNDLED_USER_SCENARIO: &str = include_str!("../../resources/scenarios/user_lifecycle.yaml");

/// A complete test scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct TestScenario {
    /// Name of the test scenario
    pub name: String,
    /// Optional description of what the test verifies
    pub description: Option<String>,
    /// Skip the remaining steps after the first failure
    #[serde(default)]
    pub stop_on_failure: bool,
    /// The ordered sequence of test steps to execute
    pub steps: Vec<TestStep>,
}

impl TestScenario {
    /// Parse a scenario from YAML text
    ///
    /// `source_name` only appears in error messages.
    pub fn from_yaml(source_name: &str, content: &str) -> Result<Self> {
        let scenario: TestScenario =
            serde_yaml::from_str(content).map_err(|e| Error::scenario_parse(source_name, e))?;
        if scenario.steps.is_empty() {
            return Err(Error::scenario_parse(source_name, "scenario has no steps"));
        }
        Ok(scenario)
    }

    /// Load and parse a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_yaml(&path.display().to_string(), &content)
    }

    /// The bundled pet-store user lifecycle scenario
    pub fn bundled() -> Result<Self> {
        Self::from_yaml("bundled user_lifecycle.yaml", BUNDLED_USER_SCENARIO)
    }
}

/// A single HTTP interaction and its expectations
#[derive(Deserialize, Debug)]
pub struct TestStep {
    /// Step name shown in the report
    pub name: String,
    /// Request to send
    pub request: RequestSpec,
    /// Expectations for the response
    #[serde(default)]
    pub expect: ResponseExpectation,
}

/// Request definition; string fields may hold `{field}` placeholders
#[derive(Deserialize, Debug)]
pub struct RequestSpec {
    /// HTTP method, case-insensitive
    pub method: String,
    /// Path appended verbatim to the base URL
    pub path: String,
    /// Query parameters, sent in the order they are written
    #[serde(default, deserialize_with = "ordered_pairs")]
    pub query: Vec<(String, String)>,
    /// Request body
    #[serde(default)]
    pub body: BodySpec,
}

/// Read a YAML mapping of strings as pairs, keeping document order
fn ordered_pairs<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of query parameter names to values")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, value)) = map.next_entry::<String, String>()? {
                pairs.push((name, value));
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor)
}

/// Request body kinds
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodySpec {
    /// No body
    #[default]
    None,
    /// The fixture record serialized as JSON
    Fixture,
    /// Literal text
    Raw { text: String },
    /// Arbitrary JSON; string leaves are rendered
    Json { value: Value },
}

/// Expectations for a response; unset fields are not checked
#[derive(Deserialize, Debug, Default)]
pub struct ResponseExpectation {
    /// Exact HTTP status code
    pub status: Option<u16>,
    /// Response must complete in strictly less than this many milliseconds
    pub max_time_ms: Option<u64>,
    /// Substring that must appear in the body text
    pub body_contains: Option<String>,
    /// Exact number of top-level keys in the JSON object body
    pub field_count: Option<usize>,
    /// Assertions on individual JSON fields
    #[serde(default)]
    pub fields: Vec<FieldAssertion>,
    /// Schema file name the JSON body must conform to
    pub schema: Option<String>,
}

/// Assertion on one JSON field
#[derive(Deserialize, Debug)]
pub struct FieldAssertion {
    /// Dotted path, e.g. `message` or `tags.0.name`
    pub path: String,
    /// Expected value (exact match); strings may hold placeholders
    pub equals: Option<Value>,
    /// Expected JSON type
    pub kind: Option<JsonKind>,
}

/// JSON value types a field can be asserted to have
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JsonKind {
    String,
    Number,
    Bool,
    Object,
    Array,
    Null,
}

impl JsonKind {
    /// Kind of a JSON value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Bool,
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::Null => Self::Null,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_scenario_parses() {
        let scenario = TestScenario::bundled().unwrap();
        assert_eq!(scenario.steps.len(), 5);
        assert!(!scenario.stop_on_failure);

        let methods: Vec<&str> = scenario
            .steps
            .iter()
            .map(|s| s.request.method.as_str())
            .collect();
        assert_eq!(methods, ["POST", "GET", "GET", "DELETE", "POST"]);
    }

    #[test]
    fn test_bundled_scenario_expectations() {
        let scenario = TestScenario::bundled().unwrap();
        let create = &scenario.steps[0];
        assert_eq!(create.request.path, "/user");
        assert_eq!(create.request.body, BodySpec::Fixture);
        assert_eq!(create.expect.status, Some(200));
        assert_eq!(create.expect.field_count, Some(3));

        let login = &scenario.steps[1];
        assert_eq!(
            login.request.query,
            vec![
                ("username".to_string(), "{username}".to_string()),
                ("password".to_string(), "{password}".to_string()),
            ]
        );
        assert_eq!(login.expect.max_time_ms, Some(2000));
        assert_eq!(login.expect.schema.as_deref(), Some("loginResponseSchema.json"));

        // The delete path is kept without a separating slash
        assert_eq!(scenario.steps[3].request.path, "/user{username}");

        let negative = &scenario.steps[4];
        assert_eq!(
            negative.request.body,
            BodySpec::Raw {
                text: "teste".to_string()
            }
        );
        assert_eq!(negative.expect.status, Some(400));
        assert_eq!(negative.expect.body_contains.as_deref(), Some("unknown"));
        assert_eq!(negative.expect.field_count, Some(3));
    }

    #[test]
    fn test_minimal_step_defaults() {
        let scenario = TestScenario::from_yaml(
            "inline",
            r#"
name: ping
steps:
  - name: get
    request:
      method: get
      path: /store/inventory
"#,
        )
        .unwrap();

        let step = &scenario.steps[0];
        assert_eq!(step.request.body, BodySpec::None);
        assert!(step.request.query.is_empty());
        assert!(step.expect.status.is_none());
        assert!(step.expect.fields.is_empty());
    }

    #[test]
    fn test_json_body_and_field_kinds() {
        let scenario = TestScenario::from_yaml(
            "inline",
            r#"
name: json
steps:
  - name: post
    request:
      method: POST
      path: /user/createWithArray
      body:
        kind: json
        value:
          - username: "{username}"
    expect:
      fields:
        - path: message
          kind: string
        - path: code
          equals: 200
"#,
        )
        .unwrap();

        let step = &scenario.steps[0];
        assert!(matches!(step.request.body, BodySpec::Json { .. }));
        assert_eq!(step.expect.fields[0].kind, Some(JsonKind::String));
        assert_eq!(step.expect.fields[1].equals, Some(serde_json::json!(200)));
    }

    #[test]
    fn test_query_keeps_written_order() {
        let scenario = TestScenario::from_yaml(
            "inline",
            r#"
name: ordering
steps:
  - name: search
    request:
      method: GET
      path: /pet/findByStatus
      query:
        zeta: "1"
        alpha: "2"
        mid: "{username}"
"#,
        )
        .unwrap();

        let names: Vec<&str> = scenario.steps[0]
            .request
            .query
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_query_must_be_a_map() {
        let err = TestScenario::from_yaml(
            "inline",
            r#"
name: bad query
steps:
  - name: search
    request:
      method: GET
      path: /user/login
      query: [username]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ScenarioParse { .. }));
    }

    #[test]
    fn test_empty_steps_rejected() {
        let err = TestScenario::from_yaml("inline", "name: empty\nsteps: []\n").unwrap_err();
        assert!(matches!(err, Error::ScenarioParse { .. }));
    }

    #[test]
    fn test_unknown_body_kind_rejected() {
        let err = TestScenario::from_yaml(
            "inline",
            r#"
name: bad
steps:
  - name: post
    request:
      method: POST
      path: /user
      body:
        kind: xml
"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ScenarioParse { .. }));
    }

    #[test]
    fn test_json_kind_of() {
        assert_eq!(JsonKind::of(&serde_json::json!("a")), JsonKind::String);
        assert_eq!(JsonKind::of(&serde_json::json!(1.5)), JsonKind::Number);
        assert_eq!(JsonKind::of(&serde_json::json!(null)), JsonKind::Null);
        assert_eq!(JsonKind::Array.as_str(), "array");
    }
}
