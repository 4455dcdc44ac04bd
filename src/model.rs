use crate::error::RenderError;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub const API_VERSION: &'static str = "mocks.microcks.io/v1alpha1";
pub const KIND: &'static str = "APIExamples";

/// Root of the generated examples: one [`ExampleEntry`] per `(verb, path)` of the
/// source specification.
///
/// The document owns all of its data and keeps no link to the specification it
/// was generated from.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExamplesDocument {
    api_version: &'static str,
    kind: &'static str,
    metadata: Metadata,
    operations: BTreeMap<OperationKey, ExampleEntry>,
}

impl ExamplesDocument {
    pub fn new(metadata: Metadata, operations: BTreeMap<OperationKey, ExampleEntry>) -> Self {
        Self {
            api_version: API_VERSION,
            kind: KIND,
            metadata,
            operations,
        }
    }

    pub fn api_version(&self) -> &str {
        self.api_version
    }

    pub fn kind(&self) -> &str {
        self.kind
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn operations(&self) -> &BTreeMap<OperationKey, ExampleEntry> {
        &self.operations
    }

    /// Pretty JSON form of the document, operations keyed by their display key.
    pub fn to_json(&self) -> Result<String, RenderError> {
        serde_json::to_string_pretty(self).map_err(|e| RenderError::serialization(&e))
    }

    /// YAML form of the document, with the same field omissions as the JSON form.
    pub fn to_yaml(&self) -> Result<String, RenderError> {
        serde_yaml::to_string(self).map_err(|e| RenderError::serialization(&e))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Metadata {
    pub name: String,
    pub version: String,
}

impl Metadata {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Identifies one operation by HTTP verb and literal path template.
///
/// Keys compare by the upper-cased verb, so `get` and `GET` name the same
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OperationKey {
    verb: String,
    path: String,
}

impl OperationKey {
    pub fn new(verb: &str, path: impl Into<String>) -> Self {
        Self {
            verb: verb.to_uppercase(),
            path: path.into(),
        }
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Display for OperationKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.verb, self.path)
    }
}

impl Serialize for OperationKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ExampleEntry {
    pub request: Request,
    pub response: Response,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Request {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Request {
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.headers.is_empty() && self.body.is_none()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Status code as written in the specification; empty until a response
    /// has been processed.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Response {
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
            && self.headers.is_empty()
            && self.media_type.is_none()
            && self.body.is_none()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn sample_document() -> ExamplesDocument {
        let mut operations = BTreeMap::new();
        let mut request = Request::default();
        request
            .parameters
            .insert("id".to_string(), "string".to_string());
        operations.insert(
            OperationKey::new("get", "/pets/{id}"),
            ExampleEntry {
                request,
                response: Response {
                    media_type: Some("application/json".to_string()),
                    code: "200".to_string(),
                    body: Some("{\"name\":\"string\"}".to_string()),
                    ..Response::default()
                },
            },
        );
        operations.insert(OperationKey::new("post", "/pets"), ExampleEntry::default());
        ExamplesDocument::new(Metadata::new("Petstore", "1.0.0"), operations)
    }

    #[test]
    fn test_operation_key_display_upper_cases_verb() {
        let key = OperationKey::new("get", "/pets/{id}");
        assert_eq!(key.to_string(), "GET /pets/{id}");
        assert_eq!(key, OperationKey::new("GET", "/pets/{id}"));
        assert_ne!(key, OperationKey::new("get", "/pets/{petId}"));
    }

    #[test]
    fn test_operation_keys_order_by_verb_then_path() {
        let document = sample_document();
        let keys: Vec<String> = document.operations().keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["GET /pets/{id}", "POST /pets"]);
    }

    #[test]
    fn test_json_omits_empty_fields() {
        let document = sample_document();
        let serialized: serde_json::Value =
            serde_json::from_str(&document.to_json().unwrap()).unwrap();
        assert_eq!(
            serialized,
            json!({
                "apiVersion": "mocks.microcks.io/v1alpha1",
                "kind": "APIExamples",
                "metadata": { "name": "Petstore", "version": "1.0.0" },
                "operations": {
                    "GET /pets/{id}": {
                        "request": { "parameters": { "id": "string" } },
                        "response": {
                            "mediaType": "application/json",
                            "code": "200",
                            "body": "{\"name\":\"string\"}"
                        }
                    },
                    "POST /pets": { "request": {}, "response": {} }
                }
            })
        );
    }

    #[test]
    fn test_yaml_uses_display_keys() {
        let yaml = sample_document().to_yaml().unwrap();
        assert!(yaml.starts_with("apiVersion: mocks.microcks.io/v1alpha1\nkind: APIExamples\n"));
        assert!(yaml.contains("GET /pets/{id}"));
        assert!(yaml.contains("mediaType: application/json"));
        assert!(!yaml.contains("headers"));
    }

    #[test]
    fn test_empty_request_and_response() {
        let entry = ExampleEntry::default();
        assert!(entry.request.is_empty());
        assert!(entry.response.is_empty());
    }
}
