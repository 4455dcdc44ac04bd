use crate::error::GenerateError;
use crate::traverser::{OpenApiTraverser, TraverserError};
use crate::types::json_path::JsonPath;
use crate::types::primitive::OpenApiPrimitives;
use crate::types::version::OpenApiVersion;
use crate::{
    INFO_FIELD, OPENAPI_FIELD, PARAMETERS_FIELD, PATHS_FIELD, REF_FIELD, RESPONSES_FIELD,
    TITLE_FIELD, VERSION_FIELD,
};
use log::debug;
use serde_json::{Map, Value};
use serde_yaml::Value as YamlValue;
use std::str::FromStr;

/// A parsed OpenAPI 3.0.x/3.1.x document that passed the model-build checks.
///
/// Object keys keep the order they were written in, so paths, verbs, response
/// codes and media types are always visited in document order.
pub struct SpecificationDocument {
    traverser: OpenApiTraverser,
    openapi_version: OpenApiVersion,
    title: String,
    version: String,
}

impl SpecificationDocument {
    /// Parses raw YAML or JSON content and builds the document model.
    ///
    /// # Returns
    /// * `Err(GenerateError::Unparseable)` - the content is not YAML/JSON or its root is not a mapping.
    /// * `Err(GenerateError::ModelBuild)` - the content is not a usable OpenAPI 3 document;
    ///   every issue found is listed.
    pub fn from_slice(content: &[u8]) -> Result<Self, GenerateError> {
        let specification = Self::parse(content)?;
        Self::from_value(specification)
    }

    /// Builds the document model from an already parsed specification.
    pub fn from_value(specification: Value) -> Result<Self, GenerateError> {
        let mut issues = Vec::new();
        let openapi_version = Self::check_version(&specification, &mut issues);
        Self::check_info(&specification, &mut issues);
        Self::check_paths(&specification, &mut issues);

        let openapi_version = match openapi_version {
            Some(version) if issues.is_empty() => version,
            _ => return Err(GenerateError::model_build(issues)),
        };

        let title = Self::info_text(&specification, TITLE_FIELD);
        let version = Self::info_text(&specification, VERSION_FIELD);
        let traverser = match OpenApiTraverser::new(specification) {
            Ok(traverser) => traverser,
            Err(e) => return Err(GenerateError::model_build(vec![e.to_string()])),
        };
        debug!(
            "Loaded '{}' {} with {} operations",
            title,
            version,
            traverser.operations().len()
        );

        Ok(Self {
            traverser,
            openapi_version,
            title,
            version,
        })
    }

    pub fn traverser(&self) -> &OpenApiTraverser {
        &self.traverser
    }

    pub fn openapi_version(&self) -> OpenApiVersion {
        self.openapi_version
    }

    /// `info.title`, empty when the document does not declare one.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// `info.version`, empty when the document does not declare one.
    pub fn version(&self) -> &str {
        &self.version
    }

    fn parse(content: &[u8]) -> Result<Value, GenerateError> {
        let document: YamlValue = match serde_yaml::from_slice(content) {
            Ok(document) => document,
            Err(e) => return Err(GenerateError::unparseable(&e)),
        };
        let specification = match yaml_to_json(document) {
            Ok(specification) => specification,
            Err(e) => return Err(GenerateError::unparseable(&e)),
        };
        if !specification.is_object() {
            return Err(GenerateError::unparseable(
                "the specification root is not a mapping",
            ));
        }
        Ok(specification)
    }

    fn check_version(specification: &Value, issues: &mut Vec<String>) -> Option<OpenApiVersion> {
        let declared = match specification.get(OPENAPI_FIELD) {
            None => {
                issues.push(format!(
                    "{}: {}",
                    OPENAPI_FIELD,
                    TraverserError::missing_field(OPENAPI_FIELD)
                ));
                return None;
            }
            Some(Value::String(declared)) => declared.clone(),
            Some(Value::Number(declared)) => declared.to_string(),
            Some(other) => {
                issues.push(format!(
                    "{}: {}",
                    OPENAPI_FIELD,
                    Self::type_issue("string", other)
                ));
                return None;
            }
        };
        match OpenApiVersion::from_str(&declared) {
            Ok(version) => Some(version),
            Err(e) => {
                issues.push(format!("{}: {}", OPENAPI_FIELD, e));
                None
            }
        }
    }

    fn check_info(specification: &Value, issues: &mut Vec<String>) {
        if let Some(info) = specification.get(INFO_FIELD) {
            let mut location = JsonPath::new();
            location.add(INFO_FIELD);
            Self::expect_object(info, &location, issues);
        }
    }

    fn check_paths(specification: &Value, issues: &mut Vec<String>) {
        let Some(paths) = specification.get(PATHS_FIELD) else {
            return;
        };
        let mut location = JsonPath::new();
        location.add(PATHS_FIELD);
        let Some(paths) = Self::expect_object(paths, &location, issues) else {
            return;
        };

        for (path, path_item) in paths {
            let item_location = location.child(path);

            // Referenced path items are checked when the traverser resolves them.
            if path_item.get(REF_FIELD).is_some() {
                continue;
            }
            let Some(path_item) = Self::expect_object(path_item, &item_location, issues) else {
                continue;
            };
            if let Some(parameters) = path_item.get(PARAMETERS_FIELD) {
                Self::expect_array(parameters, &item_location.child(PARAMETERS_FIELD), issues);
            }

            for (verb, operation) in path_item {
                if !OpenApiTraverser::is_operation_method(verb) {
                    continue;
                }
                let operation_location = item_location.child(verb);
                let Some(operation) = Self::expect_object(operation, &operation_location, issues)
                else {
                    continue;
                };
                if let Some(parameters) = operation.get(PARAMETERS_FIELD) {
                    Self::expect_array(
                        parameters,
                        &operation_location.child(PARAMETERS_FIELD),
                        issues,
                    );
                }
                if let Some(responses) = operation.get(RESPONSES_FIELD) {
                    Self::expect_object(
                        responses,
                        &operation_location.child(RESPONSES_FIELD),
                        issues,
                    );
                }
            }
        }
    }

    fn expect_object<'v>(
        value: &'v Value,
        location: &JsonPath,
        issues: &mut Vec<String>,
    ) -> Option<&'v Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            issues.push(format!("{}: {}", location, Self::type_issue("object", value)));
        }
        object
    }

    fn expect_array(value: &Value, location: &JsonPath, issues: &mut Vec<String>) {
        if !value.is_array() {
            issues.push(format!("{}: {}", location, Self::type_issue("array", value)));
        }
    }

    fn type_issue(expected: &'static str, found: &Value) -> TraverserError<'static> {
        TraverserError::type_mismatch(
            expected,
            OpenApiPrimitives::get_type_from_serde(found).to_string(),
        )
    }

    fn info_text(specification: &Value, field: &str) -> String {
        match specification.get(INFO_FIELD).and_then(|info| info.get(field)) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            _ => String::new(),
        }
    }
}

/// Converts a YAML tree into JSON, keeping mapping order and turning scalar
/// keys (such as unquoted `200:` response codes) into strings.
fn yaml_to_json(value: YamlValue) -> Result<Value, String> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(flag) => Value::Bool(flag),
        YamlValue::Number(number) => yaml_number(&number),
        YamlValue::String(text) => Value::String(text),
        YamlValue::Sequence(items) => {
            let mut converted = Vec::with_capacity(items.len());
            for item in items {
                converted.push(yaml_to_json(item)?);
            }
            Value::Array(converted)
        }
        YamlValue::Mapping(mapping) => {
            let mut converted = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                converted.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(converted)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

/// JSON has no `.inf` or `.nan`; those keep their YAML spelling as strings.
fn yaml_number(number: &serde_yaml::Number) -> Value {
    if let Some(integer) = number.as_i64() {
        return Value::from(integer);
    }
    if let Some(unsigned) = number.as_u64() {
        return Value::from(unsigned);
    }
    match number.as_f64().and_then(serde_json::Number::from_f64) {
        Some(float) => Value::Number(float),
        None => Value::String(number.to_string()),
    }
}

fn yaml_key(key: YamlValue) -> Result<String, String> {
    match key {
        YamlValue::String(text) => Ok(text),
        YamlValue::Number(number) => Ok(number.to_string()),
        YamlValue::Bool(flag) => Ok(flag.to_string()),
        YamlValue::Null => Ok(String::from("null")),
        YamlValue::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(format!("unsupported mapping key: {:?}", other)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    const PETSTORE: &str = r#"
openapi: 3.0.3
info:
  title: Petstore
  version: 1.0.0
paths:
  /pets/{id}:
    get:
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: string
      responses:
        200:
          description: ok
        404:
          description: missing
"#;

    #[test]
    fn test_yaml_document_is_parsed_in_order() {
        let document = SpecificationDocument::from_slice(PETSTORE.as_bytes()).unwrap();
        assert_eq!(document.title(), "Petstore");
        assert_eq!(document.version(), "1.0.0");
        assert_eq!(document.openapi_version(), OpenApiVersion::V30x);

        let operation = &document.traverser().operations()[0];
        let codes: Vec<&String> = operation.data()["responses"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(codes, vec!["200", "404"]);
    }

    #[test]
    fn test_json_document_is_accepted() {
        let content = br#"{"openapi": "3.1.0", "info": {"title": "T", "version": "2"}, "paths": {}}"#;
        let document = SpecificationDocument::from_slice(content).unwrap();
        assert_eq!(document.openapi_version(), OpenApiVersion::V31x);
        assert!(document.traverser().operations().is_empty());
    }

    #[test]
    fn test_numeric_info_version_is_stringified() {
        let content = b"openapi: 3.0.0\ninfo:\n  title: T\n  version: 2.5\n";
        let document = SpecificationDocument::from_slice(content).unwrap();
        assert_eq!(document.version(), "2.5");
    }

    #[test]
    fn test_unparseable_content_is_rejected() {
        let result = SpecificationDocument::from_slice(b"openapi: [unclosed");
        assert!(matches!(result, Err(GenerateError::Unparseable(_))));

        let result = SpecificationDocument::from_slice(b"- just\n- a list\n");
        assert!(matches!(result, Err(GenerateError::Unparseable(_))));
    }

    #[test]
    fn test_swagger_document_fails_model_build() {
        let result = SpecificationDocument::from_value(json!({
            "swagger": "2.0",
            "info": { "title": "Old", "version": "1" },
            "paths": {}
        }));
        match result {
            Err(GenerateError::ModelBuild(issues)) => {
                assert_eq!(issues, vec!["openapi: Missing field: openapi".to_string()]);
            }
            _ => panic!("Expected a model build failure"),
        }
    }

    #[test]
    fn test_every_structural_issue_is_reported() {
        let result = SpecificationDocument::from_value(json!({
            "openapi": "3.0.0",
            "info": "Petstore",
            "paths": {
                "/pets": {
                    "get": { "parameters": {}, "responses": [] },
                    "post": "nope"
                }
            }
        }));
        match result {
            Err(GenerateError::ModelBuild(issues)) => {
                assert_eq!(issues.len(), 4);
                assert!(issues.contains(
                    &"info: Type mismatch: expected object, found string".to_string()
                ));
                assert!(issues.contains(
                    &"paths/~1pets/get/parameters: Type mismatch: expected array, found object"
                        .to_string()
                ));
                assert!(issues.contains(
                    &"paths/~1pets/get/responses: Type mismatch: expected object, found array"
                        .to_string()
                ));
                assert!(issues.contains(
                    &"paths/~1pets/post: Type mismatch: expected object, found string".to_string()
                ));
            }
            _ => panic!("Expected a model build failure"),
        }
    }

    #[test]
    fn test_unsupported_version_is_reported() {
        let result = SpecificationDocument::from_value(json!({ "openapi": "4.0.0" }));
        match result {
            Err(GenerateError::ModelBuild(issues)) => {
                assert_eq!(issues, vec!["openapi: Unsupported version: 4.0.0".to_string()]);
            }
            _ => panic!("Expected a model build failure"),
        }
    }

    #[test]
    fn test_non_finite_numbers_keep_yaml_spelling() {
        let content = b"openapi: 3.0.3\ninfo:\n  title: Limits\n  version: '1'\npaths: {}\ncomponents:\n  schemas:\n    Ratio:\n      type: number\n      maximum: .inf\n      minimum: -.inf\n      default: .nan\n";
        let document = SpecificationDocument::from_slice(content).unwrap();
        let ratio = document
            .traverser()
            .specification()
            .pointer("/components/schemas/Ratio")
            .unwrap();
        assert_eq!(ratio["maximum"], json!(".inf"));
        assert_eq!(ratio["minimum"], json!("-.inf"));
        assert_eq!(ratio["default"], json!(".nan"));
    }

    #[test]
    fn test_yaml_keys_are_stringified() {
        let converted = yaml_to_json(serde_yaml::from_str("200: ok\ntrue: yes\n").unwrap()).unwrap();
        assert_eq!(converted, json!({ "200": "ok", "true": "yes" }));
    }
}
