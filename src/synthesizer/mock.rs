use crate::synthesizer::{SynthesisError, ValueSynthesizer};
use crate::types::primitive::OpenApiPrimitives;
use jsonschema::{Draft, Validator as JsonValidator};
use log::trace;
use serde_json::{Map, Number, Value};
use std::str::FromStr;

/// Deepest schema nesting that will be synthesized.
const MAX_DEPTH: usize = 12;

/// Longest string that will be generated to satisfy `minLength`.
const MAX_STRING_LENGTH: u64 = 1 << 16;

/// Largest array that will be generated to satisfy `minItems`, measured in
/// nodes with strings weighted by their length.
const MAX_ARRAY_SIZE: u64 = 1 << 20;

/// Keywords that declare the value instead of constraining it.
const DECLARED_KEYWORDS: [&'static str; 5] = ["const", "example", "examples", "default", "enum"];

/// Keywords that describe a schema without constraining its value.
const ANNOTATION_KEYWORDS: [&'static str; 9] = [
    "title",
    "description",
    "$comment",
    "deprecated",
    "readOnly",
    "writeOnly",
    "externalDocs",
    "xml",
    "nullable",
];

/// Keywords whose value is a single subschema.
const SUBSCHEMA_KEYWORDS: [&'static str; 11] = [
    "items",
    "additionalItems",
    "additionalProperties",
    "not",
    "contains",
    "propertyNames",
    "if",
    "then",
    "else",
    "unevaluatedItems",
    "unevaluatedProperties",
];

/// Keywords whose value is a list of subschemas.
const SUBSCHEMA_LIST_KEYWORDS: [&'static str; 5] = ["allOf", "anyOf", "oneOf", "prefixItems", "items"];

/// Keywords whose value maps names to subschemas.
const NAMED_SUBSCHEMA_KEYWORDS: [&'static str; 4] =
    ["properties", "patternProperties", "$defs", "definitions"];

const ADDITIONAL_PROPERTY_NAME: &'static str = "additionalProp1";
const DEFAULT_STRING: &'static str = "string";
const DEFAULT_INTEGER: i64 = 1;
const DEFAULT_NUMBER: f64 = 1.5;

/// Sample strings for the common `format` values.
const STRING_FORMATS: [(&'static str, &'static str); 12] = [
    ("date", "2017-07-21"),
    ("date-time", "2017-07-21T17:32:28Z"),
    ("time", "17:32:28Z"),
    ("email", "user@example.com"),
    ("uuid", "3fa85f64-5717-4562-b3fc-2c963f66afa6"),
    ("uri", "https://example.com"),
    ("hostname", "example.com"),
    ("ipv4", "192.168.0.1"),
    ("ipv6", "2001:db8::1"),
    ("byte", "U3dhZ2dlciByb2Nrcw=="),
    ("binary", "binary"),
    ("password", "********"),
];

/// Deterministic [`ValueSynthesizer`] that derives a value from the schema alone.
///
/// Declared values (`const`, `example`, `examples`, `default`, `enum`) win over
/// generated ones. Generated values are checked against the schema with the
/// configured JSON-Schema draft unless validation is turned off.
///
/// Scalars are returned as their plain text (`string`, `1`, `true`); objects and
/// arrays as JSON.
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    draft: Draft,
    pretty: bool,
    validate: bool,
}

struct Bounds {
    lower: Option<(f64, bool)>,
    upper: Option<(f64, bool)>,
}

impl Bounds {
    fn from_schema(schema: &Map<String, Value>) -> Self {
        Self {
            lower: Self::bound(schema, "minimum", "exclusiveMinimum"),
            upper: Self::bound(schema, "maximum", "exclusiveMaximum"),
        }
    }

    /// `(limit, exclusive)`, reading both the 3.0 boolean and the 3.1 numeric
    /// form of the exclusive keyword.
    fn bound(schema: &Map<String, Value>, inclusive: &str, exclusive: &str) -> Option<(f64, bool)> {
        match schema.get(exclusive) {
            Some(Value::Number(limit)) => limit.as_f64().map(|limit| (limit, true)),
            Some(Value::Bool(is_exclusive)) => schema
                .get(inclusive)
                .and_then(Value::as_f64)
                .map(|limit| (limit, *is_exclusive)),
            _ => schema
                .get(inclusive)
                .and_then(Value::as_f64)
                .map(|limit| (limit, false)),
        }
    }

    fn contains(&self, candidate: f64) -> bool {
        let above = match self.lower {
            None => true,
            Some((limit, true)) => candidate > limit,
            Some((limit, false)) => candidate >= limit,
        };
        let below = match self.upper {
            None => true,
            Some((limit, true)) => candidate < limit,
            Some((limit, false)) => candidate <= limit,
        };
        above && below
    }
}

impl MockSynthesizer {
    pub fn new(draft: Draft) -> Self {
        Self {
            draft,
            pretty: true,
            validate: true,
        }
    }

    /// Pretty-print object and array values (2-space indent). Enabled by default.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Check generated values against their schema. Enabled by default.
    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    fn example_value(
        &self,
        schema: &Value,
        format_hint: Option<&str>,
        depth: usize,
    ) -> Result<Value, SynthesisError> {
        if depth > MAX_DEPTH {
            return Err(SynthesisError::synthesis_failed(&format!(
                "schema nesting exceeds {} levels",
                MAX_DEPTH
            )));
        }
        let schema = match schema {
            Value::Object(schema) => schema,
            _ => {
                return Err(SynthesisError::synthesis_failed(
                    "schema does not constrain the value",
                ));
            }
        };

        if let Some(declared) = Self::declared_value(schema, format_hint) {
            return Ok(declared);
        }

        if let Some(Value::Array(parts)) = schema.get("allOf") {
            let merged = Self::merge_all_of(schema, parts);
            return self.example_value(&merged, format_hint, depth + 1);
        }

        for keyword in ["oneOf", "anyOf"] {
            if let Some(Value::Array(variants)) = schema.get(keyword) {
                for variant in variants {
                    match self.example_value(variant, format_hint, depth + 1) {
                        Ok(value) => return Ok(value),
                        Err(e) => trace!("Skipping {} variant: {}", keyword, e),
                    }
                }
            }
        }

        match Self::schema_type(schema) {
            Some(OpenApiPrimitives::String) => Self::string_value(schema),
            Some(OpenApiPrimitives::Integer) => Self::integer_value(schema),
            Some(OpenApiPrimitives::Number) => Self::number_value(schema),
            Some(OpenApiPrimitives::Bool) => Ok(Value::Bool(true)),
            Some(OpenApiPrimitives::Null) => Ok(Value::Null),
            Some(OpenApiPrimitives::Object) => Ok(self.object_value(schema, format_hint, depth)),
            Some(OpenApiPrimitives::Array) => self.array_value(schema, format_hint, depth),
            None => Err(SynthesisError::synthesis_failed(
                "schema does not constrain the value",
            )),
        }
    }

    fn declared_value(schema: &Map<String, Value>, format_hint: Option<&str>) -> Option<Value> {
        let examples = schema.get("examples");
        if let (Some(name), Some(Value::Object(named))) = (format_hint, examples) {
            if let Some(example) = named.get(name) {
                return Some(Self::unwrap_example(example));
            }
        }
        if let Some(value) = schema.get("const") {
            return Some(value.clone());
        }
        if let Some(value) = schema.get("example") {
            return Some(value.clone());
        }
        match examples {
            Some(Value::Object(named)) => {
                if let Some((_, example)) = named.iter().next() {
                    return Some(Self::unwrap_example(example));
                }
            }
            Some(Value::Array(listed)) => {
                if let Some(example) = listed.first() {
                    return Some(example.clone());
                }
            }
            _ => {}
        }
        if let Some(value) = schema.get("default") {
            return Some(value.clone());
        }
        match schema.get("enum") {
            Some(Value::Array(values)) => values.first().cloned(),
            _ => None,
        }
    }

    /// An Example Object carries its payload under `value`.
    fn unwrap_example(example: &Value) -> Value {
        match example.get("value") {
            Some(value) => value.clone(),
            None => example.clone(),
        }
    }

    fn merge_all_of(schema: &Map<String, Value>, parts: &[Value]) -> Value {
        let mut merged = schema.clone();
        merged.shift_remove("allOf");
        for part in parts {
            let Value::Object(part) = part else {
                continue;
            };
            for (keyword, value) in part {
                match (keyword.as_str(), merged.get_mut(keyword), value) {
                    ("properties", Some(Value::Object(existing)), Value::Object(added)) => {
                        for (name, property) in added {
                            existing.insert(name.clone(), property.clone());
                        }
                    }
                    ("required", Some(Value::Array(existing)), Value::Array(added)) => {
                        for name in added {
                            if !existing.contains(name) {
                                existing.push(name.clone());
                            }
                        }
                    }
                    (_, Some(_), _) => {}
                    (_, None, _) => {
                        merged.insert(keyword.clone(), value.clone());
                    }
                }
            }
        }
        Value::Object(merged)
    }

    fn schema_type(schema: &Map<String, Value>) -> Option<OpenApiPrimitives> {
        match schema.get("type") {
            Some(Value::String(name)) => OpenApiPrimitives::from_str(name).ok(),
            Some(Value::Array(names)) => names
                .iter()
                .filter_map(Value::as_str)
                .filter(|name| *name != "null")
                .find_map(|name| OpenApiPrimitives::from_str(name).ok()),
            _ => {
                if schema.contains_key("properties") || schema.contains_key("additionalProperties")
                {
                    Some(OpenApiPrimitives::Object)
                } else if schema.contains_key("items") {
                    Some(OpenApiPrimitives::Array)
                } else {
                    None
                }
            }
        }
    }

    /// A non-negative size keyword (`minLength`, `maxItems`, ...), accepting
    /// integral floats such as `1e3`.
    fn size_keyword(schema: &Map<String, Value>, keyword: &str) -> Option<u64> {
        let value = schema.get(keyword)?;
        value
            .as_u64()
            .or_else(|| value.as_f64().filter(|size| *size >= 0.0).map(|size| size as u64))
    }

    fn string_value(schema: &Map<String, Value>) -> Result<Value, SynthesisError> {
        let format = schema.get("format").and_then(Value::as_str);
        let sample = STRING_FORMATS
            .iter()
            .find(|(name, _)| Some(*name) == format)
            .map_or(DEFAULT_STRING, |(_, sample)| *sample);

        let mut text = String::from(sample);
        if let Some(min_length) = Self::size_keyword(schema, "minLength") {
            if min_length > MAX_STRING_LENGTH {
                return Err(SynthesisError::synthesis_failed(&format!(
                    "minLength {} exceeds {}",
                    min_length, MAX_STRING_LENGTH
                )));
            }
            let length = text.chars().count() as u64;
            if length < min_length {
                text.push_str(&"x".repeat((min_length - length) as usize));
            }
        }
        if let Some(max_length) = Self::size_keyword(schema, "maxLength") {
            text = text.chars().take(max_length as usize).collect();
        }
        Ok(Value::String(text))
    }

    fn integer_value(schema: &Map<String, Value>) -> Result<Value, SynthesisError> {
        let bounds = Bounds::from_schema(schema);
        let mut candidate = DEFAULT_INTEGER as f64;
        if !bounds.contains(candidate) {
            candidate = match (bounds.lower, bounds.upper) {
                (Some((limit, true)), _) => limit.floor() + 1.0,
                (Some((limit, false)), _) => limit.ceil(),
                (None, Some((limit, true))) => limit.ceil() - 1.0,
                (None, Some((limit, false))) => limit.floor(),
                (None, None) => candidate,
            };
        }
        if let Some(step) = schema.get("multipleOf").and_then(Value::as_f64) {
            if step > 0.0 {
                candidate = (candidate / step).ceil() * step;
            }
        }
        if !bounds.contains(candidate) {
            return Err(SynthesisError::synthesis_failed(
                "no integer satisfies the declared bounds",
            ));
        }
        Ok(Value::from(candidate as i64))
    }

    fn number_value(schema: &Map<String, Value>) -> Result<Value, SynthesisError> {
        let bounds = Bounds::from_schema(schema);
        let mut candidate = DEFAULT_NUMBER;
        if !bounds.contains(candidate) {
            candidate = match (bounds.lower, bounds.upper) {
                (Some((lower, false)), _) => lower,
                (None, Some((upper, false))) => upper,
                (Some((lower, true)), Some((upper, true))) => (lower + upper) / 2.0,
                (Some((_, true)), Some((upper, false))) => upper,
                (Some((lower, true)), None) => lower + 1.0,
                (None, Some((upper, true))) => upper - 1.0,
                (None, None) => candidate,
            };
        }
        if let Some(step) = schema.get("multipleOf").and_then(Value::as_f64) {
            if step > 0.0 {
                candidate = (candidate / step).ceil() * step;
            }
        }
        if !bounds.contains(candidate) {
            return Err(SynthesisError::synthesis_failed(
                "no number satisfies the declared bounds",
            ));
        }
        match Number::from_f64(candidate) {
            Some(number) => Ok(Value::Number(number)),
            None => Err(SynthesisError::synthesis_failed(&format!(
                "{} is not a JSON number",
                candidate
            ))),
        }
    }

    /// Properties that fail to synthesize are omitted, except required ones
    /// whose schema accepts anything: those get an empty object.
    fn object_value(&self, schema: &Map<String, Value>, format_hint: Option<&str>, depth: usize) -> Value {
        let required: Vec<&str> = match schema.get("required") {
            Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        let mut object = Map::new();
        if let Some(Value::Object(properties)) = schema.get("properties") {
            for (name, property) in properties {
                match self.example_value(property, format_hint, depth + 1) {
                    Ok(value) => {
                        object.insert(name.clone(), value);
                    }
                    Err(e) if required.contains(&name.as_str()) && Self::is_unconstrained(property) => {
                        trace!("Using an empty object for required property '{}': {}", name, e);
                        object.insert(name.clone(), Value::Object(Map::new()));
                    }
                    Err(e) => trace!("Omitting property '{}': {}", name, e),
                }
            }
        }
        if object.is_empty() {
            if let Some(additional @ Value::Object(_)) = schema.get("additionalProperties") {
                if let Ok(value) = self.example_value(additional, format_hint, depth + 1) {
                    object.insert(ADDITIONAL_PROPERTY_NAME.to_string(), value);
                }
            }
        }
        Value::Object(object)
    }

    fn is_unconstrained(schema: &Value) -> bool {
        match schema {
            Value::Bool(accepts) => *accepts,
            Value::Object(schema) => schema
                .keys()
                .all(|keyword| ANNOTATION_KEYWORDS.contains(&keyword.as_str()) || keyword.starts_with("x-")),
            _ => false,
        }
    }

    fn array_value(
        &self,
        schema: &Map<String, Value>,
        format_hint: Option<&str>,
        depth: usize,
    ) -> Result<Value, SynthesisError> {
        let Some(items) = schema.get("items") else {
            return Ok(Value::Array(Vec::new()));
        };
        let item = match self.example_value(items, format_hint, depth + 1) {
            Ok(item) => item,
            Err(e) => {
                trace!("Leaving array empty: {}", e);
                return Ok(Value::Array(Vec::new()));
            }
        };
        let min_items = Self::size_keyword(schema, "minItems").unwrap_or(0);
        let mut count = min_items.max(1);
        if let Some(max_items) = Self::size_keyword(schema, "maxItems") {
            count = count.min(max_items);
        }
        let size = count.saturating_mul(Self::generated_size(&item));
        if size > MAX_ARRAY_SIZE {
            return Err(SynthesisError::synthesis_failed(&format!(
                "{} items would exceed the array size limit of {}",
                count, MAX_ARRAY_SIZE
            )));
        }
        Ok(Value::Array(vec![item; count as usize]))
    }

    fn generated_size(value: &Value) -> u64 {
        match value {
            Value::String(text) => (text.len() as u64).max(1),
            Value::Array(items) => items.iter().map(Self::generated_size).sum::<u64>() + 1,
            Value::Object(object) => object.values().map(Self::generated_size).sum::<u64>() + 1,
            _ => 1,
        }
    }

    /// The schema generated values are checked against. Subschemas that declare
    /// their value accept anything, and `nullable: true` admits `null`.
    fn validation_schema(schema: &Value) -> Value {
        let Value::Object(schema) = schema else {
            return schema.clone();
        };
        if Self::declares_value(schema) {
            return Value::Object(Map::new());
        }

        let mut relaxed = Map::with_capacity(schema.len());
        for (keyword, value) in schema {
            let keyword_name = keyword.as_str();
            let value = match value {
                Value::Object(named) if NAMED_SUBSCHEMA_KEYWORDS.contains(&keyword_name) => Value::Object(
                    named
                        .iter()
                        .map(|(name, subschema)| (name.clone(), Self::validation_schema(subschema)))
                        .collect(),
                ),
                Value::Array(subschemas) if SUBSCHEMA_LIST_KEYWORDS.contains(&keyword_name) => {
                    Value::Array(subschemas.iter().map(Self::validation_schema).collect())
                }
                _ if SUBSCHEMA_KEYWORDS.contains(&keyword_name) => Self::validation_schema(value),
                _ => value.clone(),
            };
            relaxed.insert(keyword.clone(), value);
        }

        if relaxed.get("nullable") == Some(&Value::Bool(true)) {
            let null = Value::String(String::from("null"));
            let admitted = match relaxed.get("type") {
                Some(Value::String(name)) => Some(Value::Array(vec![Value::String(name.clone()), null])),
                Some(Value::Array(names)) if !names.contains(&null) => {
                    let mut names = names.clone();
                    names.push(null);
                    Some(Value::Array(names))
                }
                _ => None,
            };
            if let Some(admitted) = admitted {
                relaxed.insert(String::from("type"), admitted);
            }
        }
        Value::Object(relaxed)
    }

    /// Whether synthesis takes this schema's value from a declared keyword,
    /// directly or through an `allOf` part.
    fn declares_value(schema: &Map<String, Value>) -> bool {
        if DECLARED_KEYWORDS.iter().any(|keyword| schema.contains_key(*keyword)) {
            return true;
        }
        match schema.get("allOf") {
            Some(Value::Array(parts)) => parts
                .iter()
                .filter_map(Value::as_object)
                .any(Self::declares_value),
            _ => false,
        }
    }

    fn check(&self, schema: &Value, instance: &Value) -> Result<(), SynthesisError> {
        let validator = match JsonValidator::options()
            .with_draft(self.draft)
            .should_validate_formats(false)
            .build(schema)
        {
            Ok(validator) => validator,
            Err(e) => return Err(SynthesisError::schema_build_failed(&e)),
        };
        match validator.validate(instance) {
            Ok(_) => Ok(()),
            Err(e) => Err(SynthesisError::synthesis_failed(&e)),
        }
    }

    fn serialize(&self, value: &Value) -> Result<String, SynthesisError> {
        let serialized = match value {
            Value::String(text) => return Ok(text.clone()),
            Value::Object(_) | Value::Array(_) if self.pretty => serde_json::to_string_pretty(value),
            _ => serde_json::to_string(value),
        };
        serialized.map_err(|e| SynthesisError::synthesis_failed(&e))
    }
}

impl ValueSynthesizer for MockSynthesizer {
    fn synthesize(&self, schema: &Value, format_hint: Option<&str>) -> Result<String, SynthesisError> {
        let value = self.example_value(schema, format_hint, 0)?;
        if self.validate {
            self.check(&Self::validation_schema(schema), &value)?;
        }
        self.serialize(&value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn compact() -> MockSynthesizer {
        MockSynthesizer::new(Draft::Draft4).pretty(false)
    }

    #[test]
    fn test_scalars_are_plain_text() {
        let synthesizer = compact();
        assert_eq!(synthesizer.synthesize(&json!({"type": "string"}), None).unwrap(), "string");
        assert_eq!(synthesizer.synthesize(&json!({"type": "integer"}), None).unwrap(), "1");
        assert_eq!(synthesizer.synthesize(&json!({"type": "number"}), None).unwrap(), "1.5");
        assert_eq!(synthesizer.synthesize(&json!({"type": "boolean"}), None).unwrap(), "true");
    }

    #[test]
    fn test_declared_values_take_priority() {
        let synthesizer = compact();
        let schema = json!({"type": "string", "example": "Rex", "default": "Fido", "enum": ["a"]});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "Rex");

        let schema = json!({"type": "string", "default": "Fido", "enum": ["a"]});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "Fido");

        let schema = json!({"type": "string", "enum": ["available", "sold"]});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "available");

        let schema = json!({"const": 42});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "42");
    }

    #[test]
    fn test_named_example_is_selected_by_hint() {
        let synthesizer = compact();
        let schema = json!({
            "type": "string",
            "examples": {
                "first": { "value": "one" },
                "second": { "value": "two" }
            }
        });
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "one");
        assert_eq!(synthesizer.synthesize(&schema, Some("second")).unwrap(), "two");
        assert_eq!(synthesizer.synthesize(&schema, Some("missing")).unwrap(), "one");
    }

    #[test]
    fn test_object_properties_in_declared_order() {
        let synthesizer = compact();
        let schema = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer", "minimum": 3},
                "opaque": {}
            }
        });
        assert_eq!(
            synthesizer.synthesize(&schema, None).unwrap(),
            r#"{"name":"string","age":3}"#
        );
    }

    #[test]
    fn test_pretty_output_by_default() {
        let synthesizer = MockSynthesizer::new(Draft::Draft4);
        let schema = json!({"type": "object", "properties": {"name": {"type": "string"}}});
        assert_eq!(
            synthesizer.synthesize(&schema, None).unwrap(),
            "{\n  \"name\": \"string\"\n}"
        );
    }

    #[test]
    fn test_arrays_and_additional_properties() {
        let synthesizer = compact();
        let schema = json!({"type": "array", "items": {"type": "integer"}, "minItems": 2});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "[1,1]");

        let schema = json!({"type": "array", "items": {}});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "[]");

        let schema = json!({"type": "object", "additionalProperties": {"type": "boolean"}});
        assert_eq!(
            synthesizer.synthesize(&schema, None).unwrap(),
            r#"{"additionalProp1":true}"#
        );
    }

    #[test]
    fn test_composition() {
        let synthesizer = compact();
        let schema = json!({
            "allOf": [
                {"type": "object", "properties": {"id": {"type": "integer"}}},
                {"properties": {"tag": {"type": "string"}}}
            ]
        });
        assert_eq!(
            synthesizer.synthesize(&schema, None).unwrap(),
            r#"{"id":1,"tag":"string"}"#
        );

        let schema = json!({"anyOf": [{}, {"type": "string", "format": "email"}]});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "user@example.com");
    }

    #[test]
    fn test_string_formats_and_lengths() {
        let synthesizer = compact();
        let schema = json!({"type": "string", "format": "date-time"});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "2017-07-21T17:32:28Z");

        let schema = json!({"type": "string", "minLength": 8});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "stringxx");

        let schema = json!({"type": "string", "maxLength": 3});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "str");
    }

    #[test]
    fn test_oversized_strings_and_arrays_fail() {
        let synthesizer = compact();
        let schema = json!({"type": "string", "minLength": 5000});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap().len(), 5000);

        let schema = json!({"type": "string", "minLength": MAX_STRING_LENGTH + 1});
        let result = synthesizer.synthesize(&schema, None);
        assert!(matches!(result, Err(SynthesisError::SynthesisFailed(_))));

        let schema = json!({
            "type": "array",
            "items": {"type": "object", "properties": {"id": {"type": "integer"}}},
            "minItems": 1_000_000_000_000_000_000u64
        });
        let result = synthesizer.synthesize(&schema, None);
        assert!(matches!(result, Err(SynthesisError::SynthesisFailed(_))));

        let schema = json!({
            "type": "array",
            "items": {"type": "string", "minLength": 60000},
            "minItems": 100
        });
        let result = synthesizer.synthesize(&schema, None);
        assert!(matches!(result, Err(SynthesisError::SynthesisFailed(_))));
    }

    #[test]
    fn test_oversized_property_is_omitted() {
        let schema = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "tags": {"type": "array", "items": {"type": "string"}, "minItems": 1_000_000_000u64}
            }
        });
        assert_eq!(compact().synthesize(&schema, None).unwrap(), r#"{"name":"string"}"#);
    }

    #[test]
    fn test_required_free_form_property_gets_placeholder() {
        let schema = json!({
            "type": "object",
            "required": ["id", "meta", "parent"],
            "properties": {
                "id": {"type": "string"},
                "meta": {"description": "free-form"},
                "parent": {},
                "notes": {"description": "optional and free-form"}
            }
        });
        assert_eq!(
            compact().synthesize(&schema, None).unwrap(),
            r#"{"id":"string","meta":{},"parent":{}}"#
        );
    }

    #[test]
    fn test_nested_declared_values_are_not_validated() {
        let synthesizer = compact();
        let schema = json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": {"type": "string"},
                "tag": {"type": "string", "nullable": true, "default": null},
                "count": {"type": "integer", "example": "many"}
            }
        });
        assert_eq!(
            synthesizer.synthesize(&schema, None).unwrap(),
            r#"{"id":"string","tag":null,"count":"many"}"#
        );

        let schema = json!({
            "allOf": [
                {"type": "object", "properties": {"id": {"type": "integer"}}},
                {"example": {"id": "abc"}}
            ]
        });
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), r#"{"id":"abc"}"#);
    }

    #[test]
    fn test_nullable_admits_null_when_validating() {
        let schema = json!({
            "type": "object",
            "properties": {
                "tag": {"type": "string", "nullable": true},
                "labels": {"type": ["string"], "nullable": true, "maxLength": 3}
            }
        });
        assert_eq!(
            MockSynthesizer::validation_schema(&schema),
            json!({
                "type": "object",
                "properties": {
                    "tag": {"type": ["string", "null"], "nullable": true},
                    "labels": {"type": ["string", "null"], "nullable": true, "maxLength": 3}
                }
            })
        );
        assert_eq!(
            compact().synthesize(&schema, None).unwrap(),
            r#"{"tag":"string","labels":"str"}"#
        );
    }

    #[test]
    fn test_numeric_bounds() {
        let synthesizer = compact();
        let schema = json!({"type": "integer", "minimum": 10, "exclusiveMinimum": true});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "11");

        let schema = json!({"type": "integer", "minimum": 5, "multipleOf": 4});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "8");

        let schema = json!({"type": "number", "maximum": 0});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "0.0");

        let synthesizer = MockSynthesizer::new(Draft::Draft202012).pretty(false);
        let schema = json!({"type": "integer", "exclusiveMinimum": 1});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "2");
    }

    #[test]
    fn test_nullable_type_array() {
        let synthesizer = MockSynthesizer::new(Draft::Draft202012);
        let schema = json!({"type": ["null", "string"]});
        assert_eq!(synthesizer.synthesize(&schema, None).unwrap(), "string");
    }

    #[test]
    fn test_unconstrained_schema_fails() {
        let synthesizer = compact();
        let result = synthesizer.synthesize(&json!({}), None);
        assert!(matches!(result, Err(SynthesisError::SynthesisFailed(_))));

        let result = synthesizer.synthesize(&json!({"description": "anything"}), None);
        assert!(matches!(result, Err(SynthesisError::SynthesisFailed(_))));
    }

    #[test]
    fn test_deep_nesting_fails() {
        let mut schema = json!({"type": "string"});
        for _ in 0..=MAX_DEPTH {
            schema = json!({"type": "array", "items": schema});
        }
        let synthesizer = compact();
        // The innermost arrays come back empty once the depth bound is hit.
        let value = synthesizer.synthesize(&schema, None).unwrap();
        assert!(value.contains("[]"));
        assert!(!value.contains("string"));
    }

    #[test]
    fn test_validation_rejects_generated_value() {
        let schema = json!({"type": "string", "pattern": "^[0-9]+$"});
        let result = compact().synthesize(&schema, None);
        assert!(matches!(result, Err(SynthesisError::SynthesisFailed(_))));

        let unchecked = compact().validate(false);
        assert_eq!(unchecked.synthesize(&schema, None).unwrap(), "string");
    }
}
