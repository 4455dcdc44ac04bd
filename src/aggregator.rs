use crate::model::{ExampleEntry, ExamplesDocument, Metadata, OperationKey, Request, Response};
use crate::synthesizer::{SynthesizerAdapter, ValueSynthesizer};
use crate::traverser::{OpenApiTraverser, TraverserError};
use crate::types::json_path::JsonPath;
use crate::types::{Operation, ParameterLocation};
use crate::{
    CONTENT_FIELD, HEADERS_FIELD, IN_FIELD, NAME_FIELD, PARAMETERS_FIELD, REQUEST_BODY_FIELD,
    RESPONSES_FIELD, SCHEMA_FIELD,
};
use log::{debug, trace};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

const DEFAULT_RESPONSE: &'static str = "default";
const EXTENSION_PREFIX: &'static str = "x-";

/// A parameter after `$ref` resolution and path/operation merging.
struct EffectiveParameter {
    name: String,
    location: String,
    definition: Value,
}

/// Walks every operation of a document and builds one [`ExampleEntry`] per
/// `(verb, path)`.
///
/// Synthesis failures never abort the walk: the affected parameter, header or
/// body is left out and the reason is logged at `debug` level.
pub struct OperationAggregator<'g> {
    traverser: &'g OpenApiTraverser,
    adapter: SynthesizerAdapter<'g>,
    header_parameters: bool,
    example_name: Option<&'g str>,
}

impl<'g> OperationAggregator<'g> {
    pub fn new(traverser: &'g OpenApiTraverser, synthesizer: &'g dyn ValueSynthesizer) -> Self {
        Self {
            traverser,
            adapter: SynthesizerAdapter::new(traverser, synthesizer),
            header_parameters: false,
            example_name: None,
        }
    }

    /// Store `in: header` parameters under the request headers instead of the
    /// request parameters.
    pub fn header_parameters(mut self, enabled: bool) -> Self {
        self.header_parameters = enabled;
        self
    }

    /// Name of the declared example the synthesizer should prefer.
    pub fn example_name(mut self, name: Option<&'g str>) -> Self {
        self.example_name = name;
        self
    }

    /// Builds the examples document for every operation of the traverser.
    ///
    /// Each response of an operation replaces the entry's response in document
    /// order, so the last status code that could be processed is the one kept.
    pub fn aggregate(&self, metadata: Metadata) -> ExamplesDocument {
        let mut operations = BTreeMap::new();
        for operation in self.traverser.operations() {
            let key = OperationKey::new(operation.verb(), operation.path());
            let mut entry = ExampleEntry::default();

            entry.request = self.build_request(operation);
            if let Err(e) = self.apply_responses(operation, &mut entry) {
                debug!("Skipping responses of {}: {}", operation.json_path(), e);
            }

            trace!("Built example for {}", key);
            operations.insert(key, entry);
        }
        ExamplesDocument::new(metadata, operations)
    }

    fn build_request(&self, operation: &Operation) -> Request {
        let mut request = Request::default();

        for parameter in self.effective_parameters(operation) {
            let location = operation
                .json_path()
                .child(PARAMETERS_FIELD)
                .child(&parameter.name);
            let Some(schema) = Self::schema_of(&parameter.definition) else {
                trace!("No schema for parameter at {}", location);
                continue;
            };
            let value = match self.adapter.synthesize(schema, self.example_name) {
                Ok(value) => value,
                Err(e) => {
                    debug!("Skipping parameter at {}: {}", location, e);
                    continue;
                }
            };
            let is_header = matches!(
                ParameterLocation::from_str(&parameter.location),
                Ok(ParameterLocation::Header)
            );
            if self.header_parameters && is_header {
                request.headers.insert(parameter.name, value);
            } else {
                request.parameters.insert(parameter.name, value);
            }
        }

        request.body = self.synthesize_request_body(operation);
        request
    }

    fn synthesize_request_body(&self, operation: &Operation) -> Option<String> {
        let location = operation.json_path().child(REQUEST_BODY_FIELD);
        let request_body = match self.traverser.get_optional(operation.data(), REQUEST_BODY_FIELD) {
            Ok(request_body) => request_body?,
            Err(e) => {
                debug!("Skipping body at {}: {}", location, e);
                return None;
            }
        };
        self.synthesize_content(request_body.value(), &location)
            .map(|(_, body)| body)
    }

    /// Path-item parameters followed by the operation's own, where an operation
    /// parameter replaces a path-item parameter with the same name and location.
    fn effective_parameters(&self, operation: &Operation) -> Vec<EffectiveParameter> {
        let location = operation.json_path().child(PARAMETERS_FIELD);
        let declared = match self.traverser.get_optional(operation.data(), PARAMETERS_FIELD) {
            Ok(None) => Vec::new(),
            Ok(Some(found)) => match OpenApiTraverser::require_array(found.value()) {
                Ok(declared) => declared.clone(),
                Err(e) => {
                    debug!("Skipping operation parameters at {}: {}", location, e);
                    Vec::new()
                }
            },
            Err(e) => {
                debug!("Skipping operation parameters at {}: {}", location, e);
                Vec::new()
            }
        };

        let mut parameters: Vec<EffectiveParameter> = Vec::new();
        for raw in operation.path_parameters.iter().chain(declared.iter()) {
            let definition = match self.traverser.resolve_possible_ref(raw) {
                Ok(resolved) => resolved.value().clone(),
                Err(e) => {
                    debug!(
                        "Skipping parameter of {}: {}",
                        operation.json_path(),
                        e
                    );
                    continue;
                }
            };
            let (name, location) = match (
                OpenApiTraverser::get_as_str(&definition, NAME_FIELD),
                OpenApiTraverser::get_as_str(&definition, IN_FIELD),
            ) {
                (Ok(name), Ok(location)) => (name.to_string(), location.to_string()),
                (Err(e), _) | (_, Err(e)) => {
                    debug!(
                        "Skipping parameter of {}: {}",
                        operation.json_path(),
                        e
                    );
                    continue;
                }
            };

            let parameter = EffectiveParameter {
                name,
                location,
                definition,
            };
            match parameters
                .iter_mut()
                .find(|p| p.name == parameter.name && p.location == parameter.location)
            {
                Some(existing) => *existing = parameter,
                None => parameters.push(parameter),
            }
        }
        parameters
    }

    fn apply_responses(
        &self,
        operation: &Operation,
        entry: &mut ExampleEntry,
    ) -> Result<(), TraverserError<'static>> {
        let Some(responses) = self
            .traverser
            .get_optional(operation.data(), RESPONSES_FIELD)
            .map_err(TraverserError::into_owned)?
        else {
            return Ok(());
        };
        let responses =
            OpenApiTraverser::require_object(responses.value()).map_err(TraverserError::into_owned)?;

        let location = operation.json_path().child(RESPONSES_FIELD);
        for (code, response) in responses {
            if code == DEFAULT_RESPONSE || code.starts_with(EXTENSION_PREFIX) {
                continue;
            }
            let response_location = location.child(code);
            match self.build_response(code, response, &response_location) {
                Ok(built) => entry.response = built,
                Err(e) => debug!("Skipping response at {}: {}", response_location, e),
            }
        }
        Ok(())
    }

    fn build_response(
        &self,
        code: &str,
        response: &Value,
        location: &JsonPath,
    ) -> Result<Response, TraverserError<'static>> {
        let resolved = self
            .traverser
            .resolve_possible_ref(response)
            .map_err(TraverserError::into_owned)?;
        let response = OpenApiTraverser::require_object(resolved.value())
            .map_err(TraverserError::into_owned)?;

        let mut built = Response {
            code: code.to_string(),
            ..Response::default()
        };

        if let Some(Value::Object(headers)) = response.get(HEADERS_FIELD) {
            let headers_location = location.child(HEADERS_FIELD);
            for (name, header) in headers {
                if let Some(value) = self.synthesize_header(header, &headers_location.child(name)) {
                    built.headers.insert(name.clone(), value);
                }
            }
        }

        if let Some((media_type, body)) = self.synthesize_content(resolved.value(), location) {
            built.media_type = Some(media_type);
            built.body = Some(body);
        }

        Ok(built)
    }

    fn synthesize_header(&self, header: &Value, location: &JsonPath) -> Option<String> {
        let header = match self.traverser.resolve_possible_ref(header) {
            Ok(header) => header,
            Err(e) => {
                debug!("Skipping header at {}: {}", location, e);
                return None;
            }
        };
        let schema = Self::schema_of(header.value())?;
        match self.adapter.synthesize(schema, self.example_name) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Skipping header at {}: {}", location, e);
                None
            }
        }
    }

    /// Synthesizes the body of the first media type declaring a schema.
    /// Returns the media type name with the body.
    fn synthesize_content(&self, holder: &Value, location: &JsonPath) -> Option<(String, String)> {
        let content = holder.get(CONTENT_FIELD).and_then(Value::as_object)?;
        let (media_type, schema) = Self::first_media_schema(content)?;
        match self.adapter.synthesize(schema, self.example_name) {
            Ok(body) => Some((media_type.clone(), body)),
            Err(e) => {
                debug!(
                    "Skipping body at {}: {}",
                    location.child(CONTENT_FIELD).child(media_type),
                    e
                );
                None
            }
        }
    }

    /// The schema of a parameter or header: its own `schema`, or the schema of
    /// its first `content` entry.
    fn schema_of(definition: &Value) -> Option<&Value> {
        if let Some(schema) = definition.get(SCHEMA_FIELD) {
            return Some(schema);
        }
        let content = definition.get(CONTENT_FIELD).and_then(Value::as_object)?;
        Self::first_media_schema(content).map(|(_, schema)| schema)
    }

    fn first_media_schema(content: &Map<String, Value>) -> Option<(&String, &Value)> {
        content
            .iter()
            .find_map(|(media_type, media)| media.get(SCHEMA_FIELD).map(|schema| (media_type, schema)))
    }
}
