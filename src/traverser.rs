use crate::types::json_path::JsonPath;
use crate::types::Operation;
use crate::{PARAMETERS_FIELD, PATHS_FIELD, REF_FIELD};
use dashmap::{DashMap, Entry};
use http::Method;
use log::trace;
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::hash::Hash;
use std::sync::Arc;

type TraverseSearchResult<'a> = Result<SearchResult<'a>, TraverserError<'a>>;
type TraverseOptionalSearchResult<'a> = Result<Option<SearchResult<'a>>, TraverserError<'a>>;
type TraverseTypeResult<'a, T> = Result<&'a T, TraverserError<'a>>;
type SchemaBuildResult = Result<Value, TraverserError<'static>>;

/// Path-item keys that declare operations.
const OPERATION_METHODS: [Method; 8] = [
    Method::GET,
    Method::PUT,
    Method::POST,
    Method::DELETE,
    Method::OPTIONS,
    Method::HEAD,
    Method::PATCH,
    Method::TRACE,
];

/// Schema keywords whose values are data, never schemas.
const LITERAL_KEYWORDS: [&'static str; 5] = ["example", "examples", "default", "const", "enum"];

/// Schema keywords whose values map arbitrary names to schemas.
const NAMED_SCHEMA_KEYWORDS: [&'static str; 4] =
    ["properties", "patternProperties", "$defs", "definitions"];

/// Error types that can occur during OpenAPI specification traversal.
///
/// This enum represents various error conditions that may arise when
/// navigating through an OpenAPI specification document or resolving
/// its references.
#[derive(Debug)]
pub enum TraverserError<'a> {
    /// A required field was not found in the specification.
    MissingField(Cow<'a, str>),

    /// The found type does not match the expected type.
    TypeMismatch {
        expected: Cow<'a, str>,
        found: Cow<'a, str>,
    },

    /// The structure of the specification is invalid or unsupported.
    InvalidStructure(Cow<'a, str>),

    /// A chain of references leads back to itself.
    CyclicReference(Cow<'a, str>),
}

impl<'a> TraverserError<'a> {
    /// Creates a new `MissingField` error.
    ///
    /// # Parameters
    /// - `message`: The field name or reference that was missing
    #[inline]
    pub(crate) fn missing_field(message: impl Into<Cow<'a, str>>) -> Self {
        Self::MissingField(message.into())
    }

    /// Creates a new `TypeMismatch` error.
    ///
    /// # Parameters
    /// - `expected`: The expected type description
    /// - `found`: The actual type that was found
    #[inline]
    pub(crate) fn type_mismatch(
        expected: impl Into<Cow<'a, str>>,
        found: impl Into<Cow<'a, str>>,
    ) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates a new `InvalidStructure` error.
    ///
    /// # Parameters
    /// - `message`: Description of the structural issue
    #[inline]
    pub(crate) fn invalid_structure(message: impl Into<Cow<'a, str>>) -> Self {
        Self::InvalidStructure(message.into())
    }

    /// Creates a new `CyclicReference` error.
    ///
    /// # Parameters
    /// - `message`: The reference that closed the cycle
    #[inline]
    pub(crate) fn cyclic_reference(message: impl Into<Cow<'a, str>>) -> Self {
        Self::CyclicReference(message.into())
    }

    /// Detaches the error from the document it was raised against.
    pub fn into_owned(self) -> TraverserError<'static> {
        match self {
            TraverserError::MissingField(field) => {
                TraverserError::MissingField(Cow::Owned(field.into_owned()))
            }
            TraverserError::TypeMismatch { expected, found } => TraverserError::TypeMismatch {
                expected: Cow::Owned(expected.into_owned()),
                found: Cow::Owned(found.into_owned()),
            },
            TraverserError::InvalidStructure(message) => {
                TraverserError::InvalidStructure(Cow::Owned(message.into_owned()))
            }
            TraverserError::CyclicReference(reference) => {
                TraverserError::CyclicReference(Cow::Owned(reference.into_owned()))
            }
        }
    }
}

impl Display for TraverserError<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TraverserError::MissingField(field) => {
                write!(f, "Missing field: {}", field)
            }
            TraverserError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            TraverserError::InvalidStructure(field) => {
                write!(f, "Invalid structure: {}", field)
            }
            TraverserError::CyclicReference(field) => {
                write!(f, "Cyclic reference: {}", field)
            }
        }
    }
}

impl std::error::Error for TraverserError<'_> {}

/// Represents the result of a search operation within the OpenAPI specification.
///
/// Nodes reached through a `$ref` come back as cached `Arc` values, everything
/// else is borrowed straight from the document.
#[derive(Debug)]
pub enum SearchResult<'a> {
    /// A search yielding a cached reference.
    Arc(Arc<Value>),

    /// A search result yielding a sub-node (no reference string)
    Ref(&'a Value),
}

impl<'a> SearchResult<'a> {
    /// Returns a reference to the underlying JSON value.
    pub fn value(&self) -> &Value {
        match self {
            SearchResult::Arc(arc_val) => arc_val,
            SearchResult::Ref(val) => val,
        }
    }
}

/// Main traverser for OpenAPI specifications.
///
/// Owns the parsed document, collects its operations in document order and
/// resolves local references, caching every resolved reference for the
/// lifetime of the traverser.
pub struct OpenApiTraverser {
    specification: Value,
    resolved_references: DashMap<String, Arc<Value>>,
    operations: Vec<Arc<Operation>>,
}

impl OpenApiTraverser {
    /// Creates a new OpenAPI traverser from a specification document.
    ///
    /// # Parameters
    /// - `specification`: The complete OpenAPI specification as a JSON Value
    ///
    /// # Returns
    /// A new `OpenApiTraverser` with every operation of the document collected.
    ///
    /// # Examples
    /// ```rust
    /// use serde_json::json;
    /// use oas_examples::traverser::OpenApiTraverser;
    ///
    /// let spec = json!({
    ///     "openapi": "3.0.0",
    ///     "info": {"title": "API", "version": "1.0.0"},
    ///     "paths": {
    ///         "/users": {
    ///             "get": {"summary": "Get users"},
    ///             "post": {"summary": "Create user"}
    ///         }
    ///     }
    /// });
    ///
    /// let traverser = OpenApiTraverser::new(spec).unwrap();
    /// assert_eq!(traverser.operations().len(), 2);
    /// ```
    pub fn new(specification: Value) -> Result<Self, TraverserError<'static>> {
        let mut traverser = Self {
            specification,
            resolved_references: DashMap::new(),
            operations: Vec::new(),
        };
        traverser.operations = traverser.crawl_paths()?;
        Ok(traverser)
    }

    /// Walks every path item in document order and collects its operations,
    /// also in document order.
    fn crawl_paths(&self) -> Result<Vec<Arc<Operation>>, TraverserError<'static>> {
        let spec_paths = match Self::get_as_object(&self.specification, PATHS_FIELD) {
            Ok(paths) => paths,
            Err(TraverserError::MissingField(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into_owned()),
        };

        let mut operations = Vec::new();
        for (spec_path, spec_path_item) in spec_paths {
            let path_item = self
                .resolve_possible_ref(spec_path_item)
                .map_err(TraverserError::into_owned)?;
            let path_item =
                Self::require_object(path_item.value()).map_err(TraverserError::into_owned)?;

            let path_parameters = match path_item.get(PARAMETERS_FIELD) {
                None => Vec::new(),
                Some(parameters) => Self::require_array(parameters)
                    .map_err(TraverserError::into_owned)?
                    .clone(),
            };

            for (spec_method, spec_operation) in path_item {
                if !Self::is_operation_method(spec_method) {
                    continue;
                }
                Self::require_object(spec_operation).map_err(TraverserError::into_owned)?;

                let mut json_path = JsonPath::new();
                json_path.add(PATHS_FIELD).add(spec_path).add(spec_method);
                trace!("Collected operation at {}", json_path);
                operations.push(Arc::new(Operation {
                    verb: spec_method.to_string(),
                    path: spec_path.to_string(),
                    data: spec_operation.clone(),
                    path_parameters: path_parameters.clone(),
                    json_path,
                }));
            }
        }
        Ok(operations)
    }

    /// Checks whether a path-item key names an HTTP operation.
    /// Only the lowercase spelling (`get`, not `GET`) is an operation.
    pub(crate) fn is_operation_method(key: &str) -> bool {
        key.bytes().all(|byte| byte.is_ascii_lowercase())
            && Method::from_bytes(key.to_ascii_uppercase().as_bytes())
                .is_ok_and(|method| OPERATION_METHODS.contains(&method))
    }

    /// Resolves a value using caching to avoid redundant computations.
    ///
    /// # Parameters
    /// - `cache`: The cache to use for storing/retrieving values
    /// - `key`: The key to cache the result under
    /// - `resolver`: Function to compute the value if not cached
    ///
    /// # Returns
    /// The resolved value wrapped in Arc, either from cache or newly computed.
    fn resolve_with_cache<'a, K, V, F>(
        cache: &DashMap<K, Arc<V>>,
        key: K,
        resolver: F,
    ) -> Result<Arc<V>, TraverserError<'a>>
    where
        K: Eq + Hash,
        F: FnOnce() -> Result<Arc<V>, TraverserError<'a>>,
    {
        let entry = cache.entry(key);
        match entry {
            Entry::Occupied(e) => Ok(e.get().clone()),
            Entry::Vacant(e) => {
                let result = resolver()?;
                e.insert(result.clone());
                Ok(result)
            }
        }
    }

    /// Returns a reference to the underlying OpenAPI specification.
    pub fn specification(&self) -> &Value {
        &self.specification
    }

    /// Every operation of the document, ordered by path and then by verb as
    /// they appear in the document.
    pub fn operations(&self) -> &[Arc<Operation>] {
        &self.operations
    }

    /// Retrieves an optional field from a JSON node, returning None if missing.
    ///
    /// # Parameters
    /// - `node`: The JSON node to search in
    /// - `field`: The field name to look for
    ///
    /// # Returns
    /// `Some(SearchResult)` if the field exists, `None` if missing, or an error for other issues.
    ///
    /// # Behavior
    /// This method resolves references automatically and distinguishes between
    /// missing fields (returns None) and other errors (propagates the error).
    pub fn get_optional<'node>(
        &'node self,
        node: &'node Value,
        field: &'node str,
    ) -> TraverseOptionalSearchResult<'node> {
        match self.get_required(node, field) {
            Ok(found) => Ok(Some(found)),
            Err(e) => match e {
                TraverserError::MissingField(_) => Ok(None),
                _ => Err(e),
            },
        }
    }

    /// Retrieves a required field from a JSON node, failing if missing.
    ///
    /// # Parameters
    /// - `node`: The JSON node to search in
    /// - `field`: The field name that must exist
    ///
    /// # Returns
    /// A `SearchResult` containing the field value, or an error if missing or invalid.
    ///
    /// # Behavior
    /// Resolves the node itself when it is a `$ref`, then resolves the field value
    /// when that is a `$ref` as well.
    pub fn get_required<'node>(
        &'node self,
        node: &'node Value,
        field: &'node str,
    ) -> TraverseSearchResult<'node> {
        let ref_result = self.resolve_possible_ref(node)?;
        let found = match ref_result {
            SearchResult::Arc(val) => match val.get(field) {
                None => return Err(TraverserError::missing_field(field)),
                Some(v) => SearchResult::Arc(Arc::new(v.clone())),
            },
            SearchResult::Ref(val) => match val.get(field) {
                None => return Err(TraverserError::missing_field(field)),
                Some(v) => SearchResult::Ref(v),
            },
        };
        match found {
            SearchResult::Ref(val) => self.resolve_possible_ref(val),
            SearchResult::Arc(val) => {
                let ref_string = val.get(REF_FIELD).and_then(Value::as_str).map(str::to_owned);
                match ref_string {
                    Some(ref_string) => {
                        let target = self
                            .follow_reference_chain(&ref_string)
                            .map_err(TraverserError::into_owned)?;
                        Ok(SearchResult::Arc(Arc::new(target.clone())))
                    }
                    None => Ok(SearchResult::Arc(val)),
                }
            }
        }
    }

    /// Resolves a JSON node that might contain a $ref reference.
    ///
    /// # Parameters
    /// - `node`: The JSON node to potentially resolve
    ///
    /// # Returns
    /// A `SearchResult` containing either the original node or the resolved reference.
    pub fn resolve_possible_ref<'node>(
        &'node self,
        node: &'node Value,
    ) -> TraverseSearchResult<'node> {
        if let Ok(ref_string) = Self::get_as_str(node, REF_FIELD) {
            let result = Self::resolve_with_cache(
                &self.resolved_references,
                String::from(ref_string),
                || {
                    let target = self.follow_reference_chain(ref_string)?;
                    Ok(Arc::new(target.clone()))
                },
            )?;
            return Ok(SearchResult::Arc(result));
        }
        Ok(SearchResult::Ref(node))
    }

    /// Follows a reference, and any reference it lands on, to the first
    /// node that is not itself a reference.
    ///
    /// # Parameters
    /// - `ref_string`: The reference string to resolve (e.g., "#/components/schemas/User")
    ///
    /// # Returns
    /// The resolved JSON node or an error if the reference is invalid or circular.
    fn follow_reference_chain<'node>(
        &'node self,
        ref_string: &'node str,
    ) -> TraverseTypeResult<'node, Value> {
        let mut seen_references = HashSet::new();
        let mut current = ref_string;
        loop {
            if !seen_references.insert(current) {
                return Err(TraverserError::cyclic_reference(current));
            }
            let target = self.lookup_reference(current)?;
            match Self::get_as_str(target, REF_FIELD) {
                Ok(next) => current = next,
                Err(_) => return Ok(target),
            }
        }
    }

    /// Looks up a single local reference in the document.
    ///
    /// The fragment is percent-decoded and then evaluated as a JSON pointer, so
    /// `~1` and `~0` escapes are honoured.
    fn lookup_reference<'node>(&'node self, ref_string: &'node str) -> TraverseTypeResult<'node, Value> {
        let fragment = match ref_string.strip_prefix('#') {
            Some(fragment) => fragment,
            None => {
                return Err(TraverserError::invalid_structure(format!(
                    "external reference '{}' is not supported",
                    ref_string
                )));
            }
        };
        let pointer = match percent_decode_str(fragment).decode_utf8() {
            Ok(pointer) => pointer,
            Err(_) => {
                return Err(TraverserError::invalid_structure(format!(
                    "reference '{}' is not valid UTF-8",
                    ref_string
                )));
            }
        };
        match self.specification.pointer(&pointer) {
            None => Err(TraverserError::missing_field(ref_string)),
            Some(target) => Ok(target),
        }
    }

    /// Builds a self-contained schema by replacing every `$ref` with its target.
    ///
    /// # Parameters
    /// - `schema`: The schema node, possibly a reference itself
    ///
    /// # Returns
    /// A copy of the schema with no local references left, or an error when a
    /// reference cannot be resolved.
    ///
    /// # Behavior
    /// A reference that is already being expanded further up the tree is
    /// replaced with an empty (unconstrained) schema, so recursive structures
    /// produce a finite result. Keywords that carry data (`example`, `default`,
    /// `enum`, ...) are copied untouched.
    pub fn dereference(&self, schema: &Value) -> SchemaBuildResult {
        let mut active_references = Vec::new();
        self.dereference_node(schema, &mut active_references)
    }

    fn dereference_node(&self, node: &Value, active_references: &mut Vec<String>) -> SchemaBuildResult {
        match node {
            Value::Object(object) => {
                if let Some(ref_string) = object.get(REF_FIELD).and_then(Value::as_str) {
                    return self.dereference_reference(ref_string, object, active_references);
                }
                let mut dereferenced = Map::with_capacity(object.len());
                for (key, value) in object {
                    let value = self.dereference_keyword(key, value, active_references)?;
                    dereferenced.insert(key.clone(), value);
                }
                Ok(Value::Object(dereferenced))
            }
            Value::Array(items) => {
                let mut dereferenced = Vec::with_capacity(items.len());
                for item in items {
                    dereferenced.push(self.dereference_node(item, active_references)?);
                }
                Ok(Value::Array(dereferenced))
            }
            other => Ok(other.clone()),
        }
    }

    fn dereference_reference(
        &self,
        ref_string: &str,
        siblings: &Map<String, Value>,
        active_references: &mut Vec<String>,
    ) -> SchemaBuildResult {
        if active_references.iter().any(|active| active == ref_string) {
            trace!("Cutting recursive reference '{}'", ref_string);
            return Ok(Value::Object(Map::new()));
        }
        let target = self
            .lookup_reference(ref_string)
            .map_err(TraverserError::into_owned)?;

        active_references.push(ref_string.to_string());
        let resolved = self.dereference_node(target, active_references);
        active_references.pop();
        let mut resolved = resolved?;

        // Keywords next to a $ref (allowed from 3.1) refine the target.
        if let Value::Object(resolved_object) = &mut resolved {
            for (key, value) in siblings {
                if key != REF_FIELD {
                    let value = self.dereference_keyword(key, value, active_references)?;
                    resolved_object.insert(key.clone(), value);
                }
            }
        }
        Ok(resolved)
    }

    fn dereference_keyword(
        &self,
        keyword: &str,
        value: &Value,
        active_references: &mut Vec<String>,
    ) -> SchemaBuildResult {
        if LITERAL_KEYWORDS.contains(&keyword) {
            return Ok(value.clone());
        }
        if NAMED_SCHEMA_KEYWORDS.contains(&keyword) {
            if let Value::Object(named) = value {
                let mut dereferenced = Map::with_capacity(named.len());
                for (name, schema) in named {
                    dereferenced.insert(
                        name.clone(),
                        self.dereference_node(schema, active_references)?,
                    );
                }
                return Ok(Value::Object(dereferenced));
            }
        }
        self.dereference_node(value, active_references)
    }

    /// Generic helper for extracting typed values from JSON nodes.
    ///
    /// # Parameters
    /// - `node`: The JSON node containing the field
    /// - `field`: The field name to extract
    /// - `converter`: Function to convert the raw Value to the desired type
    ///
    /// # Returns
    /// A reference to the converted type or a TraverserError.
    fn get_as_type<'n, 's, T, F>(
        node: &'n Value,
        field: &'n str,
        converter: F,
    ) -> TraverseTypeResult<'s, T>
    where
        'n: 's,
        T: ?Sized,
        F: Fn(&'n Value) -> TraverseTypeResult<'s, T>,
    {
        match node.get(field) {
            None => Err(TraverserError::missing_field(field)),
            Some(found) => converter(found),
        }
    }

    /// Generic helper for requiring specific types with proper error messages.
    ///
    /// # Parameters
    /// - `node`: The JSON node to convert
    /// - `converter`: Function that attempts the type conversion
    /// - `type_name`: Name of the expected type for error reporting
    ///
    /// # Returns
    /// The converted value or a type mismatch error.
    fn require_type<'n, 's, T, F>(
        node: &'n Value,
        converter: F,
        type_name: &'static str,
    ) -> Result<T, TraverserError<'s>>
    where
        'n: 's,
        F: Fn(&'n Value) -> Option<T>,
    {
        converter(node).ok_or(TraverserError::type_mismatch(
            type_name,
            format!("{}", node),
        ))
    }

    /// Extracts a string field from a JSON node.
    pub(crate) fn get_as_str<'n, 's>(node: &'n Value, field: &'n str) -> TraverseTypeResult<'s, str>
    where
        'n: 's,
    {
        Self::get_as_type(node, field, Self::require_str)
    }

    /// Extracts an object field from a JSON node.
    pub(crate) fn get_as_object<'n, 's>(
        node: &'n Value,
        field: &'n str,
    ) -> TraverseTypeResult<'s, Map<String, Value>>
    where
        'n: 's,
    {
        Self::get_as_type(node, field, Self::require_object)
    }

    /// Requires a JSON value to be a string.
    pub(crate) fn require_str<'n, 's>(node: &'n Value) -> TraverseTypeResult<'s, str>
    where
        'n: 's,
    {
        Self::require_type(node, Value::as_str, "string")
    }

    /// Requires a JSON value to be an object.
    pub(crate) fn require_object<'n, 's>(
        node: &'n Value,
    ) -> TraverseTypeResult<'s, Map<String, Value>>
    where
        'n: 's,
    {
        Self::require_type(node, Value::as_object, "object")
    }

    /// Requires a JSON value to be an array.
    pub(crate) fn require_array<'n, 's>(node: &'n Value) -> TraverseTypeResult<'s, Vec<Value>>
    where
        'n: 's,
    {
        Self::require_type(node, Value::as_array, "array")
    }
}
