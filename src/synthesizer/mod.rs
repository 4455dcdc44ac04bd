pub mod mock;

use crate::traverser::OpenApiTraverser;
use serde_json::Value;
use std::fmt::{Display, Formatter};

pub use mock::MockSynthesizer;

/// Produces a serialized example value for a single, fully dereferenced schema.
///
/// Implementations receive schemas with no `$ref` left in them. `format_hint`
/// names a preferred declared example; implementations are free to ignore it.
pub trait ValueSynthesizer {
    fn synthesize(&self, schema: &Value, format_hint: Option<&str>) -> Result<String, SynthesisError>;
}

#[derive(Debug, PartialEq)]
pub enum SynthesisError {
    /// The schema could not be resolved into a self-contained form.
    SchemaBuildFailed(String),

    /// The schema was resolved but no value could be produced for it.
    SynthesisFailed(String),
}

impl SynthesisError {
    pub fn schema_build_failed<T>(message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        Self::SchemaBuildFailed(message.to_string())
    }

    pub fn synthesis_failed<T>(message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        Self::SynthesisFailed(message.to_string())
    }
}

impl Display for SynthesisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthesisError::SchemaBuildFailed(message) => {
                write!(f, "Schema build failed: {}", message)
            }
            SynthesisError::SynthesisFailed(message) => {
                write!(f, "Synthesis failed: {}", message)
            }
        }
    }
}

impl std::error::Error for SynthesisError {}

/// Narrow synthesis entry point used by the aggregator: builds the schema
/// against the document, then hands it to the configured synthesizer.
///
/// Each call is independent; nothing is cached or retried here.
pub struct SynthesizerAdapter<'a> {
    traverser: &'a OpenApiTraverser,
    synthesizer: &'a dyn ValueSynthesizer,
}

impl<'a> SynthesizerAdapter<'a> {
    pub fn new(traverser: &'a OpenApiTraverser, synthesizer: &'a dyn ValueSynthesizer) -> Self {
        Self {
            traverser,
            synthesizer,
        }
    }

    pub fn synthesize(&self, schema: &Value, format_hint: Option<&str>) -> Result<String, SynthesisError> {
        let schema = match self.traverser.dereference(schema) {
            Ok(schema) => schema,
            Err(e) => return Err(SynthesisError::schema_build_failed(&e)),
        };
        self.synthesizer.synthesize(&schema, format_hint)
    }
}
