pub mod aggregator;
pub mod document;
pub mod error;
pub mod generator;
pub mod input;
pub mod model;
pub mod renderer;
pub mod synthesizer;
pub mod traverser;
pub mod types;

pub use crate::error::{GenerateError, RenderError};
pub use crate::generator::ExamplesGenerator;
pub use crate::generator::builder::ExamplesGeneratorBuilder;
pub use crate::model::{ExampleEntry, ExamplesDocument, Metadata, OperationKey, Request, Response};
pub use crate::synthesizer::{SynthesisError, ValueSynthesizer};

const CONTENT_FIELD: &'static str = "content";
const SCHEMA_FIELD: &'static str = "schema";
const REQUEST_BODY_FIELD: &'static str = "requestBody";
const RESPONSES_FIELD: &'static str = "responses";
const HEADERS_FIELD: &'static str = "headers";
const PATHS_FIELD: &'static str = "paths";
const PARAMETERS_FIELD: &'static str = "parameters";
const INFO_FIELD: &'static str = "info";
const TITLE_FIELD: &'static str = "title";
const VERSION_FIELD: &'static str = "version";
const REF_FIELD: &'static str = "$ref";
const PATH_SEPARATOR: &'static str = "/";
const TILDE: &'static str = "~";
const ENCODED_BACKSLASH: &'static str = "~1";
const ENCODED_TILDE: &'static str = "~0";
const NAME_FIELD: &'static str = "name";
const OPENAPI_FIELD: &'static str = "openapi";
const IN_FIELD: &'static str = "in";

/// Parses `specification` (YAML or JSON) and builds the examples document with the
/// default generator configuration.
///
/// # Examples
/// ```rust
/// let spec = br#"
/// openapi: 3.0.3
/// info:
///   title: Petstore
///   version: 1.0.0
/// paths:
///   /pets:
///     get:
///       responses:
///         '200':
///           description: ok
/// "#;
/// let examples = oas_examples::generate_api_examples(spec).unwrap();
/// assert_eq!(examples.operations().len(), 1);
/// ```
pub fn generate_api_examples(specification: &[u8]) -> Result<ExamplesDocument, GenerateError> {
    ExamplesGeneratorBuilder::new()
        .build()?
        .generate(specification)
}

/// Renders `examples` into the Microcks `APIExamples` layout.
pub fn render_api_examples(examples: &ExamplesDocument) -> Result<String, GenerateError> {
    let renderer = renderer::Renderer::new()?;
    Ok(renderer.render(examples)?)
}
