pub mod builder;

use crate::aggregator::OperationAggregator;
use crate::document::SpecificationDocument;
use crate::error::GenerateError;
use crate::model::{ExamplesDocument, Metadata};
use crate::renderer::Renderer;
use crate::synthesizer::{MockSynthesizer, ValueSynthesizer};
use log::debug;
use serde_json::Value;

/// Turns OpenAPI specifications into examples documents and renders them.
///
/// Built with [`ExamplesGeneratorBuilder`](builder::ExamplesGeneratorBuilder).
/// Every call works on a freshly parsed document; nothing is kept between calls.
pub struct ExamplesGenerator {
    pub(crate) renderer: Renderer,
    pub(crate) pretty: bool,
    pub(crate) validate: bool,
    pub(crate) example_name: Option<String>,
    pub(crate) header_parameters: bool,
    pub(crate) synthesizer: Option<Box<dyn ValueSynthesizer>>,
}

impl ExamplesGenerator {
    /// Parses `specification` (YAML or JSON) and builds its examples.
    ///
    /// # Returns
    /// * `Ok(ExamplesDocument)` - one entry per operation; fields that could not
    ///   be synthesized are left out.
    /// * `Err(GenerateError)` - the content is unparseable or not an OpenAPI 3 document.
    pub fn generate(&self, specification: &[u8]) -> Result<ExamplesDocument, GenerateError> {
        let document = SpecificationDocument::from_slice(specification)?;
        Ok(self.examples_for(&document))
    }

    /// Same as [`generate`](Self::generate) for an already parsed specification.
    pub fn generate_from_value(&self, specification: Value) -> Result<ExamplesDocument, GenerateError> {
        let document = SpecificationDocument::from_value(specification)?;
        Ok(self.examples_for(&document))
    }

    pub fn examples_for(&self, document: &SpecificationDocument) -> ExamplesDocument {
        let bundled;
        let synthesizer: &dyn ValueSynthesizer = match &self.synthesizer {
            Some(synthesizer) => synthesizer.as_ref(),
            None => {
                bundled = MockSynthesizer::new(document.openapi_version().get_draft())
                    .pretty(self.pretty)
                    .validate(self.validate);
                &bundled
            }
        };

        let examples = OperationAggregator::new(document.traverser(), synthesizer)
            .header_parameters(self.header_parameters)
            .example_name(self.example_name.as_deref())
            .aggregate(Metadata::new(document.title(), document.version()));
        debug!("Generated {} operation examples", examples.operations().len());
        examples
    }

    /// Renders `examples` into the Microcks `APIExamples` layout.
    pub fn render(&self, examples: &ExamplesDocument) -> Result<String, GenerateError> {
        Ok(self.renderer.render(examples)?)
    }
}
