use crate::error::RenderError;
use crate::generator::ExamplesGenerator;
use crate::renderer::Renderer;
use crate::synthesizer::ValueSynthesizer;

/// Configures an [`ExamplesGenerator`].
///
/// # Examples
/// ```rust
/// use oas_examples::ExamplesGeneratorBuilder;
///
/// let generator = ExamplesGeneratorBuilder::new()
///     .pretty(false)
///     .header_parameters(true)
///     .example_name("success")
///     .build()
///     .unwrap();
/// ```
pub struct ExamplesGeneratorBuilder {
    pretty: bool,
    validate: bool,
    example_name: Option<String>,
    header_parameters: bool,
    synthesizer: Option<Box<dyn ValueSynthesizer>>,
}

impl Default for ExamplesGeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExamplesGeneratorBuilder {
    pub fn new() -> Self {
        Self {
            pretty: true,
            validate: true,
            example_name: None,
            header_parameters: false,
            synthesizer: None,
        }
    }

    /// Pretty-print synthesized JSON bodies. Defaults to `true`.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Validate generated values against their schema. Defaults to `true`.
    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Prefer the declared example with this name when a schema has several.
    pub fn example_name(mut self, name: impl Into<String>) -> Self {
        self.example_name = Some(name.into());
        self
    }

    /// Route `in: header` parameters to the request headers. Defaults to `false`.
    pub fn header_parameters(mut self, enabled: bool) -> Self {
        self.header_parameters = enabled;
        self
    }

    /// Replace the bundled [`MockSynthesizer`](crate::synthesizer::MockSynthesizer).
    /// `pretty` and `validate` only apply to the bundled synthesizer.
    pub fn synthesizer(mut self, synthesizer: Box<dyn ValueSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn build(self) -> Result<ExamplesGenerator, RenderError> {
        let renderer = Renderer::new()?;
        Ok(ExamplesGenerator {
            renderer,
            pretty: self.pretty,
            validate: self.validate,
            example_name: self.example_name,
            header_parameters: self.header_parameters,
            synthesizer: self.synthesizer,
        })
    }
}
