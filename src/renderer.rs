use crate::error::RenderError;
use crate::model::{ExamplesDocument, Metadata};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tera::{Context, Tera};

const TEMPLATE_NAME: &'static str = "api_examples.yaml";
const TEMPLATE: &'static str = include_str!("templates/api_examples.yaml.tera");

/// Column at which embedded bodies start.
pub const BLOCK_INDENT: usize = 10;

/// Renders an [`ExamplesDocument`] into the Microcks `APIExamples` YAML layout.
///
/// The template is compiled once; a `Renderer` can be reused for any number of
/// documents.
pub struct Renderer {
    tera: Tera,
}

#[derive(Serialize)]
struct TemplateDocument<'a> {
    api_version: &'a str,
    kind: &'a str,
    metadata: &'a Metadata,
    operations: Vec<TemplateOperation<'a>>,
}

#[derive(Serialize)]
struct TemplateOperation<'a> {
    key: String,
    request: TemplateRequest<'a>,
    response: TemplateResponse<'a>,
}

#[derive(Serialize)]
struct TemplateRequest<'a> {
    parameters: Vec<TemplateField<'a>>,
    headers: Vec<TemplateField<'a>>,
    body: Option<&'a str>,
}

#[derive(Serialize)]
struct TemplateResponse<'a> {
    headers: Vec<TemplateField<'a>>,
    media_type: Option<&'a str>,
    code: &'a str,
    body: Option<&'a str>,
}

#[derive(Serialize)]
struct TemplateField<'a> {
    name: &'a str,
    value: &'a str,
    multiline: bool,
}

impl<'a> TemplateDocument<'a> {
    fn from_examples(examples: &'a ExamplesDocument) -> Self {
        let operations = examples
            .operations()
            .iter()
            .map(|(key, entry)| TemplateOperation {
                key: key.to_string().replace('\'', "''"),
                request: TemplateRequest {
                    parameters: TemplateField::from_map(&entry.request.parameters),
                    headers: TemplateField::from_map(&entry.request.headers),
                    body: entry.request.body.as_deref(),
                },
                response: TemplateResponse {
                    headers: TemplateField::from_map(&entry.response.headers),
                    media_type: entry.response.media_type.as_deref(),
                    code: &entry.response.code,
                    body: entry.response.body.as_deref(),
                },
            })
            .collect();

        Self {
            api_version: examples.api_version(),
            kind: examples.kind(),
            metadata: examples.metadata(),
            operations,
        }
    }
}

impl<'a> TemplateField<'a> {
    fn from_map(fields: &'a BTreeMap<String, String>) -> Vec<Self> {
        fields
            .iter()
            .map(|(name, value)| TemplateField {
                name,
                value,
                multiline: value.contains('\n'),
            })
            .collect()
    }
}

impl Renderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.register_filter("block_indent", block_indent);
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Renders `examples`. Bodies are embedded verbatim as `|-` block literals,
    /// every line shifted right by [`BLOCK_INDENT`] columns.
    pub fn render(&self, examples: &ExamplesDocument) -> Result<String, RenderError> {
        let document = TemplateDocument::from_examples(examples);
        let context = Context::from_serialize(&document)?;
        let mut rendered = self.tera.render(TEMPLATE_NAME, &context)?;
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        Ok(rendered)
    }
}

/// Prefixes every line of `text`, blank lines included, with `width` spaces.
pub fn indent_lines(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    format!("{}{}", pad, text.replace('\n', &format!("\n{}", pad)))
}

fn block_indent(value: &tera::Value, args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
    let text = tera::try_get_value!("block_indent", "value", String, value);
    let width = match args.get("width") {
        Some(width) => tera::try_get_value!("block_indent", "width", usize, width),
        None => BLOCK_INDENT,
    };
    Ok(tera::Value::String(indent_lines(&text, width)))
}
