use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Fatal failures of a generation run.
///
/// Recoverable field-level problems never surface here; they are logged and the
/// affected field is left out of the generated examples.
#[derive(Debug)]
pub enum GenerateError {
    /// The named input file does not exist.
    InputNotFound(PathBuf),

    /// The input could not be read (I/O failure, or standard input is a terminal).
    InputUnavailable(String),

    /// The specification content is not valid YAML/JSON or is not a mapping.
    Unparseable(String),

    /// The specification parsed but could not be built into an OpenAPI 3 model.
    /// Every structural issue found is reported.
    ModelBuild(Vec<String>),

    /// The examples document could not be rendered.
    Render(RenderError),
}

impl GenerateError {
    pub(crate) fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound(path.into())
    }

    pub(crate) fn input_unavailable<T>(message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        Self::InputUnavailable(message.to_string())
    }

    pub(crate) fn unparseable<T>(message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        Self::Unparseable(message.to_string())
    }

    pub(crate) fn model_build(issues: Vec<String>) -> Self {
        Self::ModelBuild(issues)
    }
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::InputNotFound(path) => {
                write!(f, "provided file path does not exist: {}", path.display())
            }
            GenerateError::InputUnavailable(message) => {
                write!(f, "failed to read input: {}", message)
            }
            GenerateError::Unparseable(message) => {
                write!(f, "error parsing OpenAPI content: {}", message)
            }
            GenerateError::ModelBuild(issues) => {
                write!(
                    f,
                    "cannot create v3 model from document: {} errors reported",
                    issues.len()
                )?;
                for issue in issues {
                    write!(f, "\n  - {}", issue)?;
                }
                Ok(())
            }
            GenerateError::Render(error) => write!(f, "failed to render API examples: {}", error),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::Render(error) => Some(error),
            _ => None,
        }
    }
}

impl From<RenderError> for GenerateError {
    fn from(error: RenderError) -> Self {
        GenerateError::Render(error)
    }
}

/// Failures composing the output text.
#[derive(Debug)]
pub enum RenderError {
    /// The template could not be compiled or executed.
    Template(tera::Error),

    /// The examples document could not be serialized (JSON/YAML output).
    Serialization(String),
}

impl RenderError {
    pub(crate) fn serialization<T>(message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        Self::Serialization(message.to_string())
    }
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Template(error) => {
                write!(f, "template error: {}", error)?;
                let mut source = std::error::Error::source(error);
                while let Some(cause) = source {
                    write!(f, ": {}", cause)?;
                    source = cause.source();
                }
                Ok(())
            }
            RenderError::Serialization(message) => write!(f, "serialization error: {}", message),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<tera::Error> for RenderError {
    fn from(error: tera::Error) -> Self {
        RenderError::Template(error)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_model_build_lists_every_issue() {
        let error = GenerateError::model_build(vec![
            "openapi: Missing field: openapi".to_string(),
            "paths: Type mismatch: expected object, found array".to_string(),
        ]);
        let message = error.to_string();
        assert!(message.starts_with("cannot create v3 model from document: 2 errors reported"));
        assert!(message.contains("\n  - openapi: Missing field: openapi"));
        assert!(message.contains("\n  - paths: Type mismatch"));
    }

    #[test]
    fn test_input_not_found_names_path() {
        let error = GenerateError::input_not_found("missing.yaml");
        assert_eq!(
            error.to_string(),
            "provided file path does not exist: missing.yaml"
        );
    }

    #[test]
    fn test_render_error_converts() {
        let error: GenerateError = RenderError::serialization("bad value").into();
        assert!(matches!(error, GenerateError::Render(RenderError::Serialization(_))));
        assert!(std::error::Error::source(&error).is_some());
    }
}
