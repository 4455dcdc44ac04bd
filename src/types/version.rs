use jsonschema::Draft;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpenApiVersion {
    V30x,
    V31x,
}

impl FromStr for OpenApiVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("3.1") {
            Ok(OpenApiVersion::V31x)
        } else if s.starts_with("3.0") {
            Ok(OpenApiVersion::V30x)
        } else {
            Err(VersionError::unsupported_version(s))
        }
    }
}

impl OpenApiVersion {
    /// JSON-Schema draft that schemas of this OpenAPI version are written against.
    pub fn get_draft(&self) -> Draft {
        match self {
            OpenApiVersion::V30x => Draft::Draft4,
            OpenApiVersion::V31x => Draft::Draft202012,
        }
    }
}

#[derive(Debug)]
pub enum VersionError {
    UnsupportedVersion(String),
}

impl VersionError {
    pub(crate) fn unsupported_version<T>(version: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        VersionError::UnsupportedVersion(version.to_string())
    }
}

impl Display for VersionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionError::UnsupportedVersion(version) => {
                write!(f, "Unsupported version: {}", version)
            }
        }
    }
}

impl std::error::Error for VersionError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_version_selects_draft() {
        let v30 = OpenApiVersion::from_str("3.0.3").unwrap();
        let v31 = OpenApiVersion::from_str("3.1.0").unwrap();
        assert_eq!(v30, OpenApiVersion::V30x);
        assert_eq!(v31, OpenApiVersion::V31x);
        assert!(matches!(v30.get_draft(), Draft::Draft4));
        assert!(matches!(v31.get_draft(), Draft::Draft202012));
    }

    #[test]
    fn test_swagger_version_is_unsupported() {
        let error = OpenApiVersion::from_str("2.0").unwrap_err();
        assert_eq!(error.to_string(), "Unsupported version: 2.0");
    }
}
