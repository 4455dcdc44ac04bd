use crate::{ENCODED_BACKSLASH, ENCODED_TILDE, PATH_SEPARATOR, TILDE};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Location of a node inside the specification, used to report where a
/// field was skipped or a structural issue was found.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct JsonPath(pub Vec<String>);

impl JsonPath {
    pub fn new() -> Self {
        JsonPath(Vec::new())
    }

    pub fn add(&mut self, segment: impl AsRef<str>) -> &mut Self {
        let segment = segment.as_ref();
        if segment.contains(TILDE) || segment.contains(PATH_SEPARATOR) {
            let segment = segment
                .replace(TILDE, ENCODED_TILDE)
                .replace(PATH_SEPARATOR, ENCODED_BACKSLASH);
            self.0.push(segment);
        } else {
            self.0.push(segment.to_owned());
        }

        self
    }

    /// Copy of this path extended by one segment.
    pub fn child(&self, segment: impl AsRef<str>) -> JsonPath {
        let mut child = self.clone();
        child.add(segment);
        child
    }

    pub fn format_path(&self) -> String {
        self.0.join(PATH_SEPARATOR)
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_path())
    }
}
