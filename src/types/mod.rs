pub mod json_path;
pub mod primitive;
pub mod version;

use crate::types::json_path::JsonPath;
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One `(verb, path)` operation collected from the specification, in document order.
#[derive(Debug)]
pub struct Operation {
    pub(crate) verb: String,
    pub(crate) path: String,
    pub(crate) data: Value,

    /// Parameters declared on the enclosing path item, shared by every verb.
    pub(crate) path_parameters: Vec<Value>,
    pub(crate) json_path: JsonPath,
}

impl Operation {
    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn json_path(&self) -> &JsonPath {
        &self.json_path
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ParameterLocation {
    Header,
    Query,
    Cookie,
    Path,
}

impl Display for ParameterLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = String::from(match self {
            ParameterLocation::Header => "header",
            ParameterLocation::Query => "query",
            ParameterLocation::Cookie => "cookie",
            ParameterLocation::Path => "path",
        });
        write!(f, "{}", str)
    }
}

impl FromStr for ParameterLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "header" => Ok(ParameterLocation::Header),
            "query" => Ok(ParameterLocation::Query),
            "cookie" => Ok(ParameterLocation::Cookie),
            "path" => Ok(ParameterLocation::Path),
            other => Err(format!("unknown parameter location '{}'", other)),
        }
    }
}
