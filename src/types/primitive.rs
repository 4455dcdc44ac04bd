use crate::traverser::TraverserError;
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum OpenApiPrimitives {
    Null,
    Bool,
    Integer,
    Array,
    Number,
    String,
    Object,
}

impl Display for OpenApiPrimitives {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenApiPrimitives::Null => write!(f, "null"),
            OpenApiPrimitives::Bool => write!(f, "boolean"),
            OpenApiPrimitives::Integer => write!(f, "integer"),
            OpenApiPrimitives::Array => write!(f, "array"),
            OpenApiPrimitives::Number => write!(f, "number"),
            OpenApiPrimitives::String => write!(f, "string"),
            OpenApiPrimitives::Object => write!(f, "object"),
        }
    }
}

impl FromStr for OpenApiPrimitives {
    type Err = TraverserError<'static>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "null" => Ok(OpenApiPrimitives::Null),
            "bool" | "boolean" => Ok(OpenApiPrimitives::Bool),
            "integer" => Ok(OpenApiPrimitives::Integer),
            "number" => Ok(OpenApiPrimitives::Number),
            "string" => Ok(OpenApiPrimitives::String),
            "array" => Ok(OpenApiPrimitives::Array),
            "object" => Ok(OpenApiPrimitives::Object),
            other => Err(TraverserError::type_mismatch(
                "schema type",
                other.to_string(),
            )),
        }
    }
}

impl OpenApiPrimitives {
    /// The JSON type of an arbitrary document value.
    pub fn get_type_from_serde(value: &Value) -> OpenApiPrimitives {
        match value {
            Value::Object(_) => OpenApiPrimitives::Object,
            Value::Array(_) => OpenApiPrimitives::Array,
            Value::String(_) => OpenApiPrimitives::String,
            Value::Number(number) if number.is_i64() || number.is_u64() => {
                OpenApiPrimitives::Integer
            }
            Value::Number(_) => OpenApiPrimitives::Number,
            Value::Bool(_) => OpenApiPrimitives::Bool,
            Value::Null => OpenApiPrimitives::Null,
        }
    }
}
