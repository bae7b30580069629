//! Parsing calculator inputs from JSON and YAML documents.
//!
//! Deserialisation goes through `serde_path_to_error` so a failure names the field the caller
//! got wrong. Missing fields and type mismatches become [`CalcError::Validation`]; an
//! unrecognised enum option (`gender`, `unit`) becomes [`CalcError::UnsupportedOption`].

use crate::audit::AuditContext;
use crate::{CalcError, CalcResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Document keys that carry the audit context rather than calculator input.
pub const AUDIT_CONTEXT_KEYS: [&str; 3] = ["hospital_id", "user_id", "patient_id"];

const ROOT: &str = "<root>";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    #[default]
    Json,
    Yaml,
}

impl FromStr for InputFormat {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            "yaml" | "yml" => Ok(InputFormat::Yaml),
            other => Err(CalcError::unsupported(
                "format",
                format!("unknown input format `{other}`, expected `json` or `yaml`"),
            )),
        }
    }
}

/// First backtick-quoted name in a serde message, e.g. `age` in "missing field `age`".
fn quoted_name(message: &str) -> Option<&str> {
    let start = message.find('`')? + 1;
    let len = message[start..].find('`')?;
    Some(&message[start..start + len])
}

fn map_error<E: fmt::Display>(err: serde_path_to_error::Error<E>) -> CalcError {
    let path = err.path().to_string();
    let source = err.into_inner().to_string();
    let path = if path.is_empty() || path == "." {
        ROOT
    } else {
        path.as_str()
    };

    // serde_yaml prefixes messages with a location, so match anywhere in the text.
    if source.contains("unknown variant") {
        return CalcError::unsupported(path, source);
    }

    let field = if source.contains("missing field") || source.contains("unknown field") {
        quoted_name(&source).unwrap_or(path).to_string()
    } else {
        path.to_string()
    };
    CalcError::validation(field, source)
}

/// Deserialise a calculator input from JSON text.
///
/// # Errors
///
/// Returns [`CalcError::Validation`] if the text is not valid JSON, a field is missing or has
/// the wrong type, or an unknown key is present. Returns [`CalcError::UnsupportedOption`] if
/// an enum field holds an unrecognised value.
pub fn from_json_str<T: DeserializeOwned>(text: &str) -> CalcResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let parsed = serde_path_to_error::deserialize(&mut deserializer).map_err(map_error)?;
    deserializer
        .end()
        .map_err(|e| CalcError::validation(ROOT, e.to_string()))?;
    Ok(parsed)
}

/// Deserialise a calculator input from YAML text. Errors as for [`from_json_str`].
pub fn from_yaml_str<T: DeserializeOwned>(text: &str) -> CalcResult<T> {
    let deserializer = serde_yaml::Deserializer::from_str(text);
    serde_path_to_error::deserialize(deserializer).map_err(map_error)
}

/// Deserialise a calculator input from an already parsed document.
pub fn from_json_value<T: DeserializeOwned>(value: Value) -> CalcResult<T> {
    serde_path_to_error::deserialize(value).map_err(map_error)
}

/// Parse a JSON or YAML document into a generic value without interpreting it.
pub fn parse_document(text: &str, format: InputFormat) -> CalcResult<Value> {
    match format {
        InputFormat::Json => {
            serde_json::from_str(text).map_err(|e| CalcError::validation(ROOT, e.to_string()))
        }
        InputFormat::Yaml => {
            serde_yaml::from_str(text).map_err(|e| CalcError::validation(ROOT, e.to_string()))
        }
    }
}

fn context_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Remove the audit context keys from a document and return them.
///
/// Non-object documents are left untouched and yield an empty context; the subsequent
/// deserialisation reports the shape error.
pub fn split_audit_context(document: &mut Value) -> AuditContext {
    let Value::Object(map) = document else {
        return AuditContext::default();
    };

    let [hospital_id, user_id, patient_id] =
        AUDIT_CONTEXT_KEYS.map(|key| map.remove(key).and_then(context_value));
    AuditContext::new(hospital_id, user_id, patient_id)
}
