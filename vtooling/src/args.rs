//! Argument coercion helpers shared by schema validation and tool handlers.
//!
//! Planners are loose about JSON types, so integers may arrive as strings and id lists
//! as comma-separated text.
//!
//! ```rust
//! use serde_json::json;
//! use vtooling::{ToolArguments, id_list_arg, integer_arg, text_arg};
//!
//! let args: ToolArguments = json!({
//!     "time_range": "2024-05-27 09:00:00 - 2024-05-27 12:00:00",
//!     "num_segments": "3",
//!     "ids": "66406, 66414"
//! })
//! .as_object()
//! .cloned()
//! .expect("object");
//!
//! assert!(text_arg(&args, "time_range").is_ok());
//! assert_eq!(integer_arg(&args, "num_segments").expect("integer"), 3);
//! assert_eq!(id_list_arg(&args, "ids").expect("ids"), vec![66406, 66414]);
//! ```

use serde_json::{Map, Value};

use crate::ToolError;

pub type ToolArguments = Map<String, Value>;

pub fn parse_arguments(args_json: &str) -> Result<ToolArguments, ToolError> {
    let value: Value = serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))?;
    value
        .as_object()
        .cloned()
        .ok_or_else(|| ToolError::invalid_arguments("expected JSON object arguments"))
}

pub(crate) fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub(crate) fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn coerce_id_list(value: &Value) -> Option<Vec<i64>> {
    match value {
        Value::Array(items) => items.iter().map(coerce_integer).collect(),
        Value::String(text) => text
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse().ok())
            .collect(),
        Value::Number(_) => coerce_integer(value).map(|id| vec![id]),
        _ => None,
    }
}

fn required<'a>(args: &'a ToolArguments, key: &str) -> Result<&'a Value, ToolError> {
    args.get(key)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required argument: '{key}'")))
}

pub fn text_arg(args: &ToolArguments, key: &str) -> Result<String, ToolError> {
    coerce_text(required(args, key)?)
        .ok_or_else(|| ToolError::invalid_arguments(format!("argument '{key}' must be text")))
}

pub fn integer_arg(args: &ToolArguments, key: &str) -> Result<i64, ToolError> {
    coerce_integer(required(args, key)?)
        .ok_or_else(|| ToolError::invalid_arguments(format!("argument '{key}' must be an integer")))
}

pub fn id_list_arg(args: &ToolArguments, key: &str) -> Result<Vec<i64>, ToolError> {
    coerce_id_list(required(args, key)?).ok_or_else(|| {
        ToolError::invalid_arguments(format!("argument '{key}' must be a list of integer ids"))
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ToolErrorKind;

    fn args(value: Value) -> ToolArguments {
        value.as_object().cloned().expect("test args should be an object")
    }

    #[test]
    fn parse_arguments_requires_an_object() {
        assert!(parse_arguments("{\"id\": 1}").is_ok());

        let error = parse_arguments("[1, 2]").expect_err("array should fail");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);

        let error = parse_arguments("{").expect_err("broken json should fail");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    }

    #[test]
    fn integers_accept_numbers_and_numeric_strings() {
        let values = args(json!({"a": 4, "b": " 12 ", "c": 1.5, "d": "many"}));
        assert_eq!(integer_arg(&values, "a").expect("a"), 4);
        assert_eq!(integer_arg(&values, "b").expect("b"), 12);
        assert!(integer_arg(&values, "c").is_err());
        assert!(integer_arg(&values, "d").is_err());
    }

    #[test]
    fn id_lists_accept_arrays_strings_and_single_ids() {
        let values = args(json!({
            "array": [66406, "66414"],
            "text": "66406,66428",
            "single": 66406,
            "broken": [66406, "x"],
            "object": {"id": 1}
        }));

        assert_eq!(id_list_arg(&values, "array").expect("array"), vec![66406, 66414]);
        assert_eq!(id_list_arg(&values, "text").expect("text"), vec![66406, 66428]);
        assert_eq!(id_list_arg(&values, "single").expect("single"), vec![66406]);
        assert!(id_list_arg(&values, "broken").is_err());
        assert!(id_list_arg(&values, "object").is_err());
    }

    #[test]
    fn missing_keys_name_the_argument() {
        let error = text_arg(&ToolArguments::new(), "start_time").expect_err("should fail");
        assert_eq!(error.message, "missing required argument: 'start_time'");
    }
}
