//! Structured-output validation: raw reasoning text to a `{thought, function}` decision.
//!
//! ```rust
//! use vagent::DecisionValidator;
//!
//! let validator = DecisionValidator::new(false);
//! let validated = validator
//!     .validate("```json\n{\"thought\": \"Done\", \"function\": \"[]\"}\n```")
//!     .expect("decision should validate");
//!
//! assert!(validated.decision.is_final());
//! assert!(!validated.display.contains("Done"));
//! ```

use serde_json::{Map, Value, json};
use vtooling::ToolCall;

use crate::ParsingError;

const REQUIRED_KEYS: [&str; 2] = ["thought", "function"];

/// One reasoning step. An empty call list ends the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub thought: String,
    pub function_calls: Vec<ToolCall>,
}

impl Decision {
    pub fn is_final(&self) -> bool {
        self.function_calls.is_empty()
    }

    pub fn calls_json(&self) -> Value {
        Value::Array(
            self.function_calls
                .iter()
                .map(|call| json!({"name": call.name, "arguments": call.arguments}))
                .collect(),
        )
    }

    /// Public rendering; the thought is only shown when verbose.
    pub fn display(&self, verbose: bool) -> String {
        let mut shown = Map::new();
        if verbose {
            shown.insert("thought".to_string(), Value::String(self.thought.clone()));
        }
        shown.insert("function".to_string(), self.calls_json());
        serde_json::to_string_pretty(&Value::Object(shown)).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDecision {
    pub decision: Decision,
    pub display: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionValidator {
    verbose: bool,
}

impl Default for DecisionValidator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DecisionValidator {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn validate(&self, raw: &str) -> Result<ValidatedDecision, ParsingError> {
        let decision = parse_decision(raw)?;
        let display = decision.display(self.verbose);
        Ok(ValidatedDecision { decision, display })
    }

    pub fn format_instruction(&self) -> &'static str {
        FORMAT_INSTRUCTION
    }
}

pub const FORMAT_INSTRUCTION: &str = r#"Respond with a JSON object fenced in ```json and ``` with exactly these keys:
```json
{
  "thought": "your brief reasoning",
  "function": [
    {"name": "function_name", "arguments": {"arg1": "value1", "arg2": "value2"}}
  ]
}
```
"function" must be an array; use [] when no further queries are needed.
"arguments" must be a JSON object, never a string."#;

pub fn parse_decision(raw: &str) -> Result<Decision, ParsingError> {
    let fail = |message: String| ParsingError::new(message, raw);

    let candidate = extract_json_block(raw);
    let value: Value = serde_json::from_str(candidate)
        .map_err(|err| fail(format!("response is not valid JSON: {err}")))?;
    let Value::Object(object) = value else {
        return Err(fail("response must be a JSON object".to_string()));
    };

    let missing = REQUIRED_KEYS
        .iter()
        .filter(|key| !object.contains_key(**key))
        .copied()
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(fail(format!("missing required key(s): {}", missing.join(", "))));
    }

    let thought = match &object["thought"] {
        Value::String(thought) => thought.clone(),
        _ => return Err(fail("\"thought\" must be a string".to_string())),
    };

    let function_calls = normalize_function_list(&object["function"])
        .map_err(fail)?
        .iter()
        .enumerate()
        .map(|(index, item)| parse_call(index, item))
        .collect::<Result<Vec<_>, _>>()
        .map_err(fail)?;

    Ok(Decision {
        thought,
        function_calls,
    })
}

/// Prefers a ```json fence, then any fence, then the outermost braces.
fn extract_json_block(raw: &str) -> &str {
    if let Some(block) = fenced(raw, "```json") {
        return block;
    }
    if let Some(block) = fenced(raw, "```") {
        return block;
    }
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw.trim(),
    }
}

fn fenced<'a>(raw: &'a str, opener: &str) -> Option<&'a str> {
    let start = raw.find(opener)? + opener.len();
    let body = &raw[start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// `[]`, `"[]"`, `""` and a string holding a JSON array all normalize to a list.
fn normalize_function_list(value: &Value) -> Result<Vec<Value>, String> {
    match value {
        Value::Array(items) => Ok(items.clone()),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() || text == "[]" {
                return Ok(Vec::new());
            }
            match serde_json::from_str::<Value>(text) {
                Ok(Value::Array(items)) => Ok(items),
                _ => Err("\"function\" must be an array of calls".to_string()),
            }
        }
        _ => Err("\"function\" must be an array of calls".to_string()),
    }
}

fn parse_call(index: usize, item: &Value) -> Result<ToolCall, String> {
    let Value::Object(call) = item else {
        return Err(format!("function[{index}] must be an object"));
    };

    let name = match call.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
        Some(_) => return Err(format!("function[{index}].name must be a non-empty string")),
        None => return Err(format!("function[{index}] is missing \"name\"")),
    };

    match call.get("arguments") {
        Some(Value::Object(arguments)) => Ok(ToolCall::new(name).with_arguments(arguments.clone())),
        Some(Value::String(_)) => Err(format!(
            "function[{index}] ({name}): \"arguments\" must be a JSON object, not a string"
        )),
        Some(_) => Err(format!(
            "function[{index}] ({name}): \"arguments\" must be a JSON object"
        )),
        None => Err(format!("function[{index}] ({name}) is missing \"arguments\"")),
    }
}
