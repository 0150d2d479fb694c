//! Questions asked before generation and the answers they produce.

use indexmap::IndexMap;
use minijinja::Environment;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a question, driving how raw input is coerced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ValueType {
    #[default]
    #[serde(rename = "str")]
    Str,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "json")]
    Json,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawChoice {
    Plain(String),
    Labeled { value: String, label: Option<String> },
}

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "RawChoice")]
pub struct Choice {
    pub value: String,
    pub label: Option<String>,
}

impl From<RawChoice> for Choice {
    fn from(raw: RawChoice) -> Self {
        match raw {
            RawChoice::Plain(value) => Choice { value, label: None },
            RawChoice::Labeled { value, label } => Choice { value, label },
        }
    }
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Choice { value: value.into(), label: Some(label.into()) }
    }

    /// Text shown to the user.
    pub fn display(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinValidator {
    RepositoryUrl,
}

/// Input rule checked after coercion. A failing rule re-prompts the question.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Validator {
    /// Raw input must match the regular expression.
    Pattern {
        pattern: String,
        #[serde(default)]
        message: Option<String>,
    },
    /// MiniJinja expression over `value` and `answers` that must be truthy.
    Condition {
        condition: String,
        #[serde(default)]
        message: Option<String>,
    },
    Builtin { builtin: BuiltinValidator },
}

/// One question asked before generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Question {
    pub key: String,
    pub prompt: String,
    #[serde(default)]
    pub help: String,
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    /// String defaults are templates rendered against the answers collected so far.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub multiselect: bool,
    #[serde(default)]
    pub validators: Vec<Validator>,
    /// JSON schema checked against `json` answers.
    #[serde(default)]
    pub schema: Option<serde_json::Value>,
}

impl Question {
    pub fn new(key: impl Into<String>, prompt: impl Into<String>) -> Self {
        Question {
            key: key.into(),
            prompt: prompt.into(),
            help: String::new(),
            value_type: ValueType::Str,
            default: None,
            choices: Vec::new(),
            multiselect: false,
            validators: Vec::new(),
            schema: None,
        }
    }

    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn with_default(mut self, default: impl Into<serde_json::Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_choices<I: IntoIterator<Item = Choice>>(mut self, choices: I) -> Self {
        self.choices = choices.into_iter().collect();
        self
    }

    pub fn multiselect(mut self) -> Self {
        self.multiselect = true;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn is_choice(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Checks the parts of a question that can be wrong before anyone answers it:
    /// regular expressions, condition syntax, and the JSON schema.
    pub fn check(&self) -> Result<(), String> {
        if self.key.trim().is_empty() {
            return Err("question key must not be empty".to_string());
        }
        if self.multiselect && self.choices.is_empty() {
            return Err(format!("question '{}' is multiselect but has no choices", self.key));
        }
        for validator in &self.validators {
            match validator {
                Validator::Pattern { pattern, .. } => {
                    Regex::new(pattern)
                        .map_err(|e| format!("question '{}': {e}", self.key))?;
                }
                Validator::Condition { condition, .. } => {
                    let env = Environment::new();
                    env.compile_expression(condition)
                        .map_err(|e| format!("question '{}': {e}", self.key))?;
                }
                Validator::Builtin { .. } => {}
            }
        }
        if let Some(schema) = &self.schema {
            jsonschema::validator_for(schema)
                .map_err(|e| format!("question '{}': invalid schema: {e}", self.key))?;
        }
        Ok(())
    }
}

/// Names the skip expression context binds itself; an answer may not use them.
pub const RESERVED_KEYS: [&str; 2] = ["path", "answers"];

/// Rejects duplicate keys, reserved keys and malformed questions in a resolved list.
pub fn check_questions(questions: &[Question]) -> Result<(), String> {
    let mut seen = std::collections::HashSet::new();
    for question in questions {
        question.check()?;
        if RESERVED_KEYS.contains(&question.key.as_str()) {
            return Err(format!("question key '{}' is reserved", question.key));
        }
        if !seen.insert(question.key.as_str()) {
            return Err(format!("duplicate question key '{}'", question.key));
        }
    }
    Ok(())
}

/// A collected answer. Serialized untagged so templates see plain values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    String(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    Choice(String),
    Choices(Vec<String>),
    Json(serde_json::Value),
}

impl AnswerValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnswerValue::String(s) | AnswerValue::Choice(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnswerValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::String(s) | AnswerValue::Choice(s) => write!(f, "{s}"),
            AnswerValue::Bool(b) => write!(f, "{}", if *b { "yes" } else { "no" }),
            AnswerValue::Integer(i) => write!(f, "{i}"),
            AnswerValue::Float(x) => write!(f, "{x}"),
            AnswerValue::Choices(items) if items.is_empty() => write!(f, "none"),
            AnswerValue::Choices(items) => write!(f, "{}", items.join(", ")),
            AnswerValue::Json(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::String(value.to_string())
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

/// Question key to answer, in resolution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Answers(IndexMap<String, AnswerValue>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AnswerValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }

    /// Answers as a JSON object, used as template context.
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.0
            .iter()
            .map(|(key, value)| {
                (key.clone(), serde_json::to_value(value).unwrap_or(serde_json::Value::Null))
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<AnswerValue>> FromIterator<(K, V)> for Answers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Answers(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_forms_deserialize() {
        let choices: Vec<Choice> =
            serde_yaml::from_str("- MIT\n- { value: none, label: No license }\n").unwrap();
        assert_eq!(choices[0], Choice { value: "MIT".to_string(), label: None });
        assert_eq!(choices[1].display(), "No license");
    }

    #[test]
    fn test_check_rejects_bad_pattern() {
        let question = Question::new("name", "Name")
            .with_validator(Validator::Pattern { pattern: "(".to_string(), message: None });
        assert!(question.check().is_err());
    }

    #[test]
    fn test_check_questions_rejects_duplicates() {
        let questions = vec![Question::new("a", "A"), Question::new("a", "Again")];
        let err = check_questions(&questions).unwrap_err();
        assert!(err.contains("duplicate question key 'a'"));
    }

    #[test]
    fn test_check_questions_rejects_reserved_keys() {
        for key in RESERVED_KEYS {
            let err = check_questions(&[Question::new(key, "Reserved")]).unwrap_err();
            assert_eq!(err, format!("question key '{key}' is reserved"));
        }
    }

    #[test]
    fn test_unknown_question_field_is_rejected() {
        let result: Result<Question, _> =
            serde_yaml::from_str("key: name
prompt: Name
defualt: demo
");
        assert!(result.is_err());
    }

    #[test]
    fn test_answers_serialize_untagged() {
        let answers: Answers = [("name", AnswerValue::from("demo")), ("ci", AnswerValue::from(true))]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(json, serde_json::json!({"name": "demo", "ci": true}));
    }
}
