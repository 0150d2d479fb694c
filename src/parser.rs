//! Answer collection: prompting each resolved question in order, turning raw input into
//! typed answers and checking them against the question's rules.

use log::debug;
use regex::Regex;

use crate::constants::MAX_ANSWER_ATTEMPTS;
use crate::error::{Error, Result};
use crate::prompt::{PromptRequest, Prompter, RawInput};
use crate::question::{AnswerValue, Answers, BuiltinValidator, Question, Validator, ValueType};
use crate::renderer::TemplateEnv;
use crate::style::Style;
use crate::validators::validate_repository_url;

/// Resolves a question's default against the answers collected so far.
/// String defaults are rendered as templates.
///
/// # Errors
/// * `Error::RenderError` if a templated default fails to render
pub fn resolve_default(
    question: &Question,
    answers: &Answers,
    env: &TemplateEnv,
) -> Result<Option<serde_json::Value>> {
    match &question.default {
        Some(serde_json::Value::String(template)) => {
            Ok(Some(serde_json::Value::String(env.render(template, answers)?)))
        }
        Some(serde_json::Value::Null) | None => Ok(None),
        Some(other) => Ok(Some(other.clone())),
    }
}

/// Text a user would type to pick `default`.
pub fn default_text(question: &Question, default: &serde_json::Value) -> String {
    match (question.value_type, default) {
        (ValueType::Json, value) => value.to_string(),
        (_, serde_json::Value::String(s)) => s.clone(),
        (_, serde_json::Value::Bool(b)) => if *b { "yes" } else { "no" }.to_string(),
        (_, serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).unwrap_or_else(|| item.to_string()))
            .collect::<Vec<_>>()
            .join(","),
        (_, other) => other.to_string(),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Maps one token to a choice value: a 1-based index, a value, or a label.
fn match_choice(question: &Question, token: &str) -> Option<String> {
    if let Ok(idx) = token.parse::<usize>() {
        if idx >= 1 && idx <= question.choices.len() {
            return Some(question.choices[idx - 1].value.clone());
        }
    }
    let lower = token.to_lowercase();
    question
        .choices
        .iter()
        .find(|c| c.value.to_lowercase() == lower)
        .or_else(|| {
            question
                .choices
                .iter()
                .find(|c| c.label.as_deref().is_some_and(|l| l.to_lowercase() == lower))
        })
        .map(|c| c.value.clone())
}

/// Converts non-empty raw input into a typed answer.
///
/// # Returns
/// * `Err(message)` - A message for the user; the question is asked again
pub fn coerce(question: &Question, raw: &str) -> std::result::Result<AnswerValue, String> {
    let raw = raw.trim();
    if question.is_choice() {
        if question.multiselect {
            let mut selected = Vec::new();
            for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                let value = match_choice(question, token)
                    .ok_or_else(|| format!("Unknown choice '{token}'."))?;
                if !selected.contains(&value) {
                    selected.push(value);
                }
            }
            return Ok(AnswerValue::Choices(selected));
        }
        return match_choice(question, raw)
            .map(AnswerValue::Choice)
            .ok_or_else(|| format!("Unknown choice '{raw}'."));
    }

    match question.value_type {
        ValueType::Str => Ok(AnswerValue::String(raw.to_string())),
        ValueType::Bool => {
            parse_bool(raw).map(AnswerValue::Bool).ok_or_else(|| "Please answer yes or no.".into())
        }
        ValueType::Int => raw
            .parse::<i64>()
            .map(AnswerValue::Integer)
            .map_err(|_| format!("'{raw}' is not a whole number.")),
        ValueType::Float => raw
            .parse::<f64>()
            .map(AnswerValue::Float)
            .map_err(|_| format!("'{raw}' is not a number.")),
        ValueType::Json => {
            let value: serde_json::Value =
                serde_json::from_str(raw).map_err(|e| format!("Invalid JSON: {e}"))?;
            if let Some(schema) = &question.schema {
                let validator = jsonschema::validator_for(schema)
                    .map_err(|e| format!("Invalid schema: {e}"))?;
                if let Err(e) = validator.validate(&value) {
                    return Err(format!("Value does not match the schema: {e}"));
                }
            }
            Ok(AnswerValue::Json(value))
        }
    }
}

/// Runs the question's validators against the raw input and the coerced value.
///
/// # Returns
/// * `Ok(Err(message))` - The answer is rejected; the question is asked again
/// * `Err(_)` - A condition could not be evaluated, which is fatal
pub fn validate(
    question: &Question,
    raw: &str,
    value: &AnswerValue,
    answers: &Answers,
    env: &TemplateEnv,
) -> Result<std::result::Result<(), String>> {
    for validator in &question.validators {
        match validator {
            Validator::Pattern { pattern, message } => {
                let re = Regex::new(pattern)
                    .map_err(|e| Error::manifest_invalid("questions", e))?;
                if !re.is_match(raw) {
                    return Ok(Err(message
                        .clone()
                        .unwrap_or_else(|| format!("Value must match '{pattern}'."))));
                }
            }
            Validator::Condition { condition, message } => {
                let mut candidate = answers.clone();
                candidate.insert(question.key.clone(), value.clone());
                let context = serde_json::json!({
                    "value": value,
                    "answers": candidate,
                });
                if !env.eval(condition, context)?.is_true() {
                    return Ok(Err(message.clone().unwrap_or_else(|| "Invalid value.".into())));
                }
            }
            Validator::Builtin { builtin: BuiltinValidator::RepositoryUrl } => {
                if let Err(message) = validate_repository_url(raw) {
                    return Ok(Err(message));
                }
            }
        }
    }
    Ok(Ok(()))
}

/// Asks one question until a valid answer is given or the attempts run out.
fn ask(
    question: &Question,
    answers: &Answers,
    env: &TemplateEnv,
    prompter: &mut dyn Prompter,
    style: &Style,
) -> Result<AnswerValue> {
    let default = resolve_default(question, answers, env)?;
    let default_input = default.as_ref().map(|d| default_text(question, d));
    let request = PromptRequest { question, default: default_input.as_deref(), style };

    for attempt in 1..=MAX_ANSWER_ATTEMPTS {
        let Some(input) = prompter.read(&request)? else {
            return Err(Error::AnswerCollectionAborted {
                key: question.key.clone(),
                reason: "input closed".to_string(),
            });
        };

        let raw = match input {
            RawInput::Selection(selected) => selected,
            RawInput::Text(text) if text.trim().is_empty() => match &default_input {
                Some(default) => default.clone(),
                None if question.multiselect => String::new(),
                None => {
                    prompter.invalid("Please provide a value.", style);
                    continue;
                }
            },
            RawInput::Text(text) => text.trim().to_string(),
        };

        let value = match coerce(question, &raw) {
            Ok(value) => value,
            Err(message) => {
                prompter.invalid(&message, style);
                continue;
            }
        };
        match validate(question, &raw, &value, answers, env)? {
            Ok(()) => {
                debug!("Answer for '{}' accepted on attempt {attempt}.", question.key);
                return Ok(value);
            }
            Err(message) => prompter.invalid(&message, style),
        }
    }

    Err(Error::AnswerCollectionAborted {
        key: question.key.clone(),
        reason: format!("no valid answer after {MAX_ANSWER_ATTEMPTS} attempts"),
    })
}

/// Prompts every question in order and returns the complete answer set.
///
/// # Arguments
/// * `questions` - Resolved questions, in prompting order
/// * `env` - Environment used for templated defaults and conditions
/// * `prompter` - Source of raw input
/// * `style` - Presentation settings passed to the prompter
///
/// # Returns
/// * `Result<Answers>` - One entry per question key
///
/// # Errors
/// * `Error::AnswerCollectionAborted` if input closes or retries are exhausted
pub fn collect_answers(
    questions: &[Question],
    env: &TemplateEnv,
    prompter: &mut dyn Prompter,
    style: &Style,
) -> Result<Answers> {
    let mut answers = Answers::new();
    for question in questions {
        let value = ask(question, &answers, env, prompter, style)?;
        answers.insert(question.key.clone(), value);
    }
    Ok(answers)
}
