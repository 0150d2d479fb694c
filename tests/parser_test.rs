use sprout::error::Error;
use sprout::parser::{coerce, collect_answers};
use sprout::prompt::{LinePrompter, RawInput, ScriptedPrompter};
use sprout::question::{AnswerValue, BuiltinValidator, Choice, Question, Validator, ValueType};
use sprout::renderer::TemplateEnv;
use sprout::style::Style;

fn env() -> TemplateEnv {
    TemplateEnv::new(".jinja")
}

fn license_question() -> Question {
    Question::new("copyright_license", "License")
        .with_choices([Choice::new("MIT", "MIT License"), Choice::new("None", "No license")])
}

#[test]
fn test_collects_answers_in_order() {
    let questions = vec![
        Question::new("project_name", "Project name"),
        Question::new("use_ci", "Use CI?").with_type(ValueType::Bool),
        Question::new("workers", "Workers").with_type(ValueType::Int),
    ];
    let mut prompter = ScriptedPrompter::new(["demo", "yes", "4"]);

    let answers = collect_answers(&questions, &env(), &mut prompter, &Style::default()).unwrap();

    let keys: Vec<&String> = answers.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["project_name", "use_ci", "workers"]);
    assert_eq!(answers.get("project_name"), Some(&AnswerValue::String("demo".into())));
    assert_eq!(answers.get("use_ci"), Some(&AnswerValue::Bool(true)));
    assert_eq!(answers.get("workers"), Some(&AnswerValue::Integer(4)));
}

#[test]
fn test_default_rendered_from_earlier_answers() {
    let questions = vec![
        Question::new("project_name", "Project name"),
        Question::new("package", "Package").with_default("{{ project_name | lower }}_pkg"),
    ];
    let mut prompter = ScriptedPrompter::new(["Demo", ""]);

    let answers = collect_answers(&questions, &env(), &mut prompter, &Style::default()).unwrap();

    assert_eq!(answers.get("package").and_then(AnswerValue::as_str), Some("demo_pkg"));
}

#[test]
fn test_invalid_answer_is_asked_again() {
    let questions = vec![Question::new("workers", "Workers").with_type(ValueType::Int)];
    let mut prompter = ScriptedPrompter::new(["many", "", "2"]);

    let answers = collect_answers(&questions, &env(), &mut prompter, &Style::default()).unwrap();

    assert_eq!(answers.get("workers"), Some(&AnswerValue::Integer(2)));
    assert_eq!(prompter.asked().len(), 3);
    assert_eq!(
        prompter.rejections(),
        ["'many' is not a whole number.", "Please provide a value."]
    );
}

#[test]
fn test_retries_are_bounded() {
    let questions = vec![Question::new("email", "Email").with_validator(Validator::Pattern {
        pattern: "^[^@]+@[^@]+$".to_string(),
        message: Some("Not an email address.".to_string()),
    })];
    let mut prompter = ScriptedPrompter::new(["a", "b", "c", "d", "e", "never@asked"]);

    let result = collect_answers(&questions, &env(), &mut prompter, &Style::default());

    assert!(matches!(result, Err(Error::AnswerCollectionAborted { ref key, .. }) if key == "email"));
    assert_eq!(prompter.asked().len(), 5);
}

#[test]
fn test_closed_input_aborts() {
    let questions = vec![Question::new("project_name", "Project name")];
    let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

    let result = collect_answers(&questions, &env(), &mut prompter, &Style::default());

    assert!(matches!(result, Err(Error::AnswerCollectionAborted { .. })));
}

#[test]
fn test_choice_by_index_value_or_label() {
    let question = license_question();
    assert_eq!(coerce(&question, "1"), Ok(AnswerValue::Choice("MIT".into())));
    assert_eq!(coerce(&question, "none"), Ok(AnswerValue::Choice("None".into())));
    assert_eq!(coerce(&question, "No license"), Ok(AnswerValue::Choice("None".into())));
    assert!(coerce(&question, "3").is_err());
}

#[test]
fn test_multiselect_answers() {
    let question = Question::new("features", "Features")
        .with_choices([Choice::new("ci", "CI"), Choice::new("docs", "Docs")])
        .multiselect();
    assert_eq!(
        coerce(&question, "2, ci, docs"),
        Ok(AnswerValue::Choices(vec!["docs".into(), "ci".into()]))
    );

    let mut prompter = ScriptedPrompter::new([""]);
    let answers =
        collect_answers(&[question], &env(), &mut prompter, &Style::default()).unwrap();
    assert_eq!(answers.get("features"), Some(&AnswerValue::Choices(vec![])));
}

#[test]
fn test_multiselect_empty_selection_overrides_default() {
    let question = Question::new("features", "Features")
        .with_choices([Choice::new("ci", "CI"), Choice::new("docs", "Docs")])
        .multiselect()
        .with_default(serde_json::json!(["ci"]));

    // Everything unchecked in the selection widget
    let mut prompter = ScriptedPrompter::new([RawInput::Selection(String::new())]);
    let answers = collect_answers(&[question.clone()], &env(), &mut prompter, &Style::default())
        .unwrap();
    assert_eq!(answers.get("features"), Some(&AnswerValue::Choices(vec![])));

    // Blank typed input still takes the default
    let mut prompter = ScriptedPrompter::new([""]);
    let answers =
        collect_answers(&[question], &env(), &mut prompter, &Style::default()).unwrap();
    assert_eq!(answers.get("features"), Some(&AnswerValue::Choices(vec!["ci".into()])));
}

#[test]
fn test_json_answer_checked_against_schema() {
    let mut question = Question::new("ports", "Ports").with_type(ValueType::Json);
    question.schema = Some(serde_json::json!({"type": "array", "items": {"type": "integer"}}));

    assert_eq!(
        coerce(&question, "[80, 443]"),
        Ok(AnswerValue::Json(serde_json::json!([80, 443])))
    );
    assert!(coerce(&question, "[\"http\"]").is_err());
    assert!(coerce(&question, "{not json").is_err());
}

#[test]
fn test_condition_validator_sees_answers() {
    let questions = vec![
        Question::new("min", "Minimum").with_type(ValueType::Int),
        Question::new("max", "Maximum").with_type(ValueType::Int).with_validator(
            Validator::Condition {
                condition: "value > answers.min".to_string(),
                message: Some("Maximum must exceed the minimum.".to_string()),
            },
        ),
    ];
    let mut prompter = ScriptedPrompter::new(["5", "3", "9"]);

    let answers = collect_answers(&questions, &env(), &mut prompter, &Style::default()).unwrap();

    assert_eq!(answers.get("max"), Some(&AnswerValue::Integer(9)));
    assert_eq!(prompter.rejections(), ["Maximum must exceed the minimum."]);
}

#[test]
fn test_repository_url_validator() {
    let questions = vec![Question::new("repo", "Repository")
        .with_validator(Validator::Builtin { builtin: BuiltinValidator::RepositoryUrl })];
    let mut prompter =
        ScriptedPrompter::new(["not a url", "git@github.com:octo/starter.git"]);

    let answers = collect_answers(&questions, &env(), &mut prompter, &Style::default()).unwrap();

    assert_eq!(
        answers.get("repo").and_then(AnswerValue::as_str),
        Some("git@github.com:octo/starter.git")
    );
    assert_eq!(prompter.rejections().len(), 1);
}

#[test]
fn test_line_prompter_reads_piped_input() {
    let questions = vec![
        license_question(),
        Question::new("use_ci", "Use CI?").with_type(ValueType::Bool).with_default(false),
    ];
    let input = std::io::Cursor::new("2\n\n");
    let mut prompter = LinePrompter::new(input, Vec::new());

    let answers = collect_answers(&questions, &env(), &mut prompter, &Style::default()).unwrap();

    assert_eq!(answers.get("copyright_license").and_then(AnswerValue::as_str), Some("None"));
    assert_eq!(answers.get("use_ci").and_then(AnswerValue::as_bool), Some(false));

    let output = String::from_utf8(prompter.into_output()).unwrap();
    assert!(output.contains("? License"));
    assert!(output.contains("  2) No license"));
    assert!(output.contains("  default: no"));
}
