use std::fs;
use std::path::Path;

use sprout::error::Error;
use sprout::extensions::Extension;
use sprout::manifest::{find_manifest, load_manifest, parse_manifest, Title};
use sprout::question::{Answers, ValueType};
use sprout::resolver::QuestionSource;
use tempfile::TempDir;

fn symbol_of(err: Error) -> String {
    match err {
        Error::ManifestInvalid { symbol, .. } => symbol,
        other => panic!("Expected ManifestInvalid, got {other:?}"),
    }
}

#[test]
fn test_minimal_manifest_defaults() {
    let root = TempDir::new().unwrap();
    let manifest = parse_manifest("questions: []\n", root.path()).unwrap();

    assert!(matches!(&manifest.questions, QuestionSource::Static(q) if q.is_empty()));
    assert_eq!(manifest.template_dir, Path::new("template"));
    assert_eq!(manifest.template_suffix, ".jinja");
    assert!(manifest.ignore.is_empty());
    assert!(manifest.should_skip_file.is_none());
    assert!(manifest.extensions.is_empty());
    assert!(manifest.title.is_none());
    assert!(manifest.apply.is_none());
}

#[test]
fn test_full_yaml_manifest() {
    let root = TempDir::new().unwrap();
    let content = r#"
title: { template: "Generating into {{ destination }}" }
template_dir: skeleton
template_suffix: .tpl
ignore: ["*.bak"]
extensions: [current_year, case_filters]
style:
  prompt: { prefix: "> " }
questions:
  - key: project_name
    prompt: Project name
  - key: copyright_license
    prompt: License
    choices: [MIT, { value: "None", label: No license }]
  - key: use_ci
    prompt: Use CI?
    type: bool
    default: true
should_skip_file: path == "LICENSE" and copyright_license == "None"
apply:
  uses: [destination, answers]
  command: [python3, generate.py]
"#;
    let manifest = parse_manifest(content, root.path()).unwrap();

    let QuestionSource::Static(questions) = &manifest.questions else {
        panic!("Expected static questions");
    };
    assert_eq!(questions.len(), 3);
    assert_eq!(questions[1].choices[1].display(), "No license");
    assert_eq!(questions[2].value_type, ValueType::Bool);

    assert_eq!(manifest.template_dir, Path::new("skeleton"));
    assert_eq!(manifest.template_dir_in(root.path()), root.path().join("skeleton"));
    assert_eq!(manifest.template_suffix, ".tpl");
    assert_eq!(manifest.ignore, ["*.bak"]);
    assert_eq!(manifest.extensions, [Extension::CurrentYear, Extension::CaseFilters]);
    assert_eq!(manifest.style.prompt.prefix, "> ");
    assert_eq!(manifest.style.prompt.help_separator, " - ");
    assert!(matches!(manifest.title, Some(Title::Template(_))));

    let apply = manifest.apply.as_ref().unwrap();
    assert_eq!(apply.parameters(), ["destination", "answers"]);

    let skip = manifest.should_skip_file.as_ref().unwrap();
    let answers: Answers = [("copyright_license", "None")].into_iter().collect();
    assert!(skip.should_skip("LICENSE", &answers).unwrap());
}

#[test]
fn test_json_manifest() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("sprout.json"),
        r#"{"questions": [{"key": "name", "prompt": "Name"}], "title": "Hello"}"#,
    )
    .unwrap();

    assert_eq!(find_manifest(root.path()).unwrap(), root.path().join("sprout.json"));
    let manifest = load_manifest(root.path()).unwrap();
    assert!(matches!(manifest.title, Some(Title::Text(ref t)) if t == "Hello"));
}

#[test]
fn test_manifest_file_order() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("sprout.json"), "{}").unwrap();
    fs::write(root.path().join("sprout.yaml"), "questions: []").unwrap();

    assert_eq!(find_manifest(root.path()).unwrap(), root.path().join("sprout.yaml"));
}

#[test]
fn test_missing_manifest() {
    let root = TempDir::new().unwrap();
    assert!(matches!(load_manifest(root.path()), Err(Error::ManifestNotFound { .. })));
}

#[test]
fn test_questions_required() {
    let root = TempDir::new().unwrap();
    let err = parse_manifest("template_dir: template\n", root.path()).unwrap_err();
    assert_eq!(symbol_of(err), "questions");

    let err = parse_manifest("questions: 42\n", root.path()).unwrap_err();
    assert_eq!(symbol_of(err), "questions");
}

#[test]
fn test_duplicate_question_keys() {
    let root = TempDir::new().unwrap();
    let content = "questions:\n  - { key: a, prompt: A }\n  - { key: a, prompt: B }\n";
    let err = parse_manifest(content, root.path()).unwrap_err();
    assert_eq!(symbol_of(err), "questions");
}

#[test]
fn test_reserved_and_unknown_question_fields() {
    let root = TempDir::new().unwrap();
    let err = parse_manifest("questions:\n  - { key: path, prompt: Path }\n", root.path())
        .unwrap_err();
    assert_eq!(symbol_of(err), "questions");

    let err = parse_manifest(
        "questions:\n  - { key: name, prompt: Name, defualt: demo }\n",
        root.path(),
    )
    .unwrap_err();
    assert_eq!(symbol_of(err), "questions");
}

#[test]
fn test_malformed_optional_symbols_are_named() {
    let root = TempDir::new().unwrap();
    let cases = [
        ("template_dir: [a, b]", "template_dir"),
        ("template_suffix: ''", "template_suffix"),
        ("ignore: nope", "ignore"),
        ("should_skip_file: 'path =='", "should_skip_file"),
        ("style: 3", "style"),
        ("extensions: [telemetry]", "extensions"),
        ("title: [1, 2]", "title"),
        ("apply: { uses: [], command: [] }", "apply"),
    ];
    for (symbol_line, expected) in cases {
        let content = format!("questions: []\n{symbol_line}\n");
        let err = parse_manifest(&content, root.path()).unwrap_err();
        assert_eq!(symbol_of(err), expected, "for `{symbol_line}`");
    }
}

#[test]
fn test_unknown_apply_parameter_at_load() {
    let root = TempDir::new().unwrap();
    let content = "questions: []\napply: { uses: [destination, network], command: [true] }\n";
    match parse_manifest(content, root.path()) {
        Err(Error::UnknownApplyParameter { parameter }) => assert_eq!(parameter, "network"),
        other => panic!("Expected UnknownApplyParameter, got {other:?}"),
    }
}

#[test]
fn test_resolver_questions() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("questions.yaml"), "- { key: name, prompt: Name }\n").unwrap();

    let manifest =
        parse_manifest("questions: { resolver: questions.yaml }\n", root.path()).unwrap();
    assert!(matches!(manifest.questions, QuestionSource::Resolver(_)));

    let err = parse_manifest("questions: { resolver: missing.yaml }\n", root.path()).unwrap_err();
    assert_eq!(symbol_of(err), "questions");
}
