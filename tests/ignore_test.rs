use sprout::error::Error;
use sprout::ignore::build_ignore_set;

#[test]
fn test_default_patterns_always_apply() {
    let set = build_ignore_set::<&str>(&[]).unwrap();
    assert!(set.is_match("pkg/__pycache__/mod.cpython-312.pyc"));
    assert!(set.is_match("notes.txt~"));
    assert!(set.is_match("sub/.DS_Store"));
    assert!(!set.is_match("README.md.jinja"));
}

#[test]
fn test_manifest_patterns_extend_defaults() {
    let set = build_ignore_set(&["*.bak", "build/**"]).unwrap();
    assert!(set.is_match("main.rs.bak"));
    assert!(set.is_match("build/output.txt"));
    assert!(set.is_match("cache.pyc"));
    assert!(!set.is_match("src/main.rs"));
}

#[test]
fn test_invalid_pattern() {
    let result = build_ignore_set(&["a[b"]);
    assert!(matches!(result, Err(Error::IgnoreError(_))));
}
