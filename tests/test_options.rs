// Copyright (C) Brian G. Milnes 2025

//! Tests for inspection options

use phpinspect::{Options, OptionsError};
use std::fs;

#[test]
fn test_defaults() {
    let options = Options::default();
    assert!(options.report_literal_operators);
    assert!(options.report_duplicate_conditions);
    assert!(options.report_missing_parentheses);
    assert!(options.report_isset_null_comparison);
    assert!(!options.use_short_array_syntax);
    assert!(options.disabled_rules.is_empty());
    assert!(options.is_rule_enabled("unused-mock"));
}

#[test]
fn test_missing_keys_keep_defaults() {
    let options = Options::from_json_str(r#"{"use_short_array_syntax": true, "disabled_rules": ["unused-mock"]}"#).unwrap();
    assert!(options.use_short_array_syntax);
    assert!(options.report_literal_operators);
    assert!(!options.is_rule_enabled("unused-mock"));
    assert!(options.is_rule_enabled("cascade-string-replacement"));
}

#[test]
fn test_invalid_json_is_an_error() {
    let err = Options::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, OptionsError::Json(_)));
    let err = Options::from_json_str(r#"{"report_literal_operators": "yes"}"#).unwrap_err();
    assert!(matches!(err, OptionsError::Json(_)));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phpinspect.json");
    fs::write(&path, r#"{"report_missing_parentheses": false, "cheap_functions": ["is_valid"]}"#).unwrap();
    let options = Options::load(&path).unwrap();
    assert!(!options.report_missing_parentheses);
    assert!(options.cheap_function_set().contains("is_valid"));

    let missing = Options::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(missing, OptionsError::Io { .. }));
    assert!(missing.to_string().contains("absent.json"));
}

#[test]
fn test_round_trip_through_json() {
    let options = Options { report_literal_operators: false, ..Options::default() };
    let json = serde_json::to_string(&options).unwrap();
    assert_eq!(Options::from_json_str(&json).unwrap(), options);
}
