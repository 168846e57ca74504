//! Presence and emptiness rules.

use super::*;
use schema_rules::{Descriptor, Rule, Schema, ValidateOptions};
use serde_json::json;

fn quiet() -> ValidateOptions {
    ValidateOptions::new().suppress_warning()
}

#[tokio::test]
async fn test_required_reports_each_empty_form() {
    let schema = Schema::new(Descriptor::new().field("v", Rule::new().required()));
    for data in [json!({}), json!({"v": null}), json!({"v": ""})] {
        let result = validate_owned(&schema, data, quiet()).await;
        assert_error_messages!(result, ["v is required"]);
    }
}

#[tokio::test]
async fn test_required_string_rule() {
    let schema = Schema::new(Descriptor::new().field("v", Rule::of_type("string").required()));
    let result = validate_owned(&schema, json!({"v": ""}), quiet()).await;
    assert_error_messages!(result, ["v is required"]);

    let result = validate_owned(&schema, json!({"v": "x"}), quiet()).await;
    assert_validation_success!(result);
}

#[tokio::test]
async fn test_required_array_treats_empty_array_as_missing() {
    let schema = Schema::new(Descriptor::new().field("v", Rule::of_type("array").required()));
    let result = validate_owned(&schema, json!({"v": []}), quiet()).await;
    assert_error_messages!(result, ["v is required"]);

    let result = validate_owned(&schema, json!({"v": [0]}), quiet()).await;
    assert_validation_success!(result);
}

#[tokio::test]
async fn test_empty_array_is_present_for_untyped_rule() {
    let schema = Schema::new(Descriptor::new().field("v", Rule::new().required()));
    let result = validate_owned(&schema, json!({"v": []}), quiet()).await;
    assert_error_messages!(result, ["v is required"]);

    // falsy but present values satisfy required
    for data in [json!({"v": 0}), json!({"v": false})] {
        assert_validation_success!(validate_owned(&schema, data, quiet()).await);
    }
}

#[tokio::test]
async fn test_custom_message_is_used_verbatim() {
    let schema = Schema::new(
        Descriptor::new().field("v", Rule::new().required().message("Please enter v")),
    );
    let result = validate_owned(&schema, json!({}), quiet()).await;
    assert_error_messages!(result, ["Please enter v"]);
}

#[tokio::test]
async fn test_optional_missing_fields_are_skipped() {
    let schema = Schema::new(
        Descriptor::new()
            .field("s", Rule::of_type("string").min(3.0))
            .field("n", Rule::of_type("number").max(1.0))
            .field("d", Rule::of_type("date"))
            .field("e", Rule::of_type("email")),
    );
    assert_validation_success!(validate_owned(&schema, json!({}), quiet()).await);
    assert_validation_success!(validate_owned(&schema, json!({"s": "", "e": ""}), quiet()).await);
}

#[tokio::test]
async fn test_explicit_not_required_still_checks_presence_only() {
    let schema = Schema::new(Descriptor::new().field("v", Rule::new().set_required(false)));
    assert_validation_success!(validate_owned(&schema, json!({}), quiet()).await);
    assert_validation_success!(validate_owned(&schema, json!({"v": ""}), quiet()).await);
}
