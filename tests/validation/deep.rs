//! Nested object and array validation with dotted field paths.

use super::*;
use schema_rules::{Descriptor, FirstFields, Rule, Schema, ValidateError, ValidateOptions};
use serde_json::json;

fn quiet() -> ValidateOptions {
    ValidateOptions::new().suppress_warning()
}

#[tokio::test]
async fn test_array_items_are_reported_by_index() {
    let schema = Schema::new(Descriptor::new().field(
        "v",
        Rule::of_type("array").default_field(Rule::of_type("number").max(0.0)),
    ));
    let result = validate_owned(&schema, json!({"v": [1, -1, 2]}), quiet()).await;
    let failure = assert_error_fields!(result, ["v.0", "v.2"]);
    assert_eq!(
        messages(&failure),
        vec!["v.0 cannot be greater than 0", "v.2 cannot be greater than 0"]
    );
}

#[tokio::test]
async fn test_nested_object_paths() {
    let schema = fixtures::registration_schema();
    let mut data = fixtures::valid_registration();
    data["address"] = json!({"street": "", "zip": "123"});
    data["tags"] = json!(["a", " "]);

    let result = validate_owned(&schema, data, quiet()).await;
    let failure = assert_error_messages!(
        result,
        [
            "address.street is required",
            "address.zip must be exactly 5 characters",
            "tags.1 cannot be empty",
        ]
    );
    assert_eq!(fields(&failure), vec!["address.street", "address.zip", "tags.1"]);

    let grouped = failure.fields().expect("field errors");
    let zip = grouped.get("address.zip").expect("zip errors");
    assert_eq!(zip[0].field_value, Some(json!("123")));
}

#[tokio::test]
async fn test_container_errors_precede_child_errors() {
    let schema = Schema::new(Descriptor::new().field(
        "v",
        Rule::of_type("array")
            .max(1.0)
            .default_field(Rule::of_type("string")),
    ));
    let result = validate_owned(&schema, json!({"v": ["a", 2]}), quiet()).await;
    assert_error_messages!(
        result,
        ["v cannot be greater than 1 in length", "v.1 is not a string"]
    );
}

#[tokio::test]
async fn test_three_levels_deep() {
    let schema = Schema::new(Descriptor::new().field(
        "a",
        Rule::of_type("object").fields(Descriptor::new().field(
            "b",
            Rule::of_type("object").fields(
                Descriptor::new().field("c", Rule::of_type("integer").required()),
            ),
        )),
    ));
    let result = validate_owned(&schema, json!({"a": {"b": {"c": 1.5}}}), quiet()).await;
    assert_error_fields!(result, ["a.b.c"]);

    let result = validate_owned(&schema, json!({"a": {"b": {}}}), quiet()).await;
    assert_error_messages!(result, ["a.b.c is required"]);
}

#[tokio::test]
async fn test_fields_override_default_field() {
    let schema = Schema::new(Descriptor::new().field(
        "v",
        Rule::of_type("array")
            .default_field(Rule::of_type("string"))
            .fields(Descriptor::new().field("0", Rule::of_type("number"))),
    ));
    let result = validate_owned(&schema, json!({"v": ["a", "b"]}), quiet()).await;
    assert_error_messages!(result, ["v.0 is not a number"]);
}

#[tokio::test]
async fn test_optional_missing_container_is_skipped() {
    let schema = Schema::new(Descriptor::new().field(
        "address",
        Rule::of_type("object")
            .fields(Descriptor::new().field("street", Rule::of_type("string").required())),
    ));
    assert_validation_success!(validate_owned(&schema, json!({}), quiet()).await);
    assert_validation_success!(validate_owned(&schema, json!({"address": null}), quiet()).await);
}

#[tokio::test]
async fn test_required_missing_container_stops_descent() {
    let schema = fixtures::registration_schema();
    let mut data = fixtures::valid_registration();
    data.as_object_mut().expect("object").remove("address");

    let result = validate_owned(&schema, data, quiet()).await;
    assert_error_messages!(result, ["address is required"]);
}

#[tokio::test]
async fn test_required_missing_container_uses_error_formatter() {
    let schema = Schema::new(Descriptor::new().field(
        "address",
        Rule::of_type("object")
            .required()
            .fields(Descriptor::new().field("street", Rule::of_type("string").required())),
    ));
    let options = quiet().error(|rule, text| {
        ValidateError::new(format!("[{}] {}", rule.rule_type, text), rule.field_path())
    });
    let result = validate_owned(&schema, json!({}), options).await;
    let failure = assert_error_messages!(result, ["[object] address is required"]);
    assert_eq!(fields(&failure), vec!["address"]);
}

#[tokio::test]
async fn test_error_formatter_sees_dotted_path_for_nested_container() {
    let schema = Schema::new(Descriptor::new().field(
        "user",
        Rule::of_type("object").fields(Descriptor::new().field(
            "address",
            Rule::of_type("object")
                .required()
                .fields(Descriptor::new().field("street", Rule::of_type("string").required())),
        )),
    ));
    let options = quiet().error(|rule, text| ValidateError::new(text, rule.field_path()));
    let result = validate_owned(&schema, json!({"user": {}}), options).await;
    let failure = assert_error_messages!(result, ["user.address is required"]);
    assert_eq!(fields(&failure), vec!["user.address"]);
}

#[tokio::test]
async fn test_rule_options_apply_to_children() {
    let schema = Schema::new(Descriptor::new().field(
        "v",
        Rule::of_type("array")
            .default_field(Rule::of_type("string"))
            .options(ValidateOptions::new().first().suppress_warning()),
    ));
    let result = validate_owned(&schema, json!({"v": [1, 2, 3]}), quiet()).await;
    assert_error_messages!(result, ["v.0 is not a string"]);
}

#[tokio::test]
async fn test_first_fields_reaches_nested_levels() {
    let schema = Schema::new(Descriptor::new().field(
        "v",
        Rule::of_type("object").fields(fixtures::doubly_failing()),
    ));
    let options = quiet().first_fields(FirstFields::Flag(true));
    let result = validate_owned(&schema, json!({"v": {"v": "ab", "v2": [1]}}), options).await;
    assert_error_messages!(
        result,
        [
            "v.v must be at least 5 characters",
            "v.v2 cannot be less than 2 in length",
        ]
    );
}
