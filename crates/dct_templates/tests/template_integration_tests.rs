//! Integration tests for file rendering.

use std::collections::HashMap;
use std::fs;

use dct_templates::{TemplateError, TemplateRenderer};
use tempfile::tempdir;

#[test]
fn test_render_file_writes_absolute_output() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("test-config.tfvars.tmpl");
    fs::write(
        &template,
        "environment_name = \"{{.environment_name}}\"\nproducts = [{{.products}}]\n",
    )
    .unwrap();

    let mut vars = HashMap::new();
    vars.insert("environment_name".to_string(), "e2etest-x1y2z3".to_string());
    vars.insert("products".to_string(), "\"jira\",\"bamboo\"".to_string());

    let output = dir.path().join("out").join("test-config.tfvars");
    let path = TemplateRenderer::new()
        .render_file(&template, &output, &vars)
        .unwrap();

    assert!(path.is_absolute());
    let content = fs::read_to_string(path).unwrap();
    assert_eq!(
        content,
        "environment_name = \"e2etest-x1y2z3\"\nproducts = [\"jira\",\"bamboo\"]\n"
    );
}

#[test]
fn test_render_file_missing_template() {
    let dir = tempdir().unwrap();
    let err = TemplateRenderer::new()
        .render_file(
            &dir.path().join("nope.tmpl"),
            &dir.path().join("out.tfvars"),
            &HashMap::new(),
        )
        .unwrap_err();

    assert!(matches!(err, TemplateError::NotFound(_)));
    assert!(!dir.path().join("out.tfvars").exists());
}

#[test]
fn test_render_file_missing_variable_writes_nothing() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("t.tmpl");
    fs::write(&template, "region = \"{{.region}}\"").unwrap();

    let output = dir.path().join("out.tfvars");
    let err = TemplateRenderer::new()
        .render_file(&template, &output, &HashMap::new())
        .unwrap_err();

    assert!(err.to_string().contains("region"));
    assert!(!output.exists());
}
