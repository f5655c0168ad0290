//! Install flow against a mocked terraform and a local HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use dct_e2e::{E2eError, Installer, TestConfig};
use dct_iac::{IacError, ProductList};
use dct_runner::{MockResponse, MockRunner};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(products: &str) -> TestConfig {
    TestConfig {
        aws_region: "us-east-2".into(),
        environment_name: "e2etest-abc123".into(),
        config_path: PathBuf::from("/tmp/e2etest-abc123.tfvars"),
        resource_owner: "ci".into(),
        products: ProductList::parse_csv(products).unwrap(),
        confluence_license: String::new(),
        bitbucket_license: String::new(),
        bamboo_license: "lic".into(),
        bamboo_password: "secret123".into(),
        bitbucket_password: String::new(),
    }
}

fn outputs(urls: serde_json::Value) -> MockResponse {
    MockResponse::success(
        json!({ "product_urls": { "sensitive": false, "type": "object", "value": urls } })
            .to_string(),
    )
}

#[tokio::test]
async fn test_install_verifies_and_destroys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bamboo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Bamboo</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let mock = MockRunner::new().respond_to(
        "output",
        outputs(json!({ "bamboo": format!("{}/bamboo", server.uri()) })),
    );
    let installer = Installer::new(Arc::new(mock.clone()), "install", "deplops.com");

    let checks = installer.run(&test_config("bamboo")).await.unwrap();

    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].bytes, "<html>Bamboo</html>".len());
    assert_eq!(mock.subcommands(), vec!["init", "apply", "output", "destroy"]);

    let apply = &mock.get_subcommand_calls("apply")[0];
    assert!(apply.has_arg("-auto-approve"));
    assert!(apply
        .args
        .iter()
        .any(|a| a == "-var-file=/tmp/e2etest-abc123.tfvars"));
}

#[tokio::test]
async fn test_failed_apply_still_destroys() {
    let mock = MockRunner::new().respond_to("apply", MockResponse::failure(1, "quota exceeded"));
    let installer = Installer::new(Arc::new(mock.clone()), "install", "deplops.com");

    let err = installer.run(&test_config("jira")).await.unwrap_err();

    assert!(matches!(err, E2eError::Iac(IacError::ApplyFailed(_))));
    assert!(mock.was_called("destroy"));
    assert!(!mock.was_called("output"));
}

#[tokio::test]
async fn test_unreachable_product_reported_after_destroy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mock = MockRunner::new()
        .respond_to("output", outputs(json!({ "jira": format!("{}/jira", server.uri()) })))
        .respond_to("destroy", MockResponse::failure(1, "still in use"));
    let installer = Installer::new(Arc::new(mock.clone()), "install", "deplops.com");

    let err = installer.run(&test_config("jira")).await.unwrap_err();

    assert!(matches!(err, E2eError::UnexpectedStatus { status: 404, .. }));
    assert!(mock.was_called("destroy"));
}
