use conduit_config::{ConduitConfig, ConfigLoader};
use conduit_http::{HttpMethod, MockTransport, RawReply, Scheme};
use conduit_registry::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

fn services(yaml: &str) -> BTreeMap<String, ServiceConfig> {
    serde_yaml::from_str(yaml).unwrap()
}

#[tokio::test]
async fn test_configured_client_targets_declared_host_and_port() {
    let transport = Arc::new(MockTransport::new());
    transport.add_reply(
        HttpMethod::Get,
        "https://h:1/status",
        RawReply::json(200, &json!({"up": true})),
    );

    let registry = ServiceRegistry::with_transport(transport.clone());
    registry
        .configure(services("svc: {type: https, host: h, port: 1}"))
        .await
        .unwrap();

    let client = registry.get("svc").await.expect("svc should be registered");
    let response = client.get("/status", RequestOptions::new()).await.unwrap();
    assert_eq!(response.body.as_json(), Some(&json!({"up": true})));

    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].host, "h");
    assert_eq!(sent[0].port, 1);
    assert_eq!(sent[0].scheme, Scheme::Https);
}

#[tokio::test]
async fn test_all_returns_exactly_the_configured_names() {
    let registry = ServiceRegistry::with_transport(Arc::new(MockTransport::new()));
    registry
        .configure(services(
            r#"
users: {type: https, host: users, port: 443}
billing: {type: http, host: billing, port: 8080}
"#,
        ))
        .await
        .unwrap();

    let all = registry.all().await;
    let mut keys: Vec<_> = all.keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, vec!["billing", "users"]);
    assert_eq!(registry.names().await, keys);

    // The snapshot shares the registered clients
    let users = registry.get("users").await.unwrap();
    assert!(Arc::ptr_eq(&all["users"], &users));
}

#[tokio::test]
async fn test_unsupported_type_rejects_whole_batch() {
    let registry = ServiceRegistry::with_transport(Arc::new(MockTransport::new()));
    registry
        .configure(services("existing: {type: http, host: e, port: 1}"))
        .await
        .unwrap();

    let batch = vec![
        (
            "users".to_string(),
            ServiceConfig::new("users", 443).with_scheme("https"),
        ),
        (
            "queue".to_string(),
            ServiceConfig::new("queue", 5672).with_scheme("rpc"),
        ),
        (
            "billing".to_string(),
            ServiceConfig::new("billing", 80).with_scheme("http"),
        ),
    ];

    let error = registry.configure(batch).await.unwrap_err();
    match error {
        RegistryError::UnsupportedServiceType { name, kind } => {
            assert_eq!(name, "queue");
            assert_eq!(kind, "rpc");
        }
        other => panic!("expected unsupported type, got {:?}", other),
    }

    // Nothing from the rejected batch was registered, earlier state kept
    assert_eq!(registry.names().await, vec!["existing"]);
    assert!(registry.get("users").await.is_none());
    assert!(registry.get("billing").await.is_none());
}

#[tokio::test]
async fn test_type_match_is_case_sensitive() {
    let registry = ServiceRegistry::with_transport(Arc::new(MockTransport::new()));
    let result = registry
        .configure(vec![(
            "users".to_string(),
            ServiceConfig::new("users", 443).with_scheme("HTTPS"),
        )])
        .await;

    assert!(matches!(
        result,
        Err(RegistryError::UnsupportedServiceType { .. })
    ));
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_missing_host_surfaces_per_call() {
    let transport = Arc::new(MockTransport::new());
    let registry = ServiceRegistry::with_transport(transport.clone());
    registry
        .configure(vec![(
            "hostless".to_string(),
            ServiceConfig::new("", 8080).with_scheme("http"),
        )])
        .await
        .unwrap();

    let client = registry.get("hostless").await.unwrap();
    let error = client.get("/x", RequestOptions::new()).await.unwrap_err();

    assert_eq!(error.to_json(), json!({"type": 500, "message": "Host required"}));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_registry_from_loaded_config() {
    let yaml = r#"
http:
  user_agent: "orders/1.0"
services:
  users:
    type: http
    host: users.internal
    port: 8080
  search:
    host: search.internal
    port: 443
"#;
    let config = ConfigLoader::with_prefix("CONDUIT_REGISTRY_TEST")
        .from_yaml_str(yaml)
        .unwrap();

    let registry = ServiceRegistry::from_config(&config).await.unwrap();
    assert_eq!(registry.names().await, vec!["search", "users"]);

    let search = registry.get("search").await.unwrap();
    assert_eq!(search.name(), "search");
    assert_eq!(search.scheme(), Scheme::Https);
}

#[tokio::test]
async fn test_from_config_rejects_invalid_config() {
    let mut config = ConduitConfig::default();
    config.services.insert(
        "queue".to_string(),
        ServiceConfig::new("queue", 5672).with_scheme("amqp"),
    );

    let result = ServiceRegistry::from_config(&config).await;
    assert!(matches!(result, Err(RegistryError::Configuration(_))));
}
