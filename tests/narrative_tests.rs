mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use heru_core::{
    config::NarrativeConfig,
    domain::seed::initial_transactions,
    narrative::{GeminiClient, NarrativeCollaborator, NarrativeKind, Narrator},
};
use wiremock::{
    matchers::{body_string_contains, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn narrator_for(server: &MockServer, timeout: Duration) -> Narrator {
    let client = GeminiClient::new(
        format!("{}/v1beta", server.uri()),
        "gemini-2.5-flash",
        "test-key",
    )
    .unwrap();
    Narrator::new(
        Some(Arc::new(client) as Arc<dyn NarrativeCollaborator>),
        timeout,
    )
}

fn reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
}

#[tokio::test]
async fn forest_summary_uses_service_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .and(body_string_contains("Acacia Senegal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("Roots of gold rise.")))
        .expect(1)
        .mount(&server)
        .await;

    let narrator = narrator_for(&server, Duration::from_secs(5));
    let text = narrator
        .summarize_forest(&initial_transactions(Utc::now()))
        .await;

    assert_eq!(text, "Roots of gold rise.");
}

#[tokio::test]
async fn impact_prompt_names_the_species() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("Baobab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("Shade for a thousand years.")))
        .mount(&server)
        .await;

    let txs = initial_transactions(Utc::now());
    let text = narrator_for(&server, Duration::from_secs(5))
        .describe_impact(&txs[1])
        .await;

    assert_eq!(text, "Shade for a thousand years.");
}

#[tokio::test]
async fn server_errors_fall_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let narrator = narrator_for(&server, Duration::from_secs(5));
    let txs = initial_transactions(Utc::now());

    assert_eq!(
        narrator.summarize_forest(&txs).await,
        NarrativeKind::ForestSummary.failure_text()
    );
    assert_eq!(
        narrator.describe_impact(&txs[0]).await,
        NarrativeKind::Impact.failure_text()
    );
}

#[tokio::test]
async fn malformed_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let text = narrator_for(&server, Duration::from_secs(5))
        .summarize_forest(&initial_transactions(Utc::now()))
        .await;

    assert_eq!(text, "Your legacy grows with every transaction.");
}

#[tokio::test]
async fn empty_candidate_uses_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("  ")))
        .mount(&server)
        .await;

    let text = narrator_for(&server, Duration::from_secs(5))
        .summarize_forest(&initial_transactions(Utc::now()))
        .await;

    assert_eq!(text, "The roots grow deep where your wealth flows.");
}

#[tokio::test]
async fn slow_service_times_out_to_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply("too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let txs = initial_transactions(Utc::now());
    let started = std::time::Instant::now();
    let text = narrator_for(&server, Duration::from_millis(200))
        .describe_impact(&txs[0])
        .await;

    assert_eq!(text, "Capturing carbon, restoring life.");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn missing_credential_never_calls_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let config = NarrativeConfig {
        endpoint: format!("{}/v1beta", server.uri()),
        api_key_env: common::UNSET_KEY_ENV.into(),
        ..NarrativeConfig::default()
    };
    let narrator = Narrator::from_config(&config);
    assert!(!narrator.is_online());

    let txs = initial_transactions(Utc::now());
    assert_eq!(
        narrator.summarize_forest(&txs).await,
        "Connect your spirit to the network to hear the forest speak."
    );
    assert_eq!(
        narrator.describe_impact(&txs[0]).await,
        "Impact data syncing..."
    );
}
