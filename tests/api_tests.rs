use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use dessert_api::api::{create_router, AppState};
use dessert_api::config::Config;
use dessert_api::services::providers::{ChatProvider, Prompt, ProviderError};

const BASE_URL: &str = "http://desserts.test";

/// Replies with canned text, or fails, without touching the network
struct StubProvider {
    reply: Option<String>,
}

#[async_trait::async_trait]
impl ChatProvider for StubProvider {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, ProviderError> {
        self.reply
            .clone()
            .ok_or_else(|| ProviderError::InvalidResponse("stub failure".to_string()))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn test_config() -> Config {
    let root = env!("CARGO_MANIFEST_DIR");
    Config {
        recipes_path: format!("{}/tests/fixtures/recipes.json", root),
        static_dir: format!("{}/static", root),
        public_base_url: Some(BASE_URL.to_string()),
        ..Config::default()
    }
}

fn server_with(config: Config, provider: Option<Arc<dyn ChatProvider>>) -> TestServer {
    let static_dir = config.static_dir.clone();
    let state = AppState::with_provider(&config, provider);
    let app = create_router(state, &static_dir);
    TestServer::new(app).unwrap()
}

fn create_test_server() -> TestServer {
    server_with(test_config(), None)
}

fn stub(reply: Option<&str>) -> Option<Arc<dyn ChatProvider>> {
    Some(Arc::new(StubProvider {
        reply: reply.map(str::to_string),
    }))
}

fn result_names(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_recommend_vegan_cookies_within_budget() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .json(&json!({ "type": "cookie", "time": 30, "restrictions": ["vegan"] }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(result_names(&body), vec!["黑糖燕麥餅乾", "肉桂杏仁脆餅"]);
    assert_eq!(body["ai_model"], Value::Null);

    let first = &body["results"][0];
    assert_eq!(first["image_path"], "http://desserts.test/static/images/1.png");
    assert!(first["ai_reason"].as_str().unwrap().contains("黑糖燕麥餅乾"));
    assert_eq!(first["instructions"].as_array().unwrap().len(), 3);

    let second = &body["results"][1];
    assert_eq!(second["image_path"], "https://cdn.example.com/biscotti.jpg");
    assert!(second["ai_reason"].as_str().unwrap().contains("肉桂杏仁脆餅"));
}

#[tokio::test]
async fn test_recommend_empty_body_defaults_to_all() {
    let server = create_test_server();

    let response = server.post("/recommend").json(&json!({})).await;

    response.assert_status_ok();
    let body: Value = response.json();
    // fastest recipes across every category, range times use their minimum
    assert_eq!(result_names(&body), vec!["黑糖燕麥餅乾", "肉桂杏仁脆餅"]);
}

#[tokio::test]
async fn test_recommend_backfills_when_nothing_fits() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .json(&json!({ "type": "bread", "time": "5" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(result_names(&body), vec!["史多倫聖誕麵包", "黑糖燕麥餅乾"]);
}

#[tokio::test]
async fn test_recommend_empty_json_body_reads_as_empty_object() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .bytes(Bytes::new())
        .content_type("application/json")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(result_names(&body), vec!["黑糖燕麥餅乾", "肉桂杏仁脆餅"]);
}

#[tokio::test]
async fn test_recommend_accepts_json_suffix_content_type() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .bytes(Bytes::from_static(br#"{"type": "cakes"}"#))
        .content_type("application/vnd.desserts+json")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][0]["name"], "蘭姆葡萄磅蛋糕");
}

#[tokio::test]
async fn test_recommend_boolean_time_is_one_minute() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .json(&json!({ "type": "cookies", "time": true }))
        .await;

    // nothing fits in one minute, so both results are backfilled by time
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(result_names(&body), vec!["黑糖燕麥餅乾", "肉桂杏仁脆餅"]);
}

#[tokio::test]
async fn test_recommend_requires_json() {
    let server = create_test_server();

    let response = server.post("/recommend").text("type=cookie").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Request body must be JSON");
}

#[tokio::test]
async fn test_recommend_rejects_malformed_json() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .bytes("{\"type\": ".into())
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommend_rejects_non_integer_time() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .json(&json!({ "time": "half an hour" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "time must be an integer (minutes)");
}

#[tokio::test]
async fn test_recommend_missing_dataset() {
    let config = Config {
        recipes_path: "/nonexistent/recipes.json".to_string(),
        ..test_config()
    };
    let server = server_with(config, None);

    let response = server.post("/recommend").json(&json!({})).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to load recipes");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_recommend_uses_model_reasons() {
    let reply = r#"[{"name": "黑糖燕麥餅乾", "reason": "黑糖香氣像壁爐一樣溫暖。"}, {"name": "肉桂杏仁脆餅", "reason": "肉桂香讓聖誕夜更甜蜜。"}]"#;
    let server = server_with(test_config(), stub(Some(reply)));

    let response = server
        .post("/recommend")
        .json(&json!({ "type": "cookies", "time": 30 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ai_model"], "llama3-70b-8192");
    assert_eq!(body["results"][0]["ai_reason"], "黑糖香氣像壁爐一樣溫暖。");
    assert_eq!(body["results"][1]["ai_reason"], "肉桂香讓聖誕夜更甜蜜。");
}

#[tokio::test]
async fn test_recommend_provider_failure_falls_back() {
    let server = server_with(test_config(), stub(None));

    let response = server
        .post("/recommend")
        .json(&json!({ "type": "cookies", "time": 30 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ai_model"], "llama3-70b-8192");
    assert!(body["results"][0]["ai_reason"]
        .as_str()
        .unwrap()
        .contains("黑糖燕麥餅乾"));
}

#[tokio::test]
async fn test_christmas_card_defaults() {
    let server = create_test_server();

    let response = server.post("/christmas_card").json(&json!({})).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["recipient"], "聖誕甜點好友");
    assert_eq!(body["tone"], "warm");
    assert_eq!(body["ai_generated"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("親愛的 聖誕甜點好友"));
}

#[tokio::test]
async fn test_christmas_card_fallback_mentions_desserts() {
    let server = create_test_server();

    let response = server
        .post("/christmas_card")
        .json(&json!({
            "name": " 小美 ",
            "desserts": ["薑餅人", "史多倫", "潘娜朵尼", "肉桂捲"],
            "tone": "Classic"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["recipient"], "小美");
    assert_eq!(body["tone"], "classic");
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("敬愛的 小美"));
    assert!(message.contains("薑餅人、史多倫、潘娜朵尼"));
    assert!(!message.contains("肉桂捲"));
}

#[tokio::test]
async fn test_christmas_card_with_model() {
    let server = server_with(
        test_config(),
        stub(Some("\"親愛的小美，願雪花與燈火陪你度過最甜蜜的聖誕夜 🎄\"")),
    );

    let response = server
        .post("/christmas_card")
        .json(&json!({ "name": "小美", "tone": "festive" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ai_generated"], true);
    assert_eq!(
        body["message"],
        "親愛的小美，願雪花與燈火陪你度過最甜蜜的聖誕夜 🎄"
    );
}

#[tokio::test]
async fn test_christmas_card_flags_configured_model_on_fallback() {
    let server = server_with(test_config(), stub(Some("短")));

    let response = server
        .post("/christmas_card")
        .json(&json!({ "name": "A" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ai_generated"], true);
    assert!(body["message"].as_str().unwrap().starts_with("親愛的 A"));
}

#[tokio::test]
async fn test_shopping_list_backfills_unknown_selection() {
    let server = create_test_server();

    let response = server
        .post("/shopping_list")
        .json(&json!({ "recipes": [{ "name": "Nonexistent" }] }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["recipes"][0]["name"], "黑糖燕麥餅乾");
    assert_eq!(body["recipes"][1]["name"], "肉桂杏仁脆餅");

    let mut expected = vec![
        "燕麥片 100g",
        "黑糖 60g",
        "椰子油 40ml",
        "低筋麵粉 80g",
        "低筋麵粉 120g",
        "杏仁片 50g",
        "肉桂粉 1小匙",
        "砂糖 50g",
    ];
    expected.sort();
    let list: Vec<String> = serde_json::from_value(body["shopping_list"].clone()).unwrap();
    assert_eq!(list, expected);
}

#[tokio::test]
async fn test_shopping_list_mixed_selectors() {
    let server = create_test_server();

    let response = server
        .post("/shopping_list")
        .json(&json!({
            "recipes": [
                { "category": "cakes", "id": 2 },
                "史多倫聖誕麵包",
                { "category": "cookies", "id": 3 }
            ]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 3);
    assert_eq!(body["recipes"].as_array().unwrap().len(), 2);
    assert_eq!(body["recipes"][0]["category"], "cakes");
    assert_eq!(body["recipes"][0]["name"], "蘭姆葡萄磅蛋糕");
    assert_eq!(body["recipes"][1]["category"], "breads");

    // the third recipe is not listed but its ingredients are
    let list: Vec<String> = serde_json::from_value(body["shopping_list"].clone()).unwrap();
    assert!(list.contains(&"薑粉 2小匙".to_string()));
    let mut sorted = list.clone();
    sorted.sort();
    assert_eq!(list, sorted);
}

#[tokio::test]
async fn test_shopping_list_requires_recipes() {
    let server = create_test_server();

    for body in [json!({}), json!({ "recipes": [] }), json!({ "recipes": "薑餅人" })] {
        let response = server.post("/shopping_list").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "recipes must be a non-empty list");
    }
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-123"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-request-id"), "trace-123");
}
