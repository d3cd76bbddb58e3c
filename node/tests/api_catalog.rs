use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use scorekeeper_kernel::catalog::{TranslationItem, WordItem, WordKind};
use scorekeeper_node::api::WordsResponse;
use scorekeeper_node::config::NodeConfig;
use scorekeeper_node::server::build_router;
use scorekeeper_node::state::{AppState, Stores};
use scorekeeper_persistence::{JsonTranslations, JsonWordCatalog};
use serde_json::Value;
use tower::ServiceExt; // for oneshot

fn word(category: &str, id: &str, text: &str, round: u8, language: &str) -> WordItem {
    WordItem {
        category: category.to_string(),
        word_id: id.to_string(),
        word: text.to_string(),
        round,
        kind: WordKind::Normal,
        language: language.to_string(),
    }
}

fn app() -> Router {
    let mut stores = Stores::in_memory();
    stores.words = Arc::new(JsonWordCatalog::from_items(vec![
        word("beginner_words", "bw_1_001", "りんご", 1, "jp"),
        word("beginner_words", "bw_1_002", "apple", 1, "en"),
        word("beginner_words", "bw_2_001", "みかん", 2, "jp"),
    ]));
    stores.translations = Arc::new(JsonTranslations::from_items(vec![TranslationItem {
        word_id: "bw_1_001".to_string(),
        language: "en".to_string(),
        translation: "apple".to_string(),
        category: Some("beginner_words".to_string()),
    }]));

    let cfg = NodeConfig::default();
    build_router(AppState::new(stores, &cfg), &cfg.route_prefixes)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_words_default_language() {
    let (status, body) = get(app(), "/api/game/words/beginner_words/1").await;
    assert_eq!(status, StatusCode::OK);

    let resp: WordsResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.language, "jp");
    assert_eq!(resp.round, 1);
    assert_eq!(resp.words.len(), 1);
    assert_eq!(resp.words[0].word, "りんご");
}

#[tokio::test]
async fn test_words_english() {
    let (status, body) = get(app(), "/api/game/words/beginner_words/1?language=en").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["words"][0]["word"], "apple");
    assert_eq!(body["words"][0]["type"], "normal");
}

#[tokio::test]
async fn test_words_bad_parameters() {
    let cases = [
        ("/api/game/words/advanced_words/1", "Invalid category parameter"),
        ("/api/game/words/beginner_words/6", "Invalid round parameter"),
        ("/api/game/words/beginner_words/one", "Invalid round parameter"),
        ("/api/game/words/beginner_words/1?language=fr", "Invalid language parameter"),
    ];

    for (uri, expected) in cases {
        let (status, body) = get(app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], expected);
    }
}

#[tokio::test]
async fn test_categories_by_language() {
    let (status, body) = get(app(), "/api/game/categories?language=en").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"].as_array().unwrap().len(), 4);
    assert_eq!(body["categories"][0]["name"], "Beginner Words");

    let (_, body) = get(app(), "/api/game/categories").await;
    assert_eq!(body["categories"][0]["name"], "初級単語");
}

#[tokio::test]
async fn test_translation() {
    let (status, body) = get(app(), "/api/game/translation/bw_1_001?language=en").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translation"], "apple");
    assert_eq!(body["word_id"], "bw_1_001");
    assert_eq!(body["language"], "en");

    let (status, body) = get(app(), "/api/game/translation/bw_1_001?language=ko").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Translation not found");

    let (status, body) = get(app(), "/api/game/translation/bw_1_001").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "language query parameter is required");

    let (status, _) = get(app(), "/api/game/translation/bw_1_001?language=xx").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
