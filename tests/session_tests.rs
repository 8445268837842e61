// tests/session_tests.rs

use std::sync::Arc;

use love_language::{
    config::Config,
    routes,
    state::AppState,
    store::InMemoryResultStore,
    utils::jwt::sign_jwt,
};

const SECRET: &str = "session_test_secret";

/// Spawns the app with JWT sign-in and an in-memory result store.
async fn spawn_app() -> String {
    let config = Config {
        jwt_secret: Some(SECRET.to_string()),
        ..Config::demo()
    };

    let state = AppState::with_store(config, Arc::new(InMemoryResultStore::new()));
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn bearer(uid: &str, name: &str) -> String {
    format!("Bearer {}", sign_jwt(uid, name, SECRET, 600).unwrap())
}

/// Creates a signed-in session and returns its base URL.
async fn open_session(client: &reqwest::Client, address: &str, uid: &str, name: &str) -> String {
    let response = client
        .post(&format!("{}/api/sessions", address))
        .header("Authorization", bearer(uid, name))
        .send()
        .await
        .expect("Create session failed");
    assert_eq!(response.status().as_u16(), 201);

    let created: serde_json::Value = response.json().await.unwrap();
    assert_eq!(created["identity"]["uid"], uid);
    format!(
        "{}/api/sessions/{}",
        address,
        created["session_id"].as_str().unwrap()
    )
}

/// Takes the whole quiz, answering question i with `choose(i)`.
async fn take_quiz(client: &reqwest::Client, base: &str, choose: fn(usize) -> usize) -> serde_json::Value {
    let response = client
        .post(&format!("{}/start", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let mut last = serde_json::Value::Null;
    for i in 0..30 {
        let response = client
            .post(&format!("{}/answers", base))
            .json(&serde_json::json!({ "option": choose(i) }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        last = response.json().await.unwrap();
    }
    assert_eq!(last["view"]["name"], "results");
    last
}

#[tokio::test]
async fn start_without_sign_in_is_unauthorized() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let created: serde_json::Value = client
        .post(&format!("{}/api/sessions", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(created["identity"].is_null());
    let base = format!("{}/api/sessions/{}", address, created["session_id"].as_str().unwrap());

    let response = client.post(&format!("{}/start", base)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = client
        .post(&format!("{}/start", base))
        .header("Authorization", "Bearer not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // Signing in with the start request works
    let response = client
        .post(&format!("{}/start", base))
        .header("Authorization", bearer("u1", "Sam"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn completed_quiz_is_saved_and_fetchable() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let base = open_session(&client, &address, "u1", "Sam").await;
    let results = take_quiz(&client, &base, |_| 0).await;

    let stored: serde_json::Value = client
        .get(&format!("{}/api/results/u1", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stored["display_name"], "Sam");
    assert_eq!(stored["scores"], results["result"]["scores"]);
    assert_eq!(stored["answers"], results["result"]["answers"]);
    assert_eq!(stored["answers"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn two_users_compare_results() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let alex = open_session(&client, &address, "alex", "Alex").await;
    take_quiz(&client, &alex, |_| 1).await;

    let sam = open_session(&client, &address, "sam", "Sam").await;
    take_quiz(&client, &sam, |_| 0).await;

    // Unknown partner is a benign 404 and the session stays on results
    let response = client
        .post(&format!("{}/compare", sam))
        .json(&serde_json::json!({ "partner_id": "nobody" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let current: serde_json::Value = client.get(&sam).send().await.unwrap().json().await.unwrap();
    assert_eq!(current["view"]["name"], "results");

    // Compare focusing on Quality Time
    let response = client
        .post(&format!("{}/compare", sam))
        .json(&serde_json::json!({ "partner_id": "alex", "focus": "B" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let compared: serde_json::Value = response.json().await.unwrap();
    let comparison = &compared["comparison"];
    assert_eq!(comparison["partner_name"], "Alex");
    assert_eq!(comparison["focus"], "B");

    // Always-first and always-second disagree on every question offering B
    let diffs = comparison["diffs"].as_array().unwrap();
    assert_eq!(diffs.len(), 12);
    let ids: Vec<u64> = diffs.iter().map(|d| d["question_id"].as_u64().unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);

    // The reverse comparison finds the same number of diffs
    client.post(&format!("{}/home", alex)).send().await.unwrap();
    client.post(&format!("{}/review", alex)).send().await.unwrap();
    let reverse: serde_json::Value = client
        .post(&format!("{}/compare", alex))
        .json(&serde_json::json!({ "partner_id": "sam", "focus": "B" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reverse["comparison"]["diffs"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn review_saved_without_result_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let base = open_session(&client, &address, "fresh", "Fresh").await;
    let response = client.post(&format!("{}/review", base)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let current: serde_json::Value = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert_eq!(current["view"]["name"], "landing");
}

#[tokio::test]
async fn sign_out_returns_to_landing() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let base = open_session(&client, &address, "u1", "Sam").await;
    client.post(&format!("{}/start", base)).send().await.unwrap();

    let signed_out: serde_json::Value = client
        .post(&format!("{}/sign-out", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(signed_out["view"]["name"], "landing");
    assert!(signed_out["identity"].is_null());

    let signed_in: serde_json::Value = client
        .post(&format!("{}/sign-in", base))
        .header("Authorization", bearer("u1", "<b>Sam</b>"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(signed_in["identity"]["display_name"], "Sam");
}
