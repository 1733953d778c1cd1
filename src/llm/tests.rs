use super::*;
use serde_json::{Value, json};
use std::net::TcpListener;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

fn config_for(server: &MockServer) -> Config {
    Config {
        api_url: format!("{}{COMPLETIONS_PATH}", server.uri()),
        timeout_secs: 5,
        ..Config::default()
    }
}

fn reply_body(content: &str) -> Value {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
}

/// mount a single response for every completion request
async fn respond_with(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

/// run a blocking endpoint call off the async runtime
async fn blocking<T: Send + 'static>(call: impl FnOnce() -> T + Send + 'static) -> T {
    tokio::task::spawn_blocking(call).await.unwrap()
}

#[tokio::test]
async fn test_generate_returns_reply_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(body_partial_json(json!({
            "model": "local-model",
            "max_tokens": 50,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": "prompt text"},
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("  Добавил кэш \n")))
        .expect(1)
        .mount(&server)
        .await;
    let config = config_for(&server);

    let reply = blocking(move || generate(&config, "prompt text", false))
        .await
        .unwrap();
    assert_eq!(reply, "Добавил кэш");
}

#[tokio::test]
async fn test_generate_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("Обновил ключи")))
        .expect(1)
        .mount(&server)
        .await;
    let config = Config {
        api_key: Some("secret".to_string()),
        ..config_for(&server)
    };

    let reply = blocking(move || generate(&config, "prompt", false))
        .await
        .unwrap();
    assert_eq!(reply, "Обновил ключи");
}

#[tokio::test]
async fn test_generate_reports_http_errors() {
    let server = MockServer::start().await;
    respond_with(&server, ResponseTemplate::new(500)).await;
    let config = config_for(&server);

    let err = blocking(move || generate(&config, "prompt", false))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("HTTP 500"), "{err}");
    assert!(failure_hints(&err).is_empty());
}

#[tokio::test]
async fn test_generate_reports_rate_limit() {
    let server = MockServer::start().await;
    respond_with(&server, ResponseTemplate::new(429)).await;
    let config = config_for(&server);

    let err = blocking(move || generate(&config, "prompt", false))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("rate limiting"), "{err}");
}

#[tokio::test]
async fn test_generate_rejects_empty_choices() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"choices": []})),
    )
    .await;
    let config = config_for(&server);

    let err = blocking(move || generate(&config, "prompt", false))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no choices"), "{err}");
}

#[tokio::test]
async fn test_slow_endpoint_times_out_with_hints() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(reply_body("Добавил кэш"))
            .set_delay(std::time::Duration::from_secs(3)),
    )
    .await;
    let config = Config {
        timeout_secs: 1,
        ..config_for(&server)
    };

    let err = blocking(move || generate(&config, "prompt", false))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("did not answer within 1s"), "{err}");
    assert_eq!(failure_hints(&err), TIMEOUT_HINTS);
}

#[test]
fn test_unreachable_endpoint_gives_connection_hints() {
    // bind then drop to get a port nobody listens on
    let addr = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let config = Config {
        api_url: format!("http://{addr}{COMPLETIONS_PATH}"),
        timeout_secs: 5,
        ..Config::default()
    };

    let err = generate(&config, "prompt", false).unwrap_err();
    assert!(err.to_string().contains("failed to reach"), "{err}");
    assert_eq!(failure_hints(&err), CONNECTION_HINTS);
}

#[tokio::test]
async fn test_sample_message_is_sanitized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(body_string_contains("def hello"))
        .and(body_string_contains("M  test.py"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(reply_body("\"Добавил комментарий.\"")),
        )
        .expect(1)
        .mount(&server)
        .await;
    let config = config_for(&server);

    let message = blocking(move || sample_message(&config)).await.unwrap();
    assert_eq!(message.as_deref(), Some("Добавил комментарий"));
}

#[tokio::test]
async fn test_check_runs_connection_and_generation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("Добавил комментарий")))
        .expect(2)
        .mount(&server)
        .await;
    let config = config_for(&server);

    blocking(move || check(&config)).await.unwrap();
}

#[tokio::test]
async fn test_check_fails_on_unusable_sample() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(reply_body("да")),
    )
    .await;
    let config = config_for(&server);

    let err = blocking(move || check(&config)).await.unwrap_err();
    assert!(err.to_string().contains("not usable"), "{err}");
}

#[test]
fn test_prompt_contains_context_and_truncated_diff() {
    let diff = format!("+{}", "ж".repeat(100));
    let prompt = build_prompt("Изменены: app.py", "M  app.py", "", &diff, 10);

    assert!(prompt.contains("Изменены: app.py"));
    assert!(prompt.contains("M  app.py"));
    assert!(prompt.contains(&format!("+{}\n", "ж".repeat(9))));
    assert!(!prompt.contains(&"ж".repeat(10)));
    assert!(prompt.starts_with("Проанализируй"));
    assert!(!prompt.contains("Статистика"));
}

#[test]
fn test_prompt_includes_diff_stats() {
    let stats = " app.py | 2 +-\n 1 file changed, 1 insertion(+), 1 deletion(-)";
    let prompt = build_prompt("Изменены: app.py", "M  app.py", stats, "+x", 100);

    assert!(prompt.contains(&format!("M  app.py\n\nСтатистика:\n{stats}\n\nDiff (отрывок):")));
}

#[test]
fn test_truncate_chars() {
    assert_eq!(truncate_chars("привет", 3), "при");
    assert_eq!(truncate_chars("abc", 10), "abc");
    assert_eq!(truncate_chars("", 0), "");
}
