use crate::config::Config;
use crate::{info, sanitize, status, warning};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SYSTEM_PROMPT: &str =
    "Ты помощник для создания git коммитов. Отвечай только сообщением коммита, без лишних слов.";

const CHECK_QUESTION: &str = "Привет! Ответь одним словом: работает?";

const SAMPLE_STATUS: &str = "M  test.py";

const SAMPLE_DIFF: &str = r#"+++ b/test.py
@@ -1,3 +1,5 @@
 def hello():
+    # Добавил комментарий
     print("Hello")
+    return True"#;

const CONNECTION_HINTS: &[&str] = &[
    "the model server (e.g. LM Studio) is running",
    "its API server is started",
    "api_url points at it",
];

const TIMEOUT_HINTS: &[&str] = &[
    "a model is loaded on the server",
    "timeout_secs is long enough for the model",
];

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Reply,
}

#[derive(Deserialize)]
struct Reply {
    #[serde(default)]
    content: Option<String>,
}

/// build the user prompt for a commit message
pub fn build_prompt(
    files_summary: &str,
    status: &str,
    stats: &str,
    diff: &str,
    max_diff_chars: usize,
) -> String {
    let excerpt = truncate_chars(diff, max_diff_chars);
    let stats = match stats.trim() {
        "" => String::new(),
        stats => format!("\nСтатистика:\n{stats}\n"),
    };
    format!(
        r#"
Проанализируй изменения в коде и создай КОРОТКОЕ сообщение коммита.

Файлы:
{files_summary}

Изменения:
{status}
{stats}
Diff (отрывок):
{excerpt}

Важно:
- Отвечай ТОЛЬКО текстом коммита
- Максимум 50 символов
- Начинай с глагола (Добавил/Исправил/Обновил/Удалил)
- Никаких объяснений и комментариев

Пример: Добавил валидацию email
"#
    )
    .trim()
    .to_string()
}

/// first `max_chars` characters of `text`
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// ask the endpoint for a commit message, returning the raw reply text
pub fn generate(config: &Config, prompt: &str, show_response: bool) -> Result<String> {
    let request = ChatRequest {
        model: &config.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };
    complete(config, &request, show_response)
}

/// verify the endpoint answers and can write a sample commit message
pub fn check(config: &Config) -> Result<()> {
    status!("checking {} (model {})...", config.api_url, config.model);
    let request = ChatRequest {
        model: &config.model,
        messages: vec![ChatMessage {
            role: "user",
            content: CHECK_QUESTION,
        }],
        max_tokens: 10,
        temperature: 0.1,
    };
    let reply = complete(config, &request, false).inspect_err(print_hints)?;
    status!("connection ok");
    info!("> {}", reply);

    status!("generating a sample commit message...");
    let Some(message) = sample_message(config).inspect_err(print_hints)? else {
        bail!("model reply is not usable as a commit message");
    };
    status!("generation ok");
    info!("> {} ({} chars)", message, message.chars().count());
    Ok(())
}

/// sanitized message for a small fixed diff, `None` when the reply is unusable
fn sample_message(config: &Config) -> Result<Option<String>> {
    let summary = crate::status::bucket(SAMPLE_STATUS).summary();
    let prompt = build_prompt(&summary, SAMPLE_STATUS, "", SAMPLE_DIFF, config.max_diff_size);
    let raw = generate(config, &prompt, false)?;
    Ok(sanitize::sanitize(&raw))
}

/// what to look at when a request failed, empty when nothing specific applies
fn failure_hints(err: &anyhow::Error) -> &'static [&'static str] {
    match err.downcast_ref::<ureq::Error>() {
        Some(ureq::Error::Timeout(_)) => TIMEOUT_HINTS,
        Some(ureq::Error::Io(_) | ureq::Error::ConnectionFailed | ureq::Error::HostNotFound) => {
            CONNECTION_HINTS
        }
        _ => &[],
    }
}

fn print_hints(err: &anyhow::Error) {
    let hints = failure_hints(err);
    if hints.is_empty() {
        return;
    }
    warning!("make sure that:");
    for hint in hints {
        info!("  - {}", hint);
    }
}

fn complete(config: &Config, request: &ChatRequest<'_>, show_response: bool) -> Result<String> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
        .build()
        .into();

    let mut builder = agent
        .post(config.api_url.as_str())
        .header("Content-Type", "application/json");
    if let Some(key) = &config.api_key {
        builder = builder.header("Authorization", format!("Bearer {key}"));
    }

    let mut response = builder.send_json(request).map_err(|e| {
        let message = match &e {
            ureq::Error::StatusCode(429) => "endpoint is rate limiting requests (429)".to_string(),
            ureq::Error::StatusCode(code) => format!("endpoint returned HTTP {code}"),
            ureq::Error::Timeout(_) => {
                format!("endpoint did not answer within {}s", config.timeout_secs)
            }
            _ => format!("failed to reach {}", config.api_url),
        };
        anyhow::Error::new(e).context(message)
    })?;

    let raw: serde_json::Value = response
        .body_mut()
        .read_json()
        .context("endpoint returned invalid JSON")?;

    if show_response {
        use colored::Colorize;
        use std::io::Write;
        let pretty = serde_json::to_string_pretty(&raw).unwrap_or_else(|_| raw.to_string());
        let _ = writeln!(std::io::stdout(), "\n{}", pretty.dimmed());
    }

    let reply: ChatResponse =
        serde_json::from_value(raw).context("unexpected chat completion response")?;
    let Some(content) = reply
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
    else {
        bail!("endpoint returned no choices");
    };

    Ok(content.trim().to_string())
}

#[cfg(test)]
mod tests;
