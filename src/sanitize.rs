use crate::constants::{MAX_MESSAGE_CHARS, MIN_MESSAGE_CHARS, TRUNCATED_MESSAGE_CHARS};

/// first words every generated message is expected to start with
pub const COMMIT_VERBS: &[&str] = &["Добавил", "Исправил", "Обновил", "Удалил", "Переименовал"];

const QUOTES: &[char] = &['"', '\'', '`', '«', '»', '“', '”', '„'];

/// opening and closing reasoning tags, a closed block is dropped with its content
const THINKING_BLOCKS: &[(&str, &str)] = &[
    ("<think>", "</think>"),
    ("<thinking>", "</thinking>"),
    ("<reasoning>", "</reasoning>"),
];

/// lower-case openings of lines where the model talks about the task
const META_PREFIXES: &[&str] = &[
    "okay",
    "ok,",
    "hmm",
    "well,",
    "alright",
    "let me",
    "let's",
    "i think",
    "i need",
    "i'll",
    "i will",
    "the user",
    "first,",
    "so,",
    "хорошо",
    "итак",
    "давайте",
    "сначала",
    "я думаю",
    "мне нужно",
    "пользователь",
];

/// phrases stripped from the start of the chosen line, first match only
const FILLER_PREFIXES: &[&str] = &[
    "сообщение коммита:",
    "гит коммит:",
    "коммит:",
    "ответ:",
    "git commit:",
    "commit message:",
    "commit:",
    "git:",
    "here is the commit message:",
    "here is:",
    "here's:",
    "вот сообщение коммита:",
    "вот сообщение",
    "я создал",
    "я создам",
    "можно создать",
    "можно использовать",
    "предлагаю",
    "i think",
    "let me",
    "the user wants",
    "я думаю",
];

const ELLIPSIS: char = '…';

/// turn a raw reply into a commit message, `None` if nothing usable is left
///
/// a usable message is 3 to 50 characters, has no leading quote or colon and no
/// trailing quote or period, and sanitizing it again leaves it unchanged
pub fn sanitize(raw: &str) -> Option<String> {
    let text = strip_quotes(raw);
    let text = strip_thinking(text);
    let line = strip_leading_noise(pick_line(&text));
    let message = fit(line);
    let message = message
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace() || QUOTES.contains(&c))
        .to_string();

    (message.chars().count() >= MIN_MESSAGE_CHARS).then_some(message)
}

/// enforce the length limit and drop trailing periods
pub fn fit(message: &str) -> String {
    let message = message.trim();
    let message = if message.chars().count() > MAX_MESSAGE_CHARS {
        let head: String = message.chars().take(TRUNCATED_MESSAGE_CHARS).collect();
        format!("{}{ELLIPSIS}", head.trim_end())
    } else {
        message.to_string()
    };
    message
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace())
        .to_string()
}

pub fn starts_with_verb(line: &str) -> bool {
    COMMIT_VERBS.iter().any(|verb| line.starts_with(verb))
}

/// remove one layer of surrounding quotes
fn strip_quotes(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix(QUOTES).unwrap_or(text);
    let text = text.strip_suffix(QUOTES).unwrap_or(text);
    text.trim()
}

/// drop reasoning blocks and stray tags, and meta-commentary lines when the reply has several lines
fn strip_thinking(text: &str) -> String {
    let mut text = text.to_string();
    for (open, close) in THINKING_BLOCKS {
        while let Some(start) = text.find(open)
            && let Some(len) = text[start..].find(close)
        {
            text.replace_range(start..start + len + close.len(), "\n");
        }
        // an unclosed tag only loses the marker
        text = text.replace(open, "\n").replace(close, "\n");
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() < 2 {
        return lines.concat();
    }
    lines
        .into_iter()
        .filter(|line| !is_meta(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_meta(line: &str) -> bool {
    let lower = line.to_lowercase();
    META_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

/// the line most likely to be the commit message
fn pick_line(text: &str) -> &str {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let Some(first) = lines.clone().next() else {
        return "";
    };
    lines
        .clone()
        .find(|line| starts_with_verb(line))
        .or_else(|| lines.find(|line| line.chars().count() > 5))
        .unwrap_or(first)
}

fn strip_filler(line: &str) -> &str {
    FILLER_PREFIXES
        .iter()
        .find_map(|prefix| strip_prefix_ignore_case(line, prefix))
        .unwrap_or(line)
        .trim()
}

/// strip filler phrases and leading punctuation until neither is left
fn strip_leading_noise(mut line: &str) -> &str {
    loop {
        let stripped = strip_filler(line).trim_start_matches(|c: char| {
            c == ':' || c == '.' || c == ELLIPSIS || c.is_whitespace() || QUOTES.contains(&c)
        });
        if stripped.len() == line.len() {
            return line;
        }
        line = stripped;
    }
}

/// `text` without `prefix`, comparing characters case-insensitively
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = text.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = rest.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(rest.as_str())
}
