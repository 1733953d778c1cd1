use crate::constants::MAX_NAMED_IDENTIFIER_CHARS;
use crate::diff::{self, DiffAnalysis};
use crate::keywords::{Category, Keywords, contains_any, matching_prefix};
use crate::sanitize;
use crate::status::{self, ChangeKind, FileTypeBuckets};
use std::path::Path;

pub const CATCH_ALL_MESSAGE: &str = "Обновил код";

/// everything the classifier derived from one status + diff pair
#[derive(Debug)]
pub struct Classification {
    pub buckets: FileTypeBuckets,
    pub analysis: DiffAnalysis,
    pub message: String,
    /// true when the message came from diff content rather than file names
    pub decisive: bool,
}

/// classify porcelain `status` and unified `diff` into a commit message
pub fn classify(status: &str, diff: &str, keywords: &Keywords, max_scan_bytes: usize) -> Classification {
    let buckets = status::bucket(status);
    let analysis = diff::scan(diff, keywords, max_scan_bytes);

    let (message, decisive) = match synthesize(&analysis) {
        Some(message) => (message, true),
        None => (
            fallback(&buckets, diff::bounded(diff, max_scan_bytes), keywords),
            false,
        ),
    };

    Classification {
        buckets,
        analysis,
        message: sanitize::fit(&message),
        decisive,
    }
}

type ContentRule = fn(&DiffAnalysis) -> Option<String>;

/// content rules, first one returning a message wins
const CONTENT_RULES: [ContentRule; 10] = [
    bug_fixes,
    functions_added,
    classes_added,
    functions_removed,
    imports,
    |a| category(a, Category::Test, "Обновил тесты"),
    |a| category(a, Category::Config, "Обновил конфигурацию"),
    |a| category(a, Category::Style, "Обновил стили"),
    |a| category(a, Category::Feature, "Добавил новый функционал"),
    line_balance,
];

/// pick a message from diff content alone, `None` when nothing is decisive
pub fn synthesize(analysis: &DiffAnalysis) -> Option<String> {
    CONTENT_RULES.iter().find_map(|rule| rule(analysis))
}

fn bug_fixes(analysis: &DiffAnalysis) -> Option<String> {
    match analysis.bug_fixes.len() {
        0 => None,
        1 => Some("Исправил ошибку".to_string()),
        n => Some(format!(
            "Исправил {n} {}",
            plural(n, "ошибку", "ошибки", "ошибок")
        )),
    }
}

fn functions_added(analysis: &DiffAnalysis) -> Option<String> {
    named_or_counted(
        &analysis.functions_added,
        "Добавил функцию",
        ("функцию", "функции", "функций"),
    )
}

fn classes_added(analysis: &DiffAnalysis) -> Option<String> {
    named_or_counted(
        &analysis.classes_added,
        "Добавил класс",
        ("класс", "класса", "классов"),
    )
}

/// `<single> <name>` for one short name, `<single>` for one long name,
/// `<verb> <n> <noun>` for many
fn named_or_counted(
    names: &[String],
    single: &str,
    (one, few, many): (&str, &str, &str),
) -> Option<String> {
    match names {
        [] => None,
        [name] if name.chars().count() < MAX_NAMED_IDENTIFIER_CHARS => {
            Some(format!("{single} {name}"))
        }
        [_] => Some(single.to_string()),
        _ => {
            let verb = single.split_whitespace().next().unwrap_or(single);
            let n = names.len();
            Some(format!("{verb} {n} {}", plural(n, one, few, many)))
        }
    }
}

fn functions_removed(analysis: &DiffAnalysis) -> Option<String> {
    match analysis.functions_removed.as_slice() {
        [] => None,
        [name] => Some(format!("Удалил функцию {name}")),
        names => {
            let n = names.len();
            Some(format!(
                "Удалил {n} {}",
                plural(n, "функцию", "функции", "функций")
            ))
        }
    }
}

fn imports(analysis: &DiffAnalysis) -> Option<String> {
    let added = !analysis.imports_added.is_empty();
    let removed = !analysis.imports_removed.is_empty();
    match (added, removed) {
        (true, true) => Some("Обновил импорты".to_string()),
        (true, false) => Some("Добавил импорты".to_string()),
        (false, true) => Some("Удалил импорты".to_string()),
        (false, false) => None,
    }
}

fn category(analysis: &DiffAnalysis, category: Category, message: &str) -> Option<String> {
    (!analysis.category(category).is_empty()).then(|| message.to_string())
}

fn line_balance(analysis: &DiffAnalysis) -> Option<String> {
    let (added, removed) = (analysis.lines_added, analysis.lines_removed);
    if added > 3 * removed {
        Some(format!(
            "Добавил {added} {} кода",
            plural(added, "строку", "строки", "строк")
        ))
    } else if removed > 2 * added {
        Some(format!(
            "Удалил {removed} {} кода",
            plural(removed, "строку", "строки", "строк")
        ))
    } else {
        None
    }
}

/// russian noun form agreeing with `n`
pub fn plural<'a>(n: usize, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    match (n % 10, n % 100) {
        (1, rem) if rem != 11 => one,
        (2..=4, rem) if !(12..=14).contains(&rem) => few,
        _ => many,
    }
}

fn file_count(n: usize) -> String {
    format!("{n} {}", plural(n, "файл", "файла", "файлов"))
}

/// what a file looks like from its name, variants in sniffing priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileKind {
    Test,
    Python,
    Source,
    Markup,
    Stylesheet,
    Docs,
    Config,
    Other,
}

const SOURCE_EXTENSIONS: &[&str] = &[
    "rs", "js", "ts", "jsx", "tsx", "go", "java", "kt", "c", "h", "cpp", "hpp", "cs", "rb", "php",
    "swift", "sh",
];
const MARKUP_EXTENSIONS: &[&str] = &["html", "htm", "xml", "vue", "svelte", "jinja", "j2"];
const STYLESHEET_EXTENSIONS: &[&str] = &["css", "scss", "sass", "less"];
const DOCS_EXTENSIONS: &[&str] = &["md", "rst", "txt", "adoc"];
const CONFIG_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml", "ini", "cfg", "conf", "env"];

impl FileKind {
    pub fn of(path: &str) -> Self {
        let name = file_name(path).to_lowercase();
        if name.contains("test") {
            return FileKind::Test;
        }
        let ext = Path::new(&name)
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        let ext = ext.as_str();
        if ext == "py" {
            FileKind::Python
        } else if SOURCE_EXTENSIONS.contains(&ext) {
            FileKind::Source
        } else if MARKUP_EXTENSIONS.contains(&ext) {
            FileKind::Markup
        } else if STYLESHEET_EXTENSIONS.contains(&ext) {
            FileKind::Stylesheet
        } else if DOCS_EXTENSIONS.contains(&ext) {
            FileKind::Docs
        } else if CONFIG_EXTENSIONS.contains(&ext) || name.starts_with('.') {
            FileKind::Config
        } else {
            FileKind::Other
        }
    }

    /// highest-priority kind among `paths`
    fn dominant<'a>(paths: impl IntoIterator<Item = &'a str>) -> Self {
        paths
            .into_iter()
            .map(FileKind::of)
            .min()
            .unwrap_or(FileKind::Other)
    }

    /// (single file, many files) templates for new files
    fn added_templates(self) -> (&'static str, &'static str) {
        match self {
            FileKind::Test => ("Добавил тест {file}", "Добавил тесты ({count})"),
            FileKind::Python => ("Добавил скрипт {file}", "Добавил Python-скрипты ({count})"),
            FileKind::Source => ("Добавил модуль {file}", "Добавил исходный код ({count})"),
            FileKind::Markup => ("Добавил шаблон {file}", "Добавил шаблоны разметки ({count})"),
            FileKind::Stylesheet => ("Добавил стили {file}", "Добавил стили ({count})"),
            FileKind::Docs => ("Добавил документацию {file}", "Добавил документацию ({count})"),
            FileKind::Config => (
                "Добавил конфигурацию {file}",
                "Добавил файлы конфигурации ({count})",
            ),
            FileKind::Other => ("Добавил файл {file}", "Добавил {count}"),
        }
    }

    /// (single file, many files) templates for modified files
    fn modified_templates(self) -> (&'static str, &'static str) {
        match self {
            FileKind::Test => ("Обновил тест {file}", "Обновил тесты ({count})"),
            FileKind::Python => ("Обновил скрипт {file}", "Обновил Python-скрипты ({count})"),
            FileKind::Source => ("Обновил модуль {file}", "Обновил исходный код ({count})"),
            FileKind::Markup => ("Обновил шаблон {file}", "Обновил шаблоны разметки ({count})"),
            FileKind::Stylesheet => ("Обновил стили {file}", "Обновил стили ({count})"),
            FileKind::Docs => ("Обновил документацию {file}", "Обновил документацию ({count})"),
            FileKind::Config => (
                "Обновил конфигурацию {file}",
                "Обновил файлы конфигурации ({count})",
            ),
            FileKind::Other => ("Обновил {file}", "Обновил {count}"),
        }
    }
}

/// keyword hints looked for in a modified file's diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hint {
    Function,
    Class,
    Import,
    Config,
    Test,
    Bug,
    Style,
    Doc,
}

impl Hint {
    const PRIORITY: [Hint; 8] = [
        Hint::Function,
        Hint::Class,
        Hint::Import,
        Hint::Config,
        Hint::Test,
        Hint::Bug,
        Hint::Style,
        Hint::Doc,
    ];

    fn found_in(self, lines: &[String], keywords: &Keywords) -> bool {
        let (list, at_line_start) = match self {
            Hint::Function => (&keywords.function_defs, true),
            Hint::Class => (&keywords.class_defs, true),
            Hint::Import => (&keywords.imports, true),
            Hint::Config => (&keywords.config, false),
            Hint::Test => (&keywords.test, false),
            Hint::Bug => (&keywords.bug_fix, false),
            Hint::Style => (&keywords.style, false),
            Hint::Doc => (&keywords.docs, false),
        };
        lines.iter().any(|line| {
            if at_line_start {
                matching_prefix(line, list).is_some()
            } else {
                contains_any(&line.to_lowercase(), list)
            }
        })
    }

    fn message(self) -> &'static str {
        match self {
            Hint::Function => "Обновил функции",
            Hint::Class => "Обновил классы",
            Hint::Import => "Обновил импорты",
            Hint::Config => "Обновил конфигурацию",
            Hint::Test => "Обновил тесты",
            Hint::Bug => "Исправил ошибки",
            Hint::Style => "Обновил стили",
            Hint::Doc => "Обновил документацию",
        }
    }
}

/// message from file names alone, used when the diff content says nothing
pub fn fallback(buckets: &FileTypeBuckets, diff: &str, keywords: &Keywords) -> String {
    let new_files = buckets.new_files();
    if !new_files.is_empty() {
        let kind = FileKind::dominant(new_files.iter().copied());
        return render(kind.added_templates(), &new_files);
    }

    let modified: Vec<&str> = buckets
        .get(ChangeKind::Modified)
        .iter()
        .map(String::as_str)
        .collect();
    if !modified.is_empty() {
        return modified_message(&modified, diff, keywords);
    }

    let deleted: Vec<&str> = buckets
        .get(ChangeKind::Deleted)
        .iter()
        .map(String::as_str)
        .collect();
    if !deleted.is_empty() {
        return render(("Удалил {file}", "Удалил {count}"), &deleted);
    }

    let renamed: Vec<&str> = buckets
        .get(ChangeKind::Renamed)
        .iter()
        .map(String::as_str)
        .collect();
    if !renamed.is_empty() {
        return render(("Переименовал {file}", "Переименовал {count}"), &renamed);
    }

    CATCH_ALL_MESSAGE.to_string()
}

fn modified_message(paths: &[&str], diff: &str, keywords: &Keywords) -> String {
    // content of added, removed and context lines, without the diff prefix
    let lines: Vec<String> = diff
        .lines()
        .filter(|line| !line.starts_with("+++") && !line.starts_with("---"))
        .filter(|line| !line.starts_with("diff --git") && !line.starts_with("@@"))
        .filter_map(|line| {
            line.strip_prefix(['+', '-', ' '])
                .map(|content| content.trim().to_string())
        })
        .collect();

    match Hint::PRIORITY
        .into_iter()
        .find(|hint| hint.found_in(&lines, keywords))
    {
        Some(hint) => match paths {
            [path] => format!("{} в {}", hint.message(), file_name(path)),
            _ => {
                let n = paths.len();
                format!(
                    "{} в {n} {}",
                    hint.message(),
                    plural(n, "файле", "файлах", "файлах")
                )
            }
        },
        None => render(
            FileKind::dominant(paths.iter().copied()).modified_templates(),
            paths,
        ),
    }
}

fn render((single, many): (&str, &str), paths: &[&str]) -> String {
    match paths {
        [path] => single.replace("{file}", file_name(path)),
        _ => many.replace("{count}", &file_count(paths.len())),
    }
}

/// final component of a status path, the new name for `old -> new` renames
fn file_name(path: &str) -> &str {
    let path = path.rsplit_once(" -> ").map_or(path, |(_, new)| new);
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests;
