use crate::keywords::{Category, Keywords, matching_prefix};

/// what a single forward scan over a unified diff found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffAnalysis {
    pub files_changed: Vec<String>,
    pub lines_added: usize,
    pub lines_removed: usize,

    pub functions_added: Vec<String>,
    pub functions_removed: Vec<String>,
    pub classes_added: Vec<String>,
    pub imports_added: Vec<String>,
    pub imports_removed: Vec<String>,
    pub variables_added: Vec<String>,
    pub comments_added: Vec<String>,

    // keyword-matched added lines, each line lands in at most one list
    pub bug_fixes: Vec<String>,
    pub features: Vec<String>,
    pub config_changes: Vec<String>,
    pub style_changes: Vec<String>,
    pub test_changes: Vec<String>,
}

impl DiffAnalysis {
    pub fn category(&self, category: Category) -> &[String] {
        match category {
            Category::BugFix => &self.bug_fixes,
            Category::Feature => &self.features,
            Category::Config => &self.config_changes,
            Category::Style => &self.style_changes,
            Category::Test => &self.test_changes,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::BugFix => &mut self.bug_fixes,
            Category::Feature => &mut self.features,
            Category::Config => &mut self.config_changes,
            Category::Style => &mut self.style_changes,
            Category::Test => &mut self.test_changes,
        }
    }
}

/// structural classification of an added line
#[derive(Debug, PartialEq, Eq)]
enum Structure {
    Function(String),
    Class(String),
    Import(String),
    Constant(String),
    Comment(String),
}

type StructureRule = fn(&str, &Keywords) -> Option<Structure>;

/// tried top to bottom, the first rule that fires classifies the line
const ADDED_LINE_RULES: [StructureRule; 5] = [
    |line, kw| function_name(line, kw).map(Structure::Function),
    |line, kw| class_name(line, kw).map(Structure::Class),
    |line, kw| is_import(line, kw).then(|| Structure::Import(line.to_string())),
    |line, kw| constant_name(line, kw).map(Structure::Constant),
    |line, kw| is_comment(line, kw).then(|| Structure::Comment(line.to_string())),
];

/// scan at most `max_bytes` of `diff` into a `DiffAnalysis`
pub fn scan(diff: &str, keywords: &Keywords, max_bytes: usize) -> DiffAnalysis {
    let mut analysis = DiffAnalysis::default();

    for line in bounded(diff, max_bytes).lines() {
        if let Some(path) = header_path(line) {
            if !analysis.files_changed.iter().any(|p| p == path) {
                analysis.files_changed.push(path.to_string());
            }
        } else if line.starts_with("+++") || line.starts_with("---") {
            // header without a `b/` path, e.g. /dev/null or an ignored file
        } else if let Some(content) = line.strip_prefix('+') {
            analysis.lines_added += 1;
            scan_added(&mut analysis, content.trim(), keywords);
        } else if let Some(content) = line.strip_prefix('-') {
            analysis.lines_removed += 1;
            scan_removed(&mut analysis, content.trim(), keywords);
        }
    }

    analysis
}

fn scan_added(analysis: &mut DiffAnalysis, content: &str, keywords: &Keywords) {
    match ADDED_LINE_RULES
        .iter()
        .find_map(|rule| rule(content, keywords))
    {
        Some(Structure::Function(name)) => analysis.functions_added.push(name),
        Some(Structure::Class(name)) => analysis.classes_added.push(name),
        Some(Structure::Import(line)) => analysis.imports_added.push(line),
        Some(Structure::Constant(name)) => analysis.variables_added.push(name),
        Some(Structure::Comment(line)) => analysis.comments_added.push(line),
        None => {}
    }

    if let Some(category) = keywords.categorize(content) {
        analysis.category_mut(category).push(content.to_string());
    }
}

fn scan_removed(analysis: &mut DiffAnalysis, content: &str, keywords: &Keywords) {
    if let Some(name) = function_name(content, keywords) {
        analysis.functions_removed.push(name);
    } else if is_import(content, keywords) {
        analysis.imports_removed.push(content.to_string());
    }
}

/// longest prefix of `text` that fits in `max_bytes` without splitting a char
pub fn bounded(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// path after `b/` in a `diff --git` or `+++` header
fn header_path(line: &str) -> Option<&str> {
    let path = if line.starts_with("diff --git ") {
        let (_, path) = line.rsplit_once(" b/")?;
        path
    } else {
        line.strip_prefix("+++ ")?.strip_prefix("b/")?
    };
    let path = path.trim();
    (!path.is_empty()).then_some(path)
}

fn function_name(line: &str, keywords: &Keywords) -> Option<String> {
    let keyword = matching_prefix(line, &keywords.function_defs)?;
    let rest = &line[keyword.len()..];
    let (name, _) = rest.split_once('(')?;
    // `fn parse<T>(` is reported as `parse`
    let name = name.split('<').next().unwrap_or_default().trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn class_name(line: &str, keywords: &Keywords) -> Option<String> {
    let keyword = matching_prefix(line, &keywords.class_defs)?;
    let rest = &line[keyword.len()..];
    let end = rest.find(['(', ':']).unwrap_or(rest.len());
    // `struct Foo {` and `class Foo extends Bar` keep just the identifier
    let name = rest[..end]
        .split_whitespace()
        .next()?
        .split(['{', '<', ';'])
        .next()
        .unwrap_or_default();
    (!name.is_empty()).then(|| name.to_string())
}

fn is_import(line: &str, keywords: &Keywords) -> bool {
    matching_prefix(line, &keywords.imports).is_some()
}

fn is_comment(line: &str, keywords: &Keywords) -> bool {
    matching_prefix(line, &keywords.comment_markers).is_some()
}

/// left-hand side of an assignment written in upper case, like `MAX_SIZE = 10`
///
/// this is a rough heuristic and also fires on `A == B`
fn constant_name(line: &str, keywords: &Keywords) -> Option<String> {
    if is_comment(line, keywords) {
        return None;
    }
    let (lhs, _) = line.split_once('=')?;
    let lhs = lhs.trim();
    is_upper(lhs).then(|| lhs.to_string())
}

/// at least one cased character and no lower-case ones
fn is_upper(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}
