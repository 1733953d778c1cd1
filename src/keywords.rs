use serde::Deserialize;

/// keyword-matched line categories, in the order they are tested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    BugFix,
    Feature,
    Config,
    Style,
    Test,
}

impl Category {
    pub const PRIORITY: [Category; 5] = [
        Category::BugFix,
        Category::Feature,
        Category::Config,
        Category::Style,
        Category::Test,
    ];
}

/// keyword tables driving the diff scanner and the file-type fallback
///
/// every list can be replaced from the `keywords` section of the config file;
/// lists left out keep their defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Keywords {
    /// prefixes that open a function definition, matched against trimmed lines
    pub function_defs: Vec<String>,
    /// prefixes that open a class-like definition
    pub class_defs: Vec<String>,
    pub imports: Vec<String>,
    pub comment_markers: Vec<String>,

    // substrings matched against lower-cased line content
    pub bug_fix: Vec<String>,
    pub feature: Vec<String>,
    pub config: Vec<String>,
    pub style: Vec<String>,
    pub test: Vec<String>,
    pub docs: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            // longer prefixes first so `pub fn` wins over `fn`
            function_defs: words(&[
                "pub async fn ",
                "pub(crate) fn ",
                "pub fn ",
                "async fn ",
                "fn ",
                "async def ",
                "def ",
                "async function ",
                "function ",
                "func ",
            ]),
            class_defs: words(&[
                "pub struct ",
                "pub enum ",
                "pub trait ",
                "struct ",
                "enum ",
                "trait ",
                "export class ",
                "class ",
                "interface ",
            ]),
            imports: words(&["import ", "from ", "use ", "pub use ", "#include", "require("]),
            comment_markers: words(&["#", "//", "/*", "* ", "<!--", "--"]),
            bug_fix: words(&[
                "fix", "bug", "error", "issue", "crash", "исправ", "ошибк", "баг",
            ]),
            feature: words(&[
                "feature", "implement", "new ", "добав", "нов", "функционал",
            ]),
            config: words(&["config", "setting", "env", "настро", "конфиг"]),
            style: words(&[
                "style", "css", "color", "font", "margin", "padding", "format", "стил",
            ]),
            test: words(&["test", "assert", "mock", "тест"]),
            docs: words(&["readme", "docs", "\"\"\"", "///", "документ"]),
        }
    }
}

impl Keywords {
    /// word list for a line category
    pub fn category(&self, category: Category) -> &[String] {
        match category {
            Category::BugFix => &self.bug_fix,
            Category::Feature => &self.feature,
            Category::Config => &self.config,
            Category::Style => &self.style,
            Category::Test => &self.test,
        }
    }

    /// first category (in priority order) whose words appear in the line
    pub fn categorize(&self, line: &str) -> Option<Category> {
        let lower = line.to_lowercase();
        Category::PRIORITY
            .into_iter()
            .find(|&category| contains_any(&lower, self.category(category)))
    }
}

pub fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

/// the first keyword that prefixes `line`, if any
pub fn matching_prefix<'a>(line: &str, prefixes: &'a [String]) -> Option<&'a str> {
    prefixes
        .iter()
        .map(String::as_str)
        .find(|prefix| line.starts_with(prefix))
}
