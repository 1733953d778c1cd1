use std::collections::BTreeMap;

pub const NO_CHANGES: &str = "Нет изменений";

/// kind of change reported by a porcelain status line
///
/// variant order is the display order of the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeKind {
    Untracked,
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            ChangeKind::Untracked => "Новые",
            ChangeKind::Added => "Добавлены",
            ChangeKind::Modified => "Изменены",
            ChangeKind::Deleted => "Удалены",
            ChangeKind::Renamed => "Переименованы",
        }
    }

    /// map a two-character status code, `None` for codes we don't track
    fn from_code(code: &str) -> Option<Self> {
        if code.contains('?') {
            return Some(ChangeKind::Untracked);
        }
        match code.trim() {
            "A" => Some(ChangeKind::Added),
            "M" => Some(ChangeKind::Modified),
            "D" => Some(ChangeKind::Deleted),
            "R" => Some(ChangeKind::Renamed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub kind: ChangeKind,
    pub path: String,
}

/// parse one `XY path` porcelain line
pub fn parse_line(line: &str) -> Option<StatusEntry> {
    let code = line.get(..2)?;
    let path = line.get(3..)?.trim();
    if path.is_empty() {
        return None;
    }
    Some(StatusEntry {
        kind: ChangeKind::from_code(code)?,
        path: path.to_string(),
    })
}

/// changed paths grouped by change kind
#[derive(Debug, Clone, Default)]
pub struct FileTypeBuckets {
    buckets: BTreeMap<ChangeKind, Vec<String>>,
}

impl FileTypeBuckets {
    pub fn from_entries(entries: impl IntoIterator<Item = StatusEntry>) -> Self {
        let mut buckets: BTreeMap<ChangeKind, Vec<String>> = BTreeMap::new();
        for entry in entries {
            buckets.entry(entry.kind).or_default().push(entry.path);
        }
        Self { buckets }
    }

    pub fn get(&self, kind: ChangeKind) -> &[String] {
        self.buckets.get(&kind).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// untracked and added paths together, untracked first
    pub fn new_files(&self) -> Vec<&str> {
        self.get(ChangeKind::Untracked)
            .iter()
            .chain(self.get(ChangeKind::Added))
            .map(String::as_str)
            .collect()
    }

    /// one `<label>: <paths>` line per non-empty bucket
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return NO_CHANGES.to_string();
        }
        self.buckets
            .iter()
            .filter(|(_, paths)| !paths.is_empty())
            .map(|(kind, paths)| format!("{}: {}", kind.label(), paths.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// bucket porcelain status text, silently dropping lines we can't read
pub fn bucket(status: &str) -> FileTypeBuckets {
    FileTypeBuckets::from_entries(status.lines().filter_map(parse_line))
}
