use git2::Delta;

/// represents a single file change with its status
#[derive(Debug)]
pub struct FileChange {
    pub status: Delta,
    pub path: String,
    pub old_path: Option<String>, // set for renames
    pub diff_ignored: bool,       // lock files, minified files, etc.
}

/// represents a set of changes (staged or unstaged)
#[derive(Debug)]
pub struct ChangeSet {
    pub files: Vec<FileChange>,
    pub diff: String,
    pub stats: String, // `git diff --stat` summary
    pub is_staged: bool,
}

impl ChangeSet {
    pub fn source(&self) -> &str {
        if self.is_staged {
            "staged changes"
        } else {
            "unstaged changes"
        }
    }

    /// render the changeset as `git status --porcelain` lines
    ///
    /// staged changes fill the index column, unstaged changes the worktree
    /// column, untracked files are always `??`
    pub fn porcelain(&self) -> String {
        self.files
            .iter()
            .filter_map(|file| {
                let code = status_char(file.status)?;
                let path = match &file.old_path {
                    Some(old_path) => format!("{old_path} -> {}", file.path),
                    None => file.path.clone(),
                };
                let line = match (code, self.is_staged) {
                    ('?', _) => format!("?? {path}"),
                    (code, true) => format!("{code}  {path}"),
                    (code, false) => format!(" {code} {path}"),
                };
                Some(line)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// single porcelain status character for a delta
pub fn status_char(status: Delta) -> Option<char> {
    match status {
        Delta::Added | Delta::Copied => Some('A'),
        Delta::Modified | Delta::Typechange => Some('M'),
        Delta::Deleted => Some('D'),
        Delta::Renamed => Some('R'),
        Delta::Untracked => Some('?'),
        _ => None,
    }
}
