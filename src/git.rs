use crate::changeset::{ChangeSet, FileChange};
use crate::constants::PUSH_TIMEOUT_SECS;
use anyhow::{Context, Result, bail};
use git2::{
    Delta, DiffFindOptions, DiffFormat, DiffOptions, DiffStatsFormat, Repository, RepositoryState,
};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// sanity check that we're in a git repository and in a good state
pub fn sanity_check() -> Result<()> {
    // check we're in a git repository (can be anywhere within the repo)
    let repo = Repository::discover(".").context("not in a git repository")?;

    // check we're not in the middle of a git operation
    if repo.state() != RepositoryState::Clean {
        bail!("repository is in the middle of an operation (merge, rebase, etc)");
    }

    // check we're not on a detached HEAD
    if repo.head_detached().unwrap_or(false) {
        bail!("repository is in detached HEAD state");
    }

    Ok(())
}

/// get changes from the repository
/// checks staged changes first, falls back to unstaged (including untracked files)
/// returns None if no changes found
pub fn get_changes(path: &Path) -> Result<Option<ChangeSet>> {
    let repo = Repository::discover(path).context("failed to open git repository")?;

    // try staged changes first
    let staged_diff = create_staged_diff(&repo)?;
    if staged_diff
        .stats()
        .context("failed to get diff stats")?
        .files_changed()
        > 0
    {
        let files = files_from_git_diff(&staged_diff);
        let diff = format_diff(&staged_diff, &files)?;
        let stats = format_stats(&staged_diff)?;
        return Ok(Some(ChangeSet {
            files,
            diff,
            stats,
            is_staged: true,
        }));
    }

    // no staged changes, try unstaged (includes untracked files)
    let unstaged_diff = create_unstaged_diff(&repo)?;
    let files = files_from_git_diff(&unstaged_diff);

    if files.is_empty() {
        return Ok(None);
    }

    let diff = format_diff(&unstaged_diff, &files)?;
    let stats = format_stats(&unstaged_diff)?;
    Ok(Some(ChangeSet {
        files,
        diff,
        stats,
        is_staged: false,
    }))
}

/// extract list of files from a `git2::Diff` using native types
fn files_from_git_diff(diff: &git2::Diff) -> Vec<FileChange> {
    let mut files = Vec::new();

    for delta in diff.deltas() {
        let status = delta.status();
        if !matches!(
            status,
            Delta::Added
                | Delta::Copied
                | Delta::Deleted
                | Delta::Modified
                | Delta::Renamed
                | Delta::Typechange
                | Delta::Untracked
        ) {
            continue; // skip ignored, unmodified, etc.
        }

        let (path, old_path) = match status {
            Delta::Renamed => (
                delta.new_file().path(),
                delta
                    .old_file()
                    .path()
                    .map(|p| p.to_string_lossy().to_string()),
            ),
            Delta::Deleted => (delta.old_file().path(), None),
            _ => (delta.new_file().path(), None),
        };

        if let Some(path) = path {
            let path_str = path.to_string_lossy().to_string();

            // check if diff should be ignored (lock files, minified files, binary files)
            let is_binary = delta.new_file().is_binary() || delta.old_file().is_binary();
            let diff_ignored = should_ignore_diff(&path_str) || is_binary;

            files.push(FileChange {
                status,
                path: path_str,
                old_path,
                diff_ignored,
            });
        }
    }

    files
}

fn find_renames(diff: &mut git2::Diff) -> Result<()> {
    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    find_opts.rename_threshold(50); // 50% similarity (git default)
    find_opts.copy_threshold(50);
    diff.find_similar(Some(&mut find_opts))
        .context("failed to detect renames")
}

/// create a diff object for staged changes
fn create_staged_diff(repo: &Repository) -> Result<git2::Diff<'_>> {
    // handle unborn branch (no commits yet) - compare against empty tree
    let tree = match repo.head() {
        Ok(head) => Some(head.peel_to_tree().context("failed to get tree")?),
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
        Err(e) => return Err(e).context("failed to get HEAD"),
    };

    let mut diff = repo
        .diff_tree_to_index(tree.as_ref(), None, None)
        .context("failed to create diff")?;
    find_renames(&mut diff)?;

    Ok(diff)
}

/// create a diff object for unstaged changes
fn create_unstaged_diff(repo: &Repository) -> Result<git2::Diff<'_>> {
    let mut opts = DiffOptions::new();
    opts.include_untracked(true);
    opts.recurse_untracked_dirs(true);
    opts.show_untracked_content(true);
    let mut diff = repo
        .diff_index_to_workdir(None, Some(&mut opts))
        .context("failed to create diff")?;
    find_renames(&mut diff)?;

    Ok(diff)
}

/// check if file diff should be ignored (lock files, minified files, etc.)
fn should_ignore_diff(path: &str) -> bool {
    let path_lower = path.to_lowercase();

    // lock files - check full filename patterns
    if path_lower.ends_with("-lock.json") || path_lower.ends_with("-lock.yaml") {
        return true;
    }

    // check file extension for .lock files
    if let Some(ext) = Path::new(path).extension()
        && ext.to_string_lossy().eq_ignore_ascii_case("lock")
    {
        return true;
    }

    // minified files
    [".min.js", ".min.css", "-min.js", "-min.css"]
        .iter()
        .any(|suffix| path_lower.ends_with(suffix))
}

/// format a diff object into unified diff string, skipping ignored files
fn format_diff(diff: &git2::Diff, files: &[FileChange]) -> Result<String> {
    let mut output = String::new();
    let mut skip_current_file = false;

    diff.print(DiffFormat::Patch, |delta, _hunk, line| {
        let origin = line.origin();

        // check for file header to determine if we should skip this file
        if origin == 'F'
            && let Some(path) = delta.new_file().path()
        {
            let path_str = path.to_string_lossy().to_string();

            skip_current_file = files
                .iter()
                .find(|f| f.path == path_str)
                .is_some_and(|f| f.diff_ignored);

            if skip_current_file {
                // keep the `diff --git` header so the file is still counted,
                // the marker line reads as a `---` header rather than a removed line
                use std::fmt::Write;
                let old_path = delta
                    .old_file()
                    .path()
                    .map_or_else(|| path_str.clone(), |p| p.to_string_lossy().to_string());
                let _ = writeln!(output, "diff --git a/{old_path} b/{path_str}");
                let _ = writeln!(output, "--- {path_str} (diff ignored)");
                return true;
            }
        }

        if skip_current_file {
            return true;
        }

        let content = std::str::from_utf8(line.content()).unwrap_or("");

        if matches!(origin, '+' | '-' | ' ') {
            output.push(origin);
        }
        output.push_str(content);
        true
    })
    .context("failed to format diff")?;

    Ok(output.trim_end_matches('\n').to_string())
}

/// `git diff --stat` style summary of a diff
fn format_stats(diff: &git2::Diff) -> Result<String> {
    let buf = diff
        .stats()
        .and_then(|stats| stats.to_buf(DiffStatsFormat::FULL, 80))
        .context("failed to get diff stats")?;
    Ok(buf.as_str().unwrap_or_default().trim_end().to_string())
}

/// stage all files in the changeset
pub fn stage(path: &Path, changeset: &ChangeSet) -> Result<()> {
    let repo = Repository::discover(path).context("failed to open git repository")?;
    let mut index = repo.index().context("failed to get git index")?;

    // collect all errors before writing index
    let mut errors = Vec::new();

    for file in &changeset.files {
        let path = &file.path;
        match file.status {
            Delta::Deleted => {
                if let Err(e) = index.remove_path(Path::new(path)) {
                    errors.push(format!("failed to stage deletion of {path}: {e}"));
                }
            }
            Delta::Renamed => {
                // renames: remove old path and add new path
                let Some(old_path) = file.old_path.as_ref() else {
                    errors.push(format!("rename of {path} has no old path"));
                    continue;
                };
                if let Err(e) = index.remove_path(Path::new(old_path)) {
                    errors.push(format!("failed to remove old path {old_path}: {e}"));
                } else if let Err(e) = index.add_path(Path::new(path)) {
                    errors.push(format!("failed to stage rename to {path}: {e}"));
                }
            }
            _ => {
                if let Err(e) = index.add_path(Path::new(path)) {
                    errors.push(format!("failed to stage {path}: {e}"));
                }
            }
        }
    }

    // if there were any errors, reload index to rollback and report errors
    if !errors.is_empty() {
        if let Err(e) = index.read(false) {
            crate::warning!("failed to reload index during rollback: {}", e);
        }
        for error in &errors {
            crate::error!("{}", error);
        }
        bail!("failed to stage files");
    }

    index.write().context("failed to write git index")
}

/// create a commit with the given message
///
/// uses the git binary rather than git2 to ensure commit signing (gpg/ssh)
/// and git hooks (pre-commit, commit-msg, etc.) work as expected
pub fn commit(path: &Path, message: &str) -> Result<()> {
    let status = Command::new("git")
        .arg("commit")
        .arg("--message")
        .arg(message)
        .current_dir(path)
        .status()
        .context("failed to run git commit")?;

    if !status.success() {
        bail!("git commit failed with exit code: {status}");
    }
    Ok(())
}

/// name of the branch HEAD points at
pub fn current_branch(path: &Path) -> Result<String> {
    let repo = Repository::discover(path).context("failed to open git repository")?;
    let head = repo.head().context("failed to get HEAD")?;
    match head.shorthand() {
        Some(name) if head.is_branch() => Ok(name.to_string()),
        _ => bail!("HEAD does not point at a branch"),
    }
}

/// push the current branch
///
/// tries `git push origin <branch>` first, then a plain `git push` relying
/// on the configured upstream
pub fn push(path: &Path, branch: &str) -> Result<()> {
    match run_push(path, &["push", "origin", branch]) {
        Ok(()) => Ok(()),
        Err(e) => {
            crate::warning!("{}, trying plain push...", e);
            run_push(path, &["push"])
        }
    }
}

fn run_push(path: &Path, args: &[&str]) -> Result<()> {
    let mut child = Command::new("git")
        .args(args)
        .current_dir(path)
        .stdin(Stdio::null())
        .spawn()
        .context("failed to run git push")?;

    // a push can hang waiting for credentials, so bound it
    let timeout = Duration::from_secs(PUSH_TIMEOUT_SECS);
    match child.wait_timeout(timeout).context("failed to wait for git push")? {
        Some(status) if status.success() => Ok(()),
        Some(status) => bail!("git {} failed with exit code: {}", args.join(" "), status),
        None => {
            if let Err(e) = child.kill() {
                crate::warning!("failed to kill git push: {}", e);
            }
            let _ = child.wait();
            bail!("git {} timed out after {}s", args.join(" "), PUSH_TIMEOUT_SECS)
        }
    }
}
