mod changeset;
mod cli;
mod config;
mod constants;
mod context;
mod diff;
mod git;
mod keywords;
mod llm;
mod message;
mod sanitize;
mod status;
mod ui;

use crate::changeset::{ChangeSet, FileChange, status_char};
use crate::cli::Cli;
use crate::config::{Config, PushPolicy};
use crate::constants::{
    DIFF_SIZE_MAXIMUM_BYTES, DIFF_SIZE_WARNING_BYTES, MAX_FILES_TO_SHOW, MAX_MESSAGE_CHARS,
};
use crate::context::AppContext;
use crate::message::Classification;
use anyhow::{Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use num_format::{Locale, ToFormattedString};
use std::io::IsTerminal;
use std::path::Path;

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = Config::resolve(&cli)?;

    if cli.check {
        return llm::check(&config);
    }

    // sanity checks
    let interactive = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
    if !interactive && !cli.yes {
        bail!("interactive terminal required (use --yes to commit without prompting)");
    }
    git::sanity_check()?;

    match git::get_changes(Path::new("."))? {
        Some(changeset) => process_changes(&cli, &config, &changeset),
        None => {
            status!("no changes to commit");
            Ok(())
        }
    }
}

fn process_changes(cli: &Cli, config: &Config, changeset: &ChangeSet) -> Result<()> {
    let file_count = changeset.files.len();
    let file_word = if file_count == 1 { "file" } else { "files" };

    status!(
        "describing {} touching {} {}...",
        changeset.source(),
        file_count,
        file_word
    );

    // check diff size and enforce limits
    let diff_size = changeset.diff.len();
    let diff_size_str = diff_size.to_formatted_string(&Locale::en);
    if diff_size > DIFF_SIZE_MAXIMUM_BYTES {
        bail!(
            "diff is too large ({diff_size_str} bytes, max {})",
            DIFF_SIZE_MAXIMUM_BYTES.to_formatted_string(&Locale::en)
        );
    } else if diff_size > DIFF_SIZE_WARNING_BYTES && !cli.yes {
        warning!("diff is large ({diff_size_str} bytes), only the start will be analysed");
        if ui::prompt(&["continue", "abort"])? == 'a' {
            std::process::exit(1);
        }
    }

    let status_text = changeset.porcelain();
    let classification = message::classify(
        &status_text,
        &changeset.diff,
        &config.keywords,
        config.max_scan_bytes,
    );
    if cli.verbose {
        show_classification(&classification);
    }

    let mut ctx = AppContext::new(cli, config, classification.message.clone());
    if config.llm_mode.should_ask(classification.decisive) {
        let reply = generate(&ctx, config, &classification, &status_text, changeset);
        ctx.accept_reply(reply);
    }

    loop {
        display_commit_info(&ctx, &changeset.files);

        if ctx.commit_message.chars().count() > MAX_MESSAGE_CHARS {
            warning!("commit message is longer than {} chars", MAX_MESSAGE_CHARS);
        }

        if ctx.assume_yes {
            break;
        }

        let options: &[&str] = if ctx.llm_enabled {
            &["YES", "no", "reroll", "edit"]
        } else {
            &["YES", "no", "edit"]
        };
        match ui::prompt(options)? {
            'y' => break,
            'n' => {
                status!("commit cancelled");
                std::process::exit(1);
            }
            'r' => {
                status!("asking the model again...");
                let reply = generate(&ctx, config, &classification, &status_text, changeset);
                ctx.accept_reply(reply);
            }
            'e' => {
                info!("");
                let edited = ui::edit_one_line(&ctx.commit_message)?;
                ctx.accept_manual(&edited);
            }
            _ => {}
        }
    }

    // commit
    if !changeset.is_staged {
        git::stage(Path::new("."), changeset)?;
    }
    git::commit(Path::new("."), &ctx.commit_message)?;
    status!("committed");

    push_if_wanted(config, ctx.assume_yes)
}

/// ask the model for a message, `None` when it fails or replies with nothing usable
fn generate(
    ctx: &AppContext,
    config: &Config,
    classification: &Classification,
    status_text: &str,
    changeset: &ChangeSet,
) -> Option<String> {
    let prompt = llm::build_prompt(
        &classification.buckets.summary(),
        status_text,
        &changeset.stats,
        &changeset.diff,
        config.max_diff_size,
    );
    if ctx.show_prompt {
        detail!("\n{}", prompt);
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(config.model.clone());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = llm::generate(config, &prompt, ctx.show_response);

    spinner.finish_and_clear();

    match result {
        Ok(raw) => {
            let message = sanitize::sanitize(&raw);
            if message.is_none() {
                warning!("model reply is unusable, using diff analysis: {:?}", raw);
            }
            message
        }
        Err(e) => {
            warning!("{:#}, using diff analysis", e);
            None
        }
    }
}

fn show_classification(classification: &Classification) {
    let analysis = &classification.analysis;
    detail!("{}", classification.buckets.summary());
    detail!(
        "+{} -{} lines in {} file(s)",
        analysis.lines_added,
        analysis.lines_removed,
        analysis.files_changed.len()
    );
    let lists = [
        ("functions added", &analysis.functions_added),
        ("functions removed", &analysis.functions_removed),
        ("classes added", &analysis.classes_added),
        ("imports added", &analysis.imports_added),
        ("imports removed", &analysis.imports_removed),
        ("constants added", &analysis.variables_added),
        ("comments added", &analysis.comments_added),
        ("bug fix lines", &analysis.bug_fixes),
        ("feature lines", &analysis.features),
        ("config lines", &analysis.config_changes),
        ("style lines", &analysis.style_changes),
        ("test lines", &analysis.test_changes),
    ];
    for (label, items) in lists {
        if !items.is_empty() {
            detail!("{}: {}", label, items.len());
        }
    }
}

/// display commit message and files
fn display_commit_info(ctx: &AppContext, files: &[FileChange]) {
    info!();
    info!("{}", ctx.commit_message);
    detail!("({})", ctx.source.label());
    info!();

    status!("files:");
    for file in files.iter().take(MAX_FILES_TO_SHOW) {
        let code = status_char(file.status).unwrap_or(' ');
        if let Some(old_path) = &file.old_path {
            // show renames as "old_path → new_path"
            info!("{} {} → {}", code, old_path, file.path);
        } else {
            info!("{} {}", code, file.path);
        }
    }

    // show count of remaining files if there are more than MAX_FILES_TO_SHOW
    if files.len() > MAX_FILES_TO_SHOW {
        info!("(+{} more)", files.len() - MAX_FILES_TO_SHOW);
    }

    info!();
}

fn push_if_wanted(config: &Config, assume_yes: bool) -> Result<()> {
    let wanted = match config.push {
        PushPolicy::Never => false,
        PushPolicy::Always => true,
        PushPolicy::Ask if assume_yes => false,
        PushPolicy::Ask => {
            status!("push to remote?");
            ui::prompt(&["YES", "no"])? == 'y'
        }
    };
    if !wanted {
        return Ok(());
    }

    let branch = git::current_branch(Path::new("."))?;
    status!("pushing '{}'...", branch);
    match git::push(Path::new("."), &branch) {
        Ok(()) => {
            status!("pushed");
            Ok(())
        }
        Err(e) => {
            // the commit itself succeeded, so only explain the push failure
            error!("{:#}", e);
            warning!("possible causes:");
            info!("  - no remote repository configured");
            info!("  - no access rights to the remote");
            info!("  - ssh keys or credentials not set up");
            info!("  - the branch has no upstream: git push --set-upstream origin {}", branch);
            Ok(())
        }
    }
}
