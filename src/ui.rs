use anyhow::{Context, Result};

#[macro_export]
macro_rules! warning {
    // format string literal (with or without inline formatting)
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!($fmt $(, $($arg)*)?).yellow());
    }};
    // arbitrary expression (non-literal)
    ($expr:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!("{}", $expr).yellow());
    }};
}

#[macro_export]
macro_rules! error {
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!($fmt $(, $($arg)*)?).red());
    }};
    ($expr:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!("{}", $expr).red());
    }};
}

#[macro_export]
macro_rules! status {
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", format!($fmt $(, $($arg)*)?).green());
    }};
    ($expr:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", format!("{}", $expr).green());
    }};
}

/// dimmed diagnostic output, for --verbose and --debug-* flags
#[macro_export]
macro_rules! detail {
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", format!($fmt $(, $($arg)*)?).dimmed());
    }};
    ($expr:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", format!("{}", $expr).dimmed());
    }};
}

#[macro_export]
macro_rules! info {
    () => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout());
    }};
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), $fmt $(, $($arg)*)?);
    }};
    ($expr:expr) => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", $expr);
    }};
}

/// keeps the terminal in raw mode until dropped
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        crossterm::terminal::enable_raw_mode()
            .context("this command requires an interactive terminal")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// lower-cased first character of an option, its hotkey
fn hotkey(option: &str) -> Option<char> {
    option.chars().next()?.to_lowercase().next()
}

/// "[Y]ES/[n]o/[e]dit"
fn render_options(options: &[&str]) -> String {
    options
        .iter()
        .map(|option| {
            let mut chars = option.chars();
            match chars.next() {
                Some(first) => format!("[{first}]{}", chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// ask for one of `options` with a single key press
///
/// enter picks the first option, esc and ctrl-c abort the process
pub fn prompt(options: &[&str]) -> Result<char> {
    use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
    use std::io::{self, Write};

    debug_assert!(!options.is_empty(), "prompt requires at least one option");
    let hotkeys: Vec<char> = options.iter().filter_map(|o| hotkey(o)).collect();
    debug_assert_eq!(hotkeys.len(), options.len(), "options cannot be empty");

    print!("{} ? ", render_options(options));
    let _ = io::stdout().flush();

    let chosen = {
        let _raw = RawMode::enable()?;
        loop {
            let Ok(Event::Key(KeyEvent {
                code, modifiers, ..
            })) = event::read()
            else {
                continue;
            };
            match code {
                KeyCode::Esc => break None,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break None,
                KeyCode::Enter => break Some(0),
                KeyCode::Char(c) => {
                    let lower = c.to_lowercase().next().unwrap_or(c);
                    if let Some(idx) = hotkeys.iter().position(|&k| k == lower) {
                        break Some(idx);
                    }
                }
                _ => {}
            }
        }
    };

    match chosen {
        Some(idx) => {
            info!(options[idx]);
            Ok(hotkeys[idx])
        }
        None => {
            info!("^C");
            std::process::exit(1);
        }
    }
}

/// edit a single line, pre-filled with `line`
pub fn edit_one_line(line: &str) -> Result<String> {
    use rustyline::DefaultEditor;

    let mut editor = DefaultEditor::new().context("failed to initialise line editor")?;

    if let Ok(edited) = editor.readline_with_initial("? ", (line, "")) {
        Ok(edited.trim().to_string())
    } else {
        info!("^C");
        std::process::exit(1);
    }
}
