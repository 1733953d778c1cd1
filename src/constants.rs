// commit message
pub const MAX_MESSAGE_CHARS: usize = 50;
pub const TRUNCATED_MESSAGE_CHARS: usize = 47;
pub const MIN_MESSAGE_CHARS: usize = 3;
pub const MAX_NAMED_IDENTIFIER_CHARS: usize = 20;
pub const MANUAL_FALLBACK_MESSAGE: &str = "Автоматический коммит";

// ui
pub const MAX_FILES_TO_SHOW: usize = 10;

// diff
pub const DIFF_SIZE_WARNING_BYTES: usize = 50 * 1024;
pub const DIFF_SIZE_MAXIMUM_BYTES: usize = 100 * 1024;

// git
pub const PUSH_TIMEOUT_SECS: u64 = 60;

// config
pub const CONFIG_DIR_NAME: &str = "autocommit";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const API_KEY_ENV: &str = "AUTOCOMMIT_API_KEY";
