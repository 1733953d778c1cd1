use crate::cli::Cli;
use crate::constants::{API_KEY_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::keywords::Keywords;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// when the chat-completion endpoint is consulted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmMode {
    /// never
    Off,
    /// only when the diff content gives no clear message
    #[default]
    Fallback,
    /// always, a usable reply replaces the heuristic message
    Override,
}

impl LlmMode {
    pub fn should_ask(self, decisive: bool) -> bool {
        match self {
            LlmMode::Off => false,
            LlmMode::Fallback => !decisive,
            LlmMode::Override => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushPolicy {
    #[default]
    Ask,
    Always,
    Never,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// characters of diff included in the prompt
    pub max_diff_size: usize,
    /// bytes of diff inspected by the classifier
    pub max_scan_bytes: usize,
    pub llm_mode: LlmMode,
    pub push: PushPolicy,
    pub keywords: Keywords,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:1234/v1/chat/completions".to_string(),
            model: "local-model".to_string(),
            api_key: None,
            max_tokens: 50,
            temperature: 0.3,
            timeout_secs: 30,
            max_diff_size: 2000,
            max_scan_bytes: 64 * 1024,
            llm_mode: LlmMode::default(),
            push: PushPolicy::default(),
            keywords: Keywords::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid config")
    }

    /// read `path`, or the default location when `path` is None
    ///
    /// an explicit path must exist, a missing default file means defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// load the config file, then layer the environment and command line on top
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = Self::load(cli.config.as_deref())?;
        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.trim().is_empty()
        {
            config.api_key = Some(key.trim().to_string());
        }
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.url {
            self.api_url.clone_from(url);
        }
        if let Some(model) = &cli.model {
            self.model.clone_from(model);
        }
        if cli.offline {
            self.llm_mode = LlmMode::Off;
        } else if cli.llm_override {
            self.llm_mode = LlmMode::Override;
        }
        if cli.push {
            self.push = PushPolicy::Always;
        } else if cli.no_push {
            self.push = PushPolicy::Never;
        }
    }
}
