use crate::cli::Cli;
use crate::config::Config;

/// where the current commit message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    Heuristic,
    Model,
    Manual,
}

impl MessageSource {
    pub fn label(self) -> &'static str {
        match self {
            MessageSource::Heuristic => "from diff analysis",
            MessageSource::Model => "from model",
            MessageSource::Manual => "edited",
        }
    }
}

/// state carried through the commit workflow
#[allow(clippy::struct_excessive_bools)]
pub struct AppContext {
    /// the message that will be committed
    pub commit_message: String,
    pub source: MessageSource,

    /// the classifier's message, kept to fall back to after a bad reply
    pub heuristic_message: String,

    /// whether the endpoint may be asked (rerolls included)
    pub llm_enabled: bool,

    /// commit without prompting
    pub assume_yes: bool,

    // debugging
    pub show_prompt: bool,
    pub show_response: bool,
}

impl AppContext {
    pub fn new(cli: &Cli, config: &Config, heuristic_message: String) -> Self {
        Self {
            commit_message: heuristic_message.clone(),
            source: MessageSource::Heuristic,
            heuristic_message,
            llm_enabled: config.llm_mode != crate::config::LlmMode::Off,
            assume_yes: cli.yes,
            show_prompt: cli.debug_prompt,
            show_response: cli.debug_response,
        }
    }

    /// take a sanitized model reply
    ///
    /// without one, a manual edit is kept and anything else goes back to the
    /// heuristic message
    pub fn accept_reply(&mut self, reply: Option<String>) {
        match reply {
            Some(message) => {
                self.commit_message = message;
                self.source = MessageSource::Model;
            }
            None if self.source == MessageSource::Manual => {}
            None => {
                self.commit_message.clone_from(&self.heuristic_message);
                self.source = MessageSource::Heuristic;
            }
        }
    }

    /// take a manually edited message, empty input becomes the stock message
    pub fn accept_manual(&mut self, edited: &str) {
        let edited = edited.trim();
        self.commit_message = if edited.is_empty() {
            crate::constants::MANUAL_FALLBACK_MESSAGE.to_string()
        } else {
            edited.to_string()
        };
        self.source = MessageSource::Manual;
    }
}
