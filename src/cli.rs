use clap::Parser;
use std::path::PathBuf;

/// autocommit: describe git changes in a short russian commit message and commit them
#[derive(Parser, Debug)]
#[command(name = "autocommit", about, long_about = None, version)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// never contact the chat-completion endpoint
    #[arg(long, conflicts_with = "llm_override")]
    pub offline: bool,

    /// ask the endpoint even when the diff alone gives a message
    #[arg(long)]
    pub llm_override: bool,

    /// chat-completion endpoint url
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// model name sent to the endpoint
    #[arg(long)]
    pub model: Option<String>,

    /// push after committing without asking
    #[arg(long, conflicts_with = "no_push")]
    pub push: bool,

    /// never push after committing
    #[arg(long)]
    pub no_push: bool,

    /// commit without confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// test the connection to the endpoint and exit
    #[arg(long)]
    pub check: bool,

    /// config file (default: <config dir>/autocommit/config.json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// print the prompt sent to the endpoint
    #[arg(long)]
    pub debug_prompt: bool,

    /// print the full JSON response from the endpoint
    #[arg(long)]
    pub debug_response: bool,

    /// print what the classifier found in the diff
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
