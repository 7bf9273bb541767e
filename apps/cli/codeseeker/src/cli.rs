//! Command-line definition.
//!
//! Precedence for provider settings, highest first: flags, environment
//! (including `.env`), the settings file, built-in defaults.

use seeker_core::ProviderEndpoints;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Ask questions about a codebase and get answers pointing at the code.
#[derive(Parser, Debug)]
#[command(name = "codeseeker")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory holding settings.json (default: <config dir>/codeseeker)
    #[arg(long, global = true, env = "CODESEEKER_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Prompt templates TOML file overriding the bundled prompts
    #[arg(long, global = true, env = "CODESEEKER_PROMPTS")]
    pub prompts: Option<PathBuf>,

    /// Retries for rate-limited or failing provider calls (0 disables)
    #[arg(long, global = true, default_value_t = 0)]
    pub retries: u32,

    /// Per model call timeout, e.g. "60s" or "2m"
    #[arg(long, global = true, default_value = "60s", value_parser = humantime::parse_duration)]
    pub timeout: std::time::Duration,

    /// Anthropic API base URL
    #[arg(long, global = true, env = "CODESEEKER_ANTHROPIC_URL")]
    pub anthropic_url: Option<String>,

    /// Deepseek API base URL
    #[arg(long, global = true, env = "CODESEEKER_DEEPSEEK_URL")]
    pub deepseek_url: Option<String>,

    /// Enable debug logging on the terminal
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Endpoint overrides given on the command line.
    pub fn endpoints(&self) -> ProviderEndpoints {
        ProviderEndpoints {
            anthropic: self.anthropic_url.clone(),
            deepseek: self.deepseek_url.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask a question about the code under a directory
    #[command(after_help = r#"EXAMPLES:
    # Ask about the current directory
    codeseeker ask "Where is the retry policy configured?"

    # Ask about another checkout and print the answer tree as JSON
    codeseeker ask "How are sessions persisted?" --root ../server --json
"#)]
    Ask {
        /// The question to answer
        question: String,

        /// Workspace root to search
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Output the answer tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the supported models
    Models,

    /// Show or change the stored model configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Check that the configured models answer
    Test,

    /// Count tokens in a project and estimate the input cost
    Tokens {
        /// Project root to count
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Extra file extension to count (repeatable), e.g. --ext .vue
        #[arg(long = "ext", value_name = "EXT")]
        extensions: Vec<String>,

        /// Output the counts as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the active configuration (keys are never shown)
    Show,

    /// Validate and store a model configuration
    #[command(after_help = r#"EXAMPLES:
    # One model for every stage, key from ANTHROPIC_API_KEY
    codeseeker config set --primary claude-3-sonnet-20240229 --same-model

    # Cheap discovery model, key from DEEPSEEK_API_KEY
    codeseeker config set --primary claude-3-opus-20240229 --secondary deepseek-coder-6.7b-instruct
"#)]
    Set(SetConfigArgs),

    /// Store provider base URL overrides
    Endpoints {
        /// Anthropic API base URL
        #[arg(long)]
        anthropic: Option<String>,

        /// Deepseek API base URL
        #[arg(long)]
        deepseek: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SetConfigArgs {
    /// Model answering questions and analyzing files
    #[arg(long)]
    pub primary: String,

    /// Model used for file discovery
    #[arg(long, required_unless_present = "same_model")]
    pub secondary: Option<String>,

    /// Primary API key (default: the provider's environment variable)
    #[arg(long)]
    pub primary_key: Option<String>,

    /// Secondary API key (default: the provider's environment variable)
    #[arg(long)]
    pub secondary_key: Option<String>,

    /// Reuse the primary model for discovery
    #[arg(long)]
    pub same_model: bool,
}
