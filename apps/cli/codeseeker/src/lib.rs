// Library exports for testing
// The binary (main.rs) imports these as well

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod logger;
pub mod render;

#[cfg(test)]
mod tests;

use crate::cli::{Cli, Command, ConfigCommand};
use crate::context::AppContext;
use crate::error::CodeseekerError;

use seeker_core::ProviderEndpoints;

use tokio_util::sync::CancellationToken;

/// Run one parsed command and return what should be printed on stdout.
pub async fn run(cli: &Cli, cancel: &CancellationToken) -> Result<String, CodeseekerError> {
    let ctx = AppContext::open(&cli.global).await?;

    match &cli.command {
        Command::Ask {
            question,
            root,
            json,
        } => commands::ask::run(&ctx, question, root, *json, cancel).await,
        Command::Models => Ok(commands::models::run(&ctx)),
        Command::Config(ConfigCommand::Show) => Ok(commands::config::show(&ctx).await),
        Command::Config(ConfigCommand::Set(args)) => commands::config::set(&ctx, args).await,
        Command::Config(ConfigCommand::Endpoints {
            anthropic,
            deepseek,
        }) => commands::config::set_endpoints(
            &ctx,
            ProviderEndpoints {
                anthropic: anthropic.clone(),
                deepseek: deepseek.clone(),
            },
        ),
        Command::Test => commands::test::run(&ctx).await,
        Command::Tokens {
            root,
            extensions,
            json,
        } => commands::tokens::run(&ctx, root, extensions, *json).await,
    }
}
