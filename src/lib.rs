/// aibot - A Slack bot that relays prompts to an `OpenAI` completion model.
///
/// Three entry points, all delivered over Slack Socket Mode:
/// 1. The `/ai` slash command answers a prompt, privately or (with `say`) in the channel
/// 2. The "Post publicly" button promotes a private answer to the channel
/// 3. Direct messages get a conversational reply built from recent DM history
///
/// # Architecture
///
/// The system uses:
/// - slack-morphism for the Socket Mode listener and Slack Web API calls
/// - openai-api-rs request types sent with reqwest to the completions endpoint
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use aibot::core::config::AppConfig;
/// use aibot::slack::{SlackBot, listener};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     aibot::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let bot = SlackBot::new(&config).await?;
///     listener::run(bot, &config.slack_app_token).await?;
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod slack;
pub mod utils;

pub use errors::BotError;

/// Configure structured JSON logging.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// aibot::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
