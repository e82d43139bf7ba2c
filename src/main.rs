use aibot::core::config::AppConfig;
use aibot::slack::{SlackBot, listener};
use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();
    aibot::setup_logging();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let bot = SlackBot::new(&config)
        .await
        .context("failed to initialize bot")?;

    info!(
        bot_user_id = %bot.bot_user_id(),
        command = %config.command,
        model = %config.completion.model,
        "starting aibot"
    );

    let exit_code = listener::run(bot, &config.slack_app_token)
        .await
        .context("socket mode listener failed")?;

    info!(exit_code, "socket mode listener stopped");
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
