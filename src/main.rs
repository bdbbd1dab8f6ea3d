use std::env;
use std::sync::Arc;

use homework_bot::lifecycle::{self, StartupError};
use homework_bot::model::AppState;
use homework_bot::{config, database, handler, logging};
use serenity::model::gateway::GatewayIntents;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use tracing::{error, info, warn};

fn fail(err: StartupError) -> ! {
    error!(target = "lifecycle", error = %err, "startup aborted");
    eprintln!("Error: {err}");
    std::process::exit(1);
}

fn guild_from_env() -> Option<GuildId> {
    let raw = env::var("GUILD_ID").ok()?;
    match raw.trim().parse::<u64>() {
        Ok(id) if id != 0 => Some(GuildId::new(id)),
        _ => {
            warn!(target = "lifecycle", value = %raw, "GUILD_ID is not a valid id; registering commands globally");
            None
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    logging::init_logging();

    let token = lifecycle::require_token(env::var("DISCORD_TOKEN").ok()).unwrap_or_else(|e| fail(e));

    let boot = lifecycle::bootstrap(
        config::config_path_from_env(),
        &database::database_url_from_env(),
    )
    .await
    .unwrap_or_else(|e| fail(e));

    let app_state = Arc::new(AppState::new(boot.store, boot.config, boot.tracker));

    // Slash commands and modals arrive with GUILDS; the cache resolves roles and channels.
    let intents = GatewayIntents::GUILDS;

    let mut client = match Client::builder(&token, intents)
        .event_handler(handler::Handler {
            guild_id: guild_from_env(),
        })
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!(target = "lifecycle", error = ?e, "error creating the Discord client");
            std::process::exit(1);
        }
    };

    {
        let mut data = client.data.write().await;
        data.insert::<AppState>(app_state);
    }

    info!(target = "lifecycle", "starting gateway client");
    if let Err(why) = client.start().await {
        error!(target = "lifecycle", error = ?why, "client error");
        std::process::exit(1);
    }
}
