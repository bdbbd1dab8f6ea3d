use crate::{AppState, commands};
use serenity::async_trait;
use serenity::client::Context;
use serenity::model::application::{Command, Interaction};
use serenity::model::{gateway::Ready, id::GuildId};
use serenity::prelude::EventHandler;
use tracing::{debug, error, info};

pub struct Handler {
    /// Registers commands to this guild only (instant updates) instead of globally.
    pub guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match &interaction {
            Interaction::Command(command) => match command.data.name.as_str() {
                "addhomework" => commands::homework::add::run_slash(&ctx, command).await,
                "hwnotify" => commands::homework::notify::run_slash(&ctx, command).await,
                "hmnhomework" => commands::homework::count::run_slash(&ctx, command).await,
                "checkhw" => commands::homework::check::run_slash(&ctx, command).await,
                "help" => commands::help::run_slash(&ctx, command).await,
                other => debug!(target = "handler", command = other, "unknown command"),
            },
            Interaction::Modal(modal) => commands::homework::add::handle_modal(&ctx, modal).await,
            _ => {}
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(target = "handler", user = %ready.user.name, "connected to gateway");
        let registered = match self.guild_id {
            Some(guild_id) => guild_id
                .set_commands(&ctx.http, commands::all_commands())
                .await
                .map(|c| c.len()),
            None => Command::set_global_commands(&ctx.http, commands::all_commands())
                .await
                .map(|c| c.len()),
        };
        match registered {
            Ok(count) => info!(target = "handler", count, "slash commands registered"),
            Err(e) => error!(target = "handler", error = ?e, "error registering slash commands"),
        }

        if let Some(state) = AppState::from_ctx(&ctx).await {
            // Gateway reconnects deliver `ready` again; only the first one moves the phase.
            if let Err(e) = state.mark_ready().await {
                debug!(target = "lifecycle", error = %e, "ready received again");
            }
        }
    }
}
