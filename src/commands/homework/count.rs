//! Implements `/hmnhomework`: a public per-subject tally of stored homework.

use super::{logic, send_reply};
use crate::AppState;
use serenity::builder::CreateCommand;
use serenity::model::application::CommandInteraction;
use serenity::prelude::Context;

pub fn register() -> CreateCommand {
    CreateCommand::new("hmnhomework").description("Notify the number of homeworks")
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    let reply = match AppState::from_ctx(ctx).await {
        Some(state) => logic::count_response(&state.store.list_all().await),
        None => logic::unavailable_response(),
    };
    send_reply(ctx, interaction, reply).await;
}
