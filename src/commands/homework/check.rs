//! Implements `/checkhw <ref_number>`.

use super::{logic, send_reply};
use crate::AppState;
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::prelude::Context;

pub fn register() -> CreateCommand {
    CreateCommand::new("checkhw")
        .description("Check homework details by reference number")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Integer,
                "ref_number",
                "Reference number of the homework",
            )
            .required(true),
        )
}

pub fn ref_number_option(interaction: &CommandInteraction) -> Option<i64> {
    interaction
        .data
        .options
        .iter()
        .find(|opt| opt.name == "ref_number")
        .and_then(|opt| opt.value.as_i64())
}

/// Found records are shown publicly; a miss is told to the caller only.
pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        send_reply(ctx, interaction, logic::unavailable_response()).await;
        return;
    };
    let ref_number = ref_number_option(interaction);
    let found = match ref_number {
        Some(n) => state.store.find_by_ref(n).await,
        None => None,
    };
    let reply = logic::check_response(ref_number, found.as_ref());
    send_reply(ctx, interaction, reply).await;
}
