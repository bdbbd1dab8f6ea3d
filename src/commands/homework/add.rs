//! Implements `/addhomework`: an admin-only modal whose submission stores and broadcasts a record.

use super::logic::{self, Announcer};
use super::ui::{self, ADD_HOMEWORK_MODAL_ID};
use super::{HomeworkError, is_privileged, send_reply};
use crate::AppState;
use crate::database::models::{HomeworkRecord, NewHomework};
use async_trait::async_trait;
use serenity::builder::{CreateCommand, CreateInteractionResponse, CreateMessage};
use serenity::model::application::{
    ActionRow, ActionRowComponent, CommandInteraction, ModalInteraction,
};
use serenity::model::id::ChannelId;
use serenity::model::permissions::Permissions;
use serenity::prelude::Context;
use tracing::{error, warn};

pub fn register() -> CreateCommand {
    CreateCommand::new("addhomework")
        .description("Add homework (Admins only)")
        .default_member_permissions(Permissions::ADMINISTRATOR)
}

/// Sends the broadcast through the gateway client.
pub struct DiscordAnnouncer<'a> {
    pub ctx: &'a Context,
}

#[async_trait]
impl Announcer for DiscordAnnouncer<'_> {
    async fn channel_exists(&self, channel: ChannelId) -> bool {
        match channel.to_channel(self.ctx).await {
            Ok(_) => true,
            Err(e) => {
                warn!(target = "cmd.addhomework", channel_id = channel.get(), error = ?e, "channel lookup failed");
                false
            }
        }
    }

    async fn announce(
        &self,
        channel: ChannelId,
        record: &HomeworkRecord,
    ) -> serenity::Result<()> {
        let message = CreateMessage::new().embed(ui::homework_added_embed(record));
        channel.send_message(&self.ctx.http, message).await?;
        Ok(())
    }
}

/// Opens the modal. Non-admins are turned away before it is shown.
pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    if !is_privileged(interaction.member.as_ref().and_then(|m| m.permissions)) {
        let reply = logic::add_response(&Err(HomeworkError::NotPermitted));
        send_reply(ctx, interaction, reply).await;
        return;
    }
    if let Err(e) = interaction
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Modal(ui::add_homework_modal()),
        )
        .await
    {
        error!(target = "cmd.addhomework", error = ?e, "failed to open modal");
    }
}

/// Value of the text input `custom_id`, if the modal carried it.
pub fn modal_value(rows: &[ActionRow], custom_id: &str) -> Option<String> {
    rows.iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            ActionRowComponent::InputText(input) if input.custom_id == custom_id => {
                input.value.clone()
            }
            _ => None,
        })
}

pub fn homework_from_modal(rows: &[ActionRow]) -> NewHomework {
    let text = |id: &str| modal_value(rows, id).unwrap_or_default();
    NewHomework::new(
        text(ui::FIELD_SUBJECT),
        text(ui::FIELD_DETAILS),
        text(ui::FIELD_DUE_DATE),
        text(ui::FIELD_TYPE),
        modal_value(rows, ui::FIELD_IMAGE_URL),
    )
}

/// Handles the modal submission; every reply here is visible to the submitter only.
pub async fn handle_modal(ctx: &Context, modal: &ModalInteraction) {
    if modal.data.custom_id != ADD_HOMEWORK_MODAL_ID {
        return;
    }
    if let Err(e) = modal.defer_ephemeral(&ctx.http).await {
        tracing::debug!(target = "ui.defer", error = ?e, "defer failed (already acknowledged?)");
    }

    let result = match AppState::from_ctx(ctx).await {
        None => Err(HomeworkError::Unavailable),
        Some(_) if !is_privileged(modal.member.as_ref().and_then(|m| m.permissions)) => {
            Err(HomeworkError::NotPermitted)
        }
        Some(state) => {
            let new = homework_from_modal(&modal.data.components);
            let announcer = DiscordAnnouncer { ctx };
            logic::add_homework(&state.store, &state.config, &announcer, new).await
        }
    };

    if let Err(e) = &result {
        warn!(target = "cmd.addhomework", user_id = modal.user.id.get(), error = %e, "add homework failed");
    }
    let reply = logic::add_response(&result);
    if let Err(e) = modal.edit_response(&ctx.http, reply.into_edit()).await
    {
        error!(target = "ui.edit", tag = "addhomework", error = ?e, "edit_response failed");
    }
}
