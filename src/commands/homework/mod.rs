//! The homework commands: `/addhomework`, `/hwnotify`, `/hmnhomework` and `/checkhw`.

pub mod add;
pub mod check;
pub mod count;
pub mod logic;
pub mod notify;
pub mod ui;

use crate::database::StoreError;
use serenity::builder::{
    CreateEmbed, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditInteractionResponse,
};
use serenity::model::application::CommandInteraction;
use serenity::model::permissions::Permissions;
use serenity::prelude::Context;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a homework command could not complete. Always reported to the caller only.
#[derive(Debug)]
pub enum HomeworkError {
    ChannelNotFound,
    RoleNotFound,
    NotInGuild,
    NotPermitted,
    /// The shared state was not installed yet, so nothing could be looked up.
    Unavailable,
    Store(StoreError),
    Discord(serenity::Error),
}

impl Display for HomeworkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChannelNotFound => write!(f, "homework channel not found"),
            Self::RoleNotFound => write!(f, "notification role not found"),
            Self::NotInGuild => write!(f, "this command only works inside a server"),
            Self::NotPermitted => write!(f, "administrator permission required"),
            Self::Unavailable => write!(f, "the bot is still starting up, try again shortly"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Discord(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HomeworkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Discord(err) => Some(err),
            _ => None,
        }
    }
}

/// True when the member's resolved permissions include `ADMINISTRATOR`.
pub fn is_privileged(permissions: Option<Permissions>) -> bool {
    permissions.is_some_and(|p| p.administrator())
}

/// Who gets to see a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    CallerOnly,
}

/// A reply decided by the command logic and sent by the Discord handler.
#[derive(Debug, Clone)]
pub struct Reply {
    pub content: Option<String>,
    pub embeds: Vec<CreateEmbed>,
    pub visibility: Visibility,
}

impl Reply {
    pub fn caller_only(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
            visibility: Visibility::CallerOnly,
        }
    }

    pub fn public_embeds(embeds: Vec<CreateEmbed>) -> Self {
        Self {
            content: None,
            embeds,
            visibility: Visibility::Public,
        }
    }

    pub fn is_caller_only(&self) -> bool {
        self.visibility == Visibility::CallerOnly
    }

    fn into_message(self) -> CreateInteractionResponseMessage {
        let message = CreateInteractionResponseMessage::new()
            .embeds(self.embeds)
            .ephemeral(self.visibility == Visibility::CallerOnly);
        match self.content {
            Some(content) => message.content(content),
            None => message,
        }
    }

    /// Edit for an interaction that was already deferred; visibility was fixed by the deferral.
    pub fn into_edit(self) -> EditInteractionResponse {
        let edit = EditInteractionResponse::new().embeds(self.embeds);
        match self.content {
            Some(content) => edit.content(content),
            None => edit,
        }
    }
}

/// Sends `reply` as the first response to a slash command.
pub async fn send_reply(ctx: &Context, interaction: &CommandInteraction, reply: Reply) {
    if let Err(e) = interaction
        .create_response(&ctx.http, CreateInteractionResponse::Message(reply.into_message()))
        .await
    {
        tracing::error!(target = "ui.reply", command = %interaction.data.name, error = ?e, "failed to send reply");
    }
}
