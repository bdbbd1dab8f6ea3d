//! Implements `/hwnotify`, which hands the caller the homework notification role.

use super::logic::{self, RoleGrants};
use super::HomeworkError;
use crate::AppState;
use async_trait::async_trait;
use serenity::builder::CreateCommand;
use serenity::model::application::CommandInteraction;
use serenity::model::id::{GuildId, RoleId, UserId};
use serenity::prelude::Context;
use tracing::{error, warn};

pub fn register() -> CreateCommand {
    CreateCommand::new("hwnotify").description("Get notification role for homework")
}

/// Resolves and grants roles for one guild member.
pub struct MemberRoles<'a> {
    pub ctx: &'a Context,
    pub guild_id: GuildId,
    pub user_id: UserId,
}

#[async_trait]
impl RoleGrants for MemberRoles<'_> {
    async fn role_exists(&self, role: RoleId) -> serenity::Result<bool> {
        let cached = self
            .ctx
            .cache
            .guild(self.guild_id)
            .map(|guild| guild.roles.contains_key(&role));
        match cached {
            Some(true) => Ok(true),
            _ => Ok(self.guild_id.roles(&self.ctx.http).await?.contains_key(&role)),
        }
    }

    async fn grant(&self, role: RoleId) -> serenity::Result<()> {
        self.ctx
            .http
            .add_member_role(
                self.guild_id,
                self.user_id,
                role,
                Some("Requested homework notifications"),
            )
            .await
    }
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer_ephemeral(&ctx.http).await.ok();

    let state = AppState::from_ctx(ctx).await;
    let result = match (state, interaction.guild_id, interaction.member.as_ref()) {
        (None, _, _) => Err(HomeworkError::Unavailable),
        (Some(state), Some(guild_id), Some(member)) => {
            let grants = MemberRoles {
                ctx,
                guild_id,
                user_id: interaction.user.id,
            };
            logic::notify_role(&state.config, &member.roles, &grants).await
        }
        _ => Err(HomeworkError::NotInGuild),
    };

    if let Err(e) = &result {
        warn!(target = "cmd.hwnotify", user_id = interaction.user.id.get(), error = %e, "role assignment failed");
    }
    let reply = logic::notify_response(&result);
    if let Err(e) = interaction
        .edit_response(&ctx.http, reply.into_edit())
        .await
    {
        error!(target = "ui.edit", tag = "hwnotify", error = ?e, "edit_response failed");
    }
}
