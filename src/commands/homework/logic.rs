//! Platform-independent core of the homework commands.
//!
//! Discord access sits behind two small traits so the flows can run against fakes in tests.

use super::{HomeworkError, Reply, ui};
use crate::config::BotConfig;
use crate::database::models::{HomeworkRecord, NewHomework};
use crate::services::HomeworkStore;
use async_trait::async_trait;
use serenity::model::id::{ChannelId, RoleId};
use tracing::{error, info, warn};

/// Destination for add-homework broadcasts.
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn channel_exists(&self, channel: ChannelId) -> bool;
    async fn announce(&self, channel: ChannelId, record: &HomeworkRecord)
    -> serenity::Result<()>;
}

/// Role lookups and grants for the invoking member.
#[async_trait]
pub trait RoleGrants: Send + Sync {
    async fn role_exists(&self, role: RoleId) -> serenity::Result<bool>;
    async fn grant(&self, role: RoleId) -> serenity::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    AlreadyAssigned,
    Assigned,
}

/// Resolves the broadcast channel, stores the record, then announces it.
///
/// The channel is checked before anything is written so a misconfigured destination
/// never leaves behind a record nobody was told about.
pub async fn add_homework(
    store: &HomeworkStore,
    config: &BotConfig,
    announcer: &dyn Announcer,
    new: NewHomework,
) -> Result<HomeworkRecord, HomeworkError> {
    let Some(channel) = config.homework_channel() else {
        warn!(target = "cmd.addhomework", "homework_channel_id is not configured");
        return Err(HomeworkError::ChannelNotFound);
    };
    if !announcer.channel_exists(channel).await {
        warn!(target = "cmd.addhomework", channel_id = channel.get(), "configured homework channel does not resolve");
        return Err(HomeworkError::ChannelNotFound);
    }

    let record = store.create(new).await.map_err(HomeworkError::Store)?;

    if let Err(e) = announcer.announce(channel, &record).await {
        error!(target = "cmd.addhomework", ref_number = record.ref_number, channel_id = channel.get(), error = ?e, "broadcast failed after the record was stored");
        return Err(HomeworkError::Discord(e));
    }
    info!(target = "cmd.addhomework", ref_number = record.ref_number, channel_id = channel.get(), "homework announced");
    Ok(record)
}

/// Grants the configured notification role unless the member already holds it.
pub async fn notify_role(
    config: &BotConfig,
    member_roles: &[RoleId],
    grants: &dyn RoleGrants,
) -> Result<NotifyOutcome, HomeworkError> {
    let Some(role) = config.notification_role() else {
        warn!(target = "cmd.hwnotify", "notification_role_id is not configured");
        return Err(HomeworkError::RoleNotFound);
    };
    if !grants.role_exists(role).await.map_err(HomeworkError::Discord)? {
        warn!(target = "cmd.hwnotify", role_id = role.get(), "configured notification role does not resolve");
        return Err(HomeworkError::RoleNotFound);
    }
    if member_roles.contains(&role) {
        return Ok(NotifyOutcome::AlreadyAssigned);
    }
    grants.grant(role).await.map_err(HomeworkError::Discord)?;
    Ok(NotifyOutcome::Assigned)
}

/// Number of records per subject, groups in first-seen order.
pub fn count_by_subject(records: &[HomeworkRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for hw in records {
        match counts.iter_mut().find(|(subject, _)| *subject == hw.subject) {
            Some((_, n)) => *n += 1,
            None => counts.push((hw.subject.clone(), 1)),
        }
    }
    counts
}

pub fn added_reply(record: &HomeworkRecord) -> String {
    format!(
        "✅ Homework added successfully! Reference number: {}",
        record.ref_number
    )
}

pub fn add_error_reply(err: &HomeworkError) -> String {
    match err {
        HomeworkError::ChannelNotFound => "❌ Error: Homework channel not found.".to_string(),
        other => format!("❌ Error adding homework: {other}"),
    }
}

pub fn notify_reply(outcome: NotifyOutcome) -> &'static str {
    match outcome {
        NotifyOutcome::AlreadyAssigned => "You already have the homework notification role.",
        NotifyOutcome::Assigned => "✅ You have been assigned the homework notification role.",
    }
}

pub fn notify_error_reply(err: &HomeworkError) -> String {
    match err {
        HomeworkError::RoleNotFound => "❌ Notification role not found.".to_string(),
        other => format!("❌ Error assigning role: {other}"),
    }
}

pub fn not_found_reply(ref_number: i64) -> String {
    format!("Homework with reference number {ref_number} not found.")
}

pub const MISSING_REF_REPLY: &str = "Please provide a reference number.";

/// `/addhomework` outcomes are only ever shown to the submitter.
pub fn add_response(result: &Result<HomeworkRecord, HomeworkError>) -> Reply {
    match result {
        Ok(record) => Reply::caller_only(added_reply(record)),
        Err(e) => Reply::caller_only(add_error_reply(e)),
    }
}

/// `/hwnotify` outcomes are only ever shown to the caller.
pub fn notify_response(result: &Result<NotifyOutcome, HomeworkError>) -> Reply {
    match result {
        Ok(outcome) => Reply::caller_only(notify_reply(*outcome)),
        Err(e) => Reply::caller_only(notify_error_reply(e)),
    }
}

/// The tally is public.
pub fn count_response(records: &[HomeworkRecord]) -> Reply {
    Reply::public_embeds(ui::homework_count_embeds(&count_by_subject(records)))
}

/// A found record is shown publicly; a miss or a missing number is told to the caller only.
pub fn check_response(ref_number: Option<i64>, found: Option<&HomeworkRecord>) -> Reply {
    match (ref_number, found) {
        (_, Some(record)) => Reply::public_embeds(vec![ui::homework_details_embed(record)]),
        (Some(n), None) => Reply::caller_only(not_found_reply(n)),
        (None, None) => Reply::caller_only(MISSING_REF_REPLY),
    }
}

/// Sent by read-only commands that ran before the shared state was installed.
pub fn unavailable_response() -> Reply {
    Reply::caller_only(format!("❌ {}", HomeworkError::Unavailable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::homework::Visibility;
    use chrono::Utc;

    fn record(ref_number: i64, subject: &str) -> HomeworkRecord {
        HomeworkRecord {
            ref_number,
            subject: subject.to_string(),
            details: "d".into(),
            due_date: "2024-06-01".into(),
            kind: "worksheet".into(),
            image_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn counts_group_by_subject() {
        let records = [record(1, "Math"), record(2, "Math"), record(3, "Art")];
        let counts = count_by_subject(&records);
        assert_eq!(counts.len(), 2);
        assert!(counts.contains(&("Math".to_string(), 2)));
        assert!(counts.contains(&("Art".to_string(), 1)));
    }

    #[test]
    fn counting_nothing_is_empty() {
        assert!(count_by_subject(&[]).is_empty());
    }

    #[test]
    fn error_replies_match_command() {
        assert_eq!(
            add_error_reply(&HomeworkError::ChannelNotFound),
            "❌ Error: Homework channel not found."
        );
        assert_eq!(
            notify_error_reply(&HomeworkError::RoleNotFound),
            "❌ Notification role not found."
        );
        assert!(add_error_reply(&HomeworkError::NotPermitted).starts_with("❌ Error adding homework:"));
    }

    #[test]
    fn startup_gap_gets_the_generic_error_text() {
        let add = add_response(&Err(HomeworkError::Unavailable));
        assert!(add.is_caller_only());
        assert_eq!(
            add.content.as_deref(),
            Some("❌ Error adding homework: the bot is still starting up, try again shortly")
        );
        let notify = notify_response(&Err(HomeworkError::Unavailable));
        assert!(notify.content.unwrap_or_default().starts_with("❌ Error assigning role:"));
        assert_eq!(unavailable_response().visibility, Visibility::CallerOnly);
    }
}
