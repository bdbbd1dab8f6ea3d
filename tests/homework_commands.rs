//! Command flows run against an in-memory store and fake Discord collaborators.
use homework_bot::commands::homework::{HomeworkError, Visibility};
use homework_bot::commands::homework::logic::{
    self, Announcer, NotifyOutcome, RoleGrants, add_homework, count_by_subject, notify_role,
};
use homework_bot::commands::homework::ui;
use homework_bot::config::{BotConfig, parse_config};
use homework_bot::database::models::{HomeworkRecord, NewHomework};
use homework_bot::database::{self, StoreError};
use homework_bot::services::HomeworkStore;
use serenity::builder::CreateEmbed;
use serenity::model::id::{ChannelId, RoleId};
use std::sync::Mutex;

const CHANNEL: u64 = 1111;
const ROLE: u64 = 2222;

fn configured() -> BotConfig {
    BotConfig {
        homework_channel_id: Some(CHANNEL),
        notification_role_id: Some(ROLE),
    }
}

fn hw(subject: &str) -> NewHomework {
    NewHomework::new(subject, "pp.1-10", "2024-06-01", "worksheet", None)
}

async fn memory_store() -> HomeworkStore {
    HomeworkStore::new(database::connect_in_memory().await.unwrap())
}

#[derive(Default)]
struct FakeChannel {
    known: Vec<ChannelId>,
    fail_send: bool,
    sent: Mutex<Vec<(ChannelId, i64)>>,
}

#[async_trait::async_trait]
impl Announcer for FakeChannel {
    async fn channel_exists(&self, channel: ChannelId) -> bool {
        self.known.contains(&channel)
    }

    async fn announce(
        &self,
        channel: ChannelId,
        record: &HomeworkRecord,
    ) -> serenity::Result<()> {
        if self.fail_send {
            return Err(serenity::Error::Other("send rejected"));
        }
        self.sent.lock().unwrap().push((channel, record.ref_number));
        Ok(())
    }
}

#[derive(Default)]
struct FakeRoles {
    known: Vec<RoleId>,
    granted: Mutex<Vec<RoleId>>,
}

#[async_trait::async_trait]
impl RoleGrants for FakeRoles {
    async fn role_exists(&self, role: RoleId) -> serenity::Result<bool> {
        Ok(self.known.contains(&role))
    }

    async fn grant(&self, role: RoleId) -> serenity::Result<()> {
        self.granted.lock().unwrap().push(role);
        Ok(())
    }
}

#[tokio::test]
async fn add_homework_stores_then_broadcasts() {
    let store = memory_store().await;
    let channel = FakeChannel {
        known: vec![ChannelId::new(CHANNEL)],
        ..Default::default()
    };

    let record = add_homework(&store, &configured(), &channel, hw("Math"))
        .await
        .unwrap();
    assert_eq!(record.ref_number, 1);
    assert_eq!(
        logic::added_reply(&record),
        "✅ Homework added successfully! Reference number: 1"
    );
    assert_eq!(
        *channel.sent.lock().unwrap(),
        vec![(ChannelId::new(CHANNEL), 1)]
    );
    assert_eq!(store.find_by_ref(1).await, Some(record));
}

#[tokio::test]
async fn add_homework_without_destination_stores_nothing() {
    let store = memory_store().await;
    let channel = FakeChannel::default();

    let unset = add_homework(&store, &BotConfig::default(), &channel, hw("Math")).await;
    assert!(matches!(unset, Err(HomeworkError::ChannelNotFound)));

    let stale = add_homework(&store, &configured(), &channel, hw("Math")).await;
    let err = stale.unwrap_err();
    assert!(matches!(err, HomeworkError::ChannelNotFound));
    assert_eq!(
        logic::add_error_reply(&err),
        "❌ Error: Homework channel not found."
    );

    assert!(store.is_empty().await);
    assert!(channel.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn add_homework_reports_broadcast_failure() {
    let store = memory_store().await;
    let channel = FakeChannel {
        known: vec![ChannelId::new(CHANNEL)],
        fail_send: true,
        ..Default::default()
    };
    let err = add_homework(&store, &configured(), &channel, hw("Math"))
        .await
        .unwrap_err();
    assert!(matches!(err, HomeworkError::Discord(_)));
    assert!(logic::add_error_reply(&err).starts_with("❌ Error adding homework:"));
}

#[tokio::test]
async fn add_homework_rejects_blank_fields() {
    let store = memory_store().await;
    let channel = FakeChannel {
        known: vec![ChannelId::new(CHANNEL)],
        ..Default::default()
    };
    let err = add_homework(
        &store,
        &configured(),
        &channel,
        NewHomework::new("Math", "", "2024-06-01", "worksheet", None),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        HomeworkError::Store(StoreError::Validation("details"))
    ));
    assert!(channel.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn notify_grants_role_once() {
    let roles = FakeRoles {
        known: vec![RoleId::new(ROLE)],
        ..Default::default()
    };

    let first = notify_role(&configured(), &[], &roles).await.unwrap();
    assert_eq!(first, NotifyOutcome::Assigned);
    assert_eq!(*roles.granted.lock().unwrap(), vec![RoleId::new(ROLE)]);

    let again = notify_role(&configured(), &[RoleId::new(ROLE)], &roles)
        .await
        .unwrap();
    assert_eq!(again, NotifyOutcome::AlreadyAssigned);
    assert_eq!(
        logic::notify_reply(again),
        "You already have the homework notification role."
    );
    assert_eq!(roles.granted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn notify_with_missing_role_fails() {
    let roles = FakeRoles::default();
    let err = notify_role(&configured(), &[], &roles).await.unwrap_err();
    assert!(matches!(err, HomeworkError::RoleNotFound));
    assert_eq!(logic::notify_error_reply(&err), "❌ Notification role not found.");
    assert!(roles.granted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_settings_route_handlers_to_not_found() {
    let config = parse_config("{ broken").unwrap_or_default();
    assert_eq!(config.homework_channel(), None);
    assert_eq!(config.notification_role(), None);

    let store = memory_store().await;
    let channel = FakeChannel {
        known: vec![ChannelId::new(CHANNEL)],
        ..Default::default()
    };
    let roles = FakeRoles {
        known: vec![RoleId::new(ROLE)],
        ..Default::default()
    };

    let add = add_homework(&store, &config, &channel, hw("Math")).await;
    assert!(matches!(add, Err(HomeworkError::ChannelNotFound)));
    let notify = notify_role(&config, &[], &roles).await;
    assert!(matches!(notify, Err(HomeworkError::RoleNotFound)));
}

#[tokio::test]
async fn count_by_subject_over_stored_records() {
    let store = memory_store().await;
    for subject in ["Math", "Math", "Art"] {
        store.create(hw(subject)).await.unwrap();
    }
    let counts = count_by_subject(&store.list_all().await);
    let mut sorted = counts.clone();
    sorted.sort();
    assert_eq!(
        sorted,
        vec![("Art".to_string(), 1), ("Math".to_string(), 2)]
    );
    assert_eq!(ui::count_line(2), "2 assignments");
}

#[tokio::test]
async fn lookup_miss_has_not_found_reply() {
    let store = memory_store().await;
    assert!(store.find_by_ref(42).await.is_none());
    assert_eq!(
        logic::not_found_reply(42),
        "Homework with reference number 42 not found."
    );
}

#[tokio::test]
async fn details_fields_follow_display_order() {
    let store = memory_store().await;
    let record = store.create(hw("Math")).await.unwrap();
    let labels: Vec<&str> = ui::record_fields(&record).iter().map(|(l, _)| *l).collect();
    assert_eq!(
        labels,
        vec![
            ui::LABEL_SUBJECT,
            ui::LABEL_DETAILS,
            ui::LABEL_DUE_DATE,
            ui::LABEL_TYPE
        ]
    );
    assert_eq!(ui::record_fields(&record)[3].1, "worksheet");
}

fn embed_json(embed: &CreateEmbed) -> serde_json::Value {
    serde_json::to_value(embed).unwrap()
}

fn text_of(value: &serde_json::Value, key: &str) -> String {
    value[key].as_str().unwrap_or_default().to_string()
}

/// Checks the Discord message limits and returns the description lines.
fn assert_within_message_limits(embeds: &[CreateEmbed]) -> Vec<String> {
    assert!(!embeds.is_empty());
    assert!(embeds.len() <= ui::MESSAGE_EMBEDS_MAX);
    let mut total = 0;
    let mut lines = Vec::new();
    for embed in embeds {
        let value = embed_json(embed);
        let fields = value.get("fields").and_then(|f| f.as_array()).map_or(0, Vec::len);
        assert!(fields <= 25, "{fields} fields in one embed");
        let description = text_of(&value, "description");
        assert!(description.chars().count() <= ui::EMBED_DESCRIPTION_MAX);
        total += text_of(&value, "title").chars().count() + description.chars().count();
        lines.extend(description.lines().map(str::to_string));
    }
    assert!(total <= ui::MESSAGE_EMBED_TEXT_MAX, "{total} characters of embed text");
    lines
}

#[tokio::test]
async fn count_over_thirty_subjects_fits_discord_limits() {
    let store = memory_store().await;
    for i in 0..30 {
        store.create(hw(&format!("Subject {i}"))).await.unwrap();
    }
    store.create(hw("Subject 0")).await.unwrap();

    let reply = logic::count_response(&store.list_all().await);
    assert_eq!(reply.visibility, Visibility::Public);
    let lines = assert_within_message_limits(&reply.embeds);
    assert_eq!(lines.len(), 30);
    assert_eq!(lines[0], "**Subject 0**: 2 assignments");
    assert_eq!(lines[29], "**Subject 29**: 1 assignments");
}

#[test]
fn count_with_hundreds_of_long_subjects_summarises_the_rest() {
    let counts: Vec<(String, usize)> = (0..400)
        .map(|i| (format!("{i:03}{}", "s".repeat(253)), 1))
        .collect();

    let lines = assert_within_message_limits(&ui::homework_count_embeds(&counts));
    let overflow = lines.last().unwrap();
    let listed = lines.len() - 1;
    assert!(listed > 0);
    assert_eq!(*overflow, format!("…and {} more subjects", 400 - listed));
}

#[test]
fn count_of_empty_store_is_a_bare_embed() {
    let embeds = ui::homework_count_embeds(&[]);
    assert_eq!(embeds.len(), 1);
    let value = embed_json(&embeds[0]);
    assert_eq!(text_of(&value, "title"), "Homework Count");
    assert_eq!(text_of(&value, "description"), "");
}

#[tokio::test]
async fn reply_visibility_follows_each_command() {
    let store = memory_store().await;
    let channel = FakeChannel {
        known: vec![ChannelId::new(CHANNEL)],
        ..Default::default()
    };
    let roles = FakeRoles {
        known: vec![RoleId::new(ROLE)],
        ..Default::default()
    };

    let added = add_homework(&store, &configured(), &channel, hw("Math")).await;
    assert!(logic::add_response(&added).is_caller_only());
    let refused = add_homework(&store, &BotConfig::default(), &channel, hw("Math")).await;
    assert!(logic::add_response(&refused).is_caller_only());

    let granted = notify_role(&configured(), &[], &roles).await;
    assert!(logic::notify_response(&granted).is_caller_only());
    let missing = notify_role(&BotConfig::default(), &[], &roles).await;
    let reply = logic::notify_response(&missing);
    assert!(reply.is_caller_only());
    assert_eq!(reply.content.as_deref(), Some("❌ Notification role not found."));

    let records = store.list_all().await;
    assert_eq!(logic::count_response(&records).visibility, Visibility::Public);
    assert_eq!(logic::count_response(&[]).visibility, Visibility::Public);

    let hit = logic::check_response(Some(1), records.first());
    assert_eq!(hit.visibility, Visibility::Public);
    assert_eq!(hit.embeds.len(), 1);
    assert_eq!(hit.content, None);

    let miss = logic::check_response(Some(42), store.find_by_ref(42).await.as_ref());
    assert!(miss.is_caller_only());
    assert_eq!(
        miss.content.as_deref(),
        Some("Homework with reference number 42 not found.")
    );
    let no_ref = logic::check_response(None, None);
    assert!(no_ref.is_caller_only());
    assert_eq!(no_ref.content.as_deref(), Some(logic::MISSING_REF_REPLY));

    assert!(logic::unavailable_response().is_caller_only());
}
