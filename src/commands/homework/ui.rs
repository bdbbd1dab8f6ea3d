//! Embeds and the add-homework modal.

use crate::database::models::{HomeworkRecord, MAX_FIELD_CHARS, MAX_SUBJECT_CHARS};
use serenity::builder::{CreateActionRow, CreateEmbed, CreateInputText, CreateModal};
use serenity::model::Colour;
use serenity::all::InputTextStyle;

pub const ADD_HOMEWORK_MODAL_ID: &str = "homework_add_modal";
pub const FIELD_SUBJECT: &str = "homework_subject";
pub const FIELD_DETAILS: &str = "homework_details";
pub const FIELD_DUE_DATE: &str = "homework_due_date";
pub const FIELD_TYPE: &str = "homework_type";
pub const FIELD_IMAGE_URL: &str = "homework_image_url";

pub const LABEL_SUBJECT: &str = "ชื่อวิชา";
pub const LABEL_DETAILS: &str = "รายละเอียดงาน";
pub const LABEL_DUE_DATE: &str = "กำหนดส่ง";
pub const LABEL_TYPE: &str = "รูปแบบของงาน";

const HOMEWORK_GREEN: Colour = Colour::new(0x00ff00);

const COUNT_TITLE: &str = "Homework Count";
/// Discord caps an embed description at 4096 characters.
pub const EMBED_DESCRIPTION_MAX: usize = 4096;
/// Discord caps the combined text of all embeds in one message at 6000 characters.
pub const MESSAGE_EMBED_TEXT_MAX: usize = 6000;
pub const MESSAGE_EMBEDS_MAX: usize = 10;

/// Label/value pairs shown for a record, in display order.
pub fn record_fields(record: &HomeworkRecord) -> [(&'static str, String); 4] {
    [
        (LABEL_SUBJECT, record.subject.clone()),
        (LABEL_DETAILS, record.details.clone()),
        (LABEL_DUE_DATE, record.due_date.clone()),
        (LABEL_TYPE, record.kind.clone()),
    ]
}

fn with_record(mut embed: CreateEmbed, record: &HomeworkRecord) -> CreateEmbed {
    for (label, value) in record_fields(record) {
        embed = embed.field(label, value, false);
    }
    embed
}

fn with_image(embed: CreateEmbed, record: &HomeworkRecord) -> CreateEmbed {
    match record.image_url.as_deref() {
        Some(url) => embed.image(url),
        None => embed,
    }
}

/// Broadcast posted to the homework channel after a successful add.
pub fn homework_added_embed(record: &HomeworkRecord) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title(format!("Homework Added - Ref #{}", record.ref_number))
        .color(HOMEWORK_GREEN);
    let embed = with_record(embed, record).field(
        "Reference Number",
        record.ref_number.to_string(),
        false,
    );
    with_image(embed, record)
}

pub fn homework_details_embed(record: &HomeworkRecord) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title(format!("Homework Details - Ref #{}", record.ref_number))
        .color(HOMEWORK_GREEN);
    with_image(with_record(embed, record), record)
}

pub fn count_line(count: usize) -> String {
    format!("{count} assignments")
}

fn count_entry(subject: &str, count: usize) -> String {
    format!("**{subject}**: {}", count_line(count))
}

fn overflow_line(remaining: usize) -> String {
    format!("…and {remaining} more subjects")
}

/// Splits the per-subject tally into embed descriptions, one line per subject.
///
/// Pages stay within Discord's per-description and per-message text limits (titles count
/// toward the latter). Subjects that do not fit are summarised in a final overflow line.
pub fn count_pages(counts: &[(String, usize)]) -> Vec<String> {
    let title_chars = COUNT_TITLE.chars().count();
    let mut pages: Vec<String> = Vec::new();
    let mut used = 0;

    for (i, (subject, count)) in counts.iter().enumerate() {
        let line = count_entry(subject, *count);
        let remaining_after = counts.len() - i - 1;
        // Room kept back so an overflow line always fits if a later subject does not.
        let reserve = if remaining_after > 0 {
            overflow_line(remaining_after).chars().count() + 1
        } else {
            0
        };
        let line_chars = line.chars().count();

        let fits_current = pages.last().is_some_and(|page| {
            page.chars().count() + 1 + line_chars + reserve <= EMBED_DESCRIPTION_MAX
        }) && used + 1 + line_chars + reserve <= MESSAGE_EMBED_TEXT_MAX;
        let fits_new = pages.len() < MESSAGE_EMBEDS_MAX
            && line_chars + reserve <= EMBED_DESCRIPTION_MAX
            && used + title_chars + line_chars + reserve <= MESSAGE_EMBED_TEXT_MAX;

        if fits_current {
            if let Some(page) = pages.last_mut() {
                page.push('\n');
                page.push_str(&line);
            }
            used += 1 + line_chars;
        } else if fits_new {
            pages.push(line);
            used += title_chars + line_chars;
        } else {
            let overflow = overflow_line(counts.len() - i);
            match pages.last_mut() {
                Some(page) => {
                    page.push('\n');
                    page.push_str(&overflow);
                }
                None => pages.push(overflow),
            }
            break;
        }
    }
    pages
}

/// The public tally for `/hmnhomework`. Always at least one embed; an empty store gives a bare title.
pub fn homework_count_embeds(counts: &[(String, usize)]) -> Vec<CreateEmbed> {
    let base = || CreateEmbed::new().title(COUNT_TITLE).color(HOMEWORK_GREEN);
    let pages = count_pages(counts);
    if pages.is_empty() {
        return vec![base()];
    }
    pages.into_iter().map(|page| base().description(page)).collect()
}

fn input(
    style: InputTextStyle,
    label: &str,
    id: &str,
    placeholder: &str,
    max_chars: usize,
) -> CreateActionRow {
    CreateActionRow::InputText(
        CreateInputText::new(style, label, id)
            .placeholder(placeholder)
            .max_length(max_chars as u16)
            .required(true),
    )
}

pub fn add_homework_modal() -> CreateModal {
    CreateModal::new(ADD_HOMEWORK_MODAL_ID, "Add Homework").components(vec![
        input(
            InputTextStyle::Short,
            LABEL_SUBJECT,
            FIELD_SUBJECT,
            "กรอกชื่อวิชา",
            MAX_SUBJECT_CHARS,
        ),
        input(
            InputTextStyle::Paragraph,
            LABEL_DETAILS,
            FIELD_DETAILS,
            "กรอกรายละเอียดงาน",
            MAX_FIELD_CHARS,
        ),
        input(
            InputTextStyle::Short,
            LABEL_DUE_DATE,
            FIELD_DUE_DATE,
            "กรอกกำหนดส่ง (yyyy-mm-dd)",
            MAX_FIELD_CHARS,
        ),
        input(
            InputTextStyle::Short,
            LABEL_TYPE,
            FIELD_TYPE,
            "กรอกรูปแบบของงาน",
            MAX_FIELD_CHARS,
        ),
        CreateActionRow::InputText(
            CreateInputText::new(
                InputTextStyle::Short,
                "ลิงค์รูปภาพ (optional)",
                FIELD_IMAGE_URL,
            )
            .placeholder("กรอกลิงค์รูปภาพ (ถ้ามี)")
            .max_length(MAX_FIELD_CHARS as u16)
            .required(false),
        ),
    ])
}
