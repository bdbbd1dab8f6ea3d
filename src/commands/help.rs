//! `/help`: lists the homework commands, or details for one of them.

use serenity::builder::{
    CreateCommand, CreateCommandOption, CreateEmbed, CreateEmbedFooter,
    CreateInteractionResponse, CreateInteractionResponseMessage,
};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::model::Colour;
use serenity::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq)]
enum CommandCategory {
    General,
    Homework,
    Admin,
}

impl CommandCategory {
    fn name(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Homework => "Homework",
            Self::Admin => "Admin",
        }
    }
}

struct CommandInfo {
    name: &'static str,
    description: &'static str,
    usage: &'static str,
    details: &'static str,
    category: CommandCategory,
}

const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "help",
        description: "Shows this help menu.",
        usage: "/help [command]",
        details: "Lists every command, or shows details for one command.",
        category: CommandCategory::General,
    },
    CommandInfo {
        name: "hwnotify",
        description: "Get notification role for homework.",
        usage: "/hwnotify",
        details: "Gives you the role that is pinged when new homework is posted.",
        category: CommandCategory::Homework,
    },
    CommandInfo {
        name: "hmnhomework",
        description: "Notify the number of homeworks.",
        usage: "/hmnhomework",
        details: "Shows how many assignments are stored for each subject.",
        category: CommandCategory::Homework,
    },
    CommandInfo {
        name: "checkhw",
        description: "Check homework details by reference number.",
        usage: "/checkhw ref_number:<number>",
        details: "Shows subject, details, due date and type of one assignment.",
        category: CommandCategory::Homework,
    },
    CommandInfo {
        name: "addhomework",
        description: "Add homework (Admins only).",
        usage: "/addhomework",
        details: "Opens a form for subject, details, due date (yyyy-mm-dd), type and an optional image link. The assignment is posted to the homework channel with its reference number.",
        category: CommandCategory::Admin,
    },
];

/// Every command name the help menu knows about.
pub fn all_command_names() -> Vec<&'static str> {
    COMMANDS.iter().map(|c| c.name).collect()
}

pub fn register() -> CreateCommand {
    CreateCommand::new("help")
        .description("Shows the list of commands.")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "command",
                "Get details for a specific command",
            )
            .required(false),
        )
}

fn main_menu_embed() -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("Homework Bot Help")
        .color(Colour::BLURPLE)
        .footer(CreateEmbedFooter::new("Use /help <command> for details."));
    for category in [
        CommandCategory::General,
        CommandCategory::Homework,
        CommandCategory::Admin,
    ] {
        let lines: Vec<String> = COMMANDS
            .iter()
            .filter(|c| c.category == category)
            .map(|c| format!("`/{}` - {}", c.name, c.description))
            .collect();
        embed = embed.field(category.name(), lines.join("\n"), false);
    }
    embed
}

fn command_detail_embed(info: &CommandInfo) -> CreateEmbed {
    CreateEmbed::new()
        .title(format!("/{}", info.name))
        .color(Colour::BLURPLE)
        .description(info.details)
        .field("Usage", format!("`{}`", info.usage), false)
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    let requested = interaction
        .data
        .options
        .first()
        .and_then(|opt| opt.value.as_str())
        .map(|s| s.trim().trim_start_matches('/').to_lowercase());

    let embed = match requested {
        Some(name) => match COMMANDS.iter().find(|c| c.name == name) {
            Some(info) => command_detail_embed(info),
            None => CreateEmbed::new()
                .title("Unknown command")
                .description(format!("No command named `{name}`.")),
        },
        None => main_menu_embed(),
    };

    let message = CreateInteractionResponseMessage::new()
        .embed(embed)
        .ephemeral(true);
    if let Err(e) = interaction
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await
    {
        tracing::error!(target = "cmd.help", error = ?e, "failed to send help");
    }
}
