// src/commands/mod.rs
// Declares the slash command modules and the full registration list.

pub mod help;
pub mod homework;

use serenity::builder::CreateCommand;

/// Every slash command the bot registers on `ready`.
pub fn all_commands() -> Vec<CreateCommand> {
    vec![
        homework::add::register(),
        homework::notify::register(),
        homework::count::register(),
        homework::check::register(),
        help::register(),
    ]
}
