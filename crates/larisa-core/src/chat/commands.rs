//! Bot command parsing.
//!
//! Commands start with `/` and may carry a `@botname` suffix, which Telegram
//! clients append in group chats.

/// Commands understood by the bot.
#[derive(Debug, PartialEq)]
pub enum BotCommand {
    /// Show the greeting.
    Start,
    /// Forget the sender's conversation history.
    Clear,
    /// Any other command. Ignored by the dispatcher.
    Unknown(String),
    /// A command suffixed with another bot's username. Ignored.
    ForOtherBot(String),
}

/// Parse message text as a bot command.
///
/// Only text starting with `/` at offset 0 is a command, as in Telegram's
/// `bot_command` entities. A `@name` suffix must match `bot_username`
/// (case-insensitive) when the username is known.
///
/// Returns `None` for anything else.
pub fn parse(text: &str, bot_username: Option<&str>) -> Option<BotCommand> {
    if !text.starts_with('/') {
        return None;
    }

    let head = text.split_whitespace().next().unwrap_or(text);
    let (name, addressee) = match head.split_once('@') {
        Some((name, addressee)) => (name, Some(addressee)),
        None => (head, None),
    };

    if let (Some(addressee), Some(me)) = (addressee, bot_username) {
        if !addressee.eq_ignore_ascii_case(me) {
            return Some(BotCommand::ForOtherBot(head.to_string()));
        }
    }

    match name.to_lowercase().as_str() {
        "/start" => Some(BotCommand::Start),
        "/clear" => Some(BotCommand::Clear),
        other => Some(BotCommand::Unknown(other.to_string())),
    }
}
