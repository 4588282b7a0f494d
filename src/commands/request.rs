//! Inbound command parsing
//!
//! Telegram sends commands as plain message text: `/addseries dune`, or
//! `/addseries@SomeBot dune` in group chats. Parsing strips the slash and
//! the bot-name suffix, lowercases the command, and keeps the argument tail
//! verbatim (trimmed).

/// One parsed inbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub chat_id: i64,
    /// First name of the sender, when the platform provides one.
    pub sender: Option<String>,
    /// Lowercased command name, without the leading slash.
    pub command: String,
    /// Raw argument text following the command, trimmed.
    pub args: String,
}

impl CommandRequest {
    /// Parse message text into a request. Returns `None` for anything that
    /// is not a command.
    pub fn parse(chat_id: i64, sender: Option<String>, text: &str) -> Option<Self> {
        let rest = text.trim().strip_prefix('/')?;
        let (head, args) = match rest.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args),
            None => (rest, ""),
        };
        let command = head.split('@').next().unwrap_or(head).to_lowercase();
        if command.is_empty()
            || !command
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return None;
        }
        Some(Self {
            chat_id,
            sender,
            command,
            args: args.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<CommandRequest> {
        CommandRequest::parse(42, None, text)
    }

    #[test]
    fn parses_bare_command() {
        let req = parse("/movies").unwrap();
        assert_eq!(req.command, "movies");
        assert_eq!(req.args, "");
        assert_eq!(req.chat_id, 42);
    }

    #[test]
    fn parses_command_with_args() {
        let req = parse("/addseries the last of us").unwrap();
        assert_eq!(req.command, "addseries");
        assert_eq!(req.args, "the last of us");
    }

    #[test]
    fn strips_bot_name_suffix() {
        let req = parse("/addmovie@MarqueeBot dune").unwrap();
        assert_eq!(req.command, "addmovie");
        assert_eq!(req.args, "dune");
    }

    #[test]
    fn command_name_is_case_folded() {
        assert_eq!(parse("/NotifyOn").unwrap().command, "notifyon");
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let req = parse("  /removeseries   you  ").unwrap();
        assert_eq!(req.command, "removeseries");
        assert_eq!(req.args, "you");
    }

    #[test]
    fn non_commands_are_ignored() {
        assert!(parse("hello there").is_none());
        assert!(parse("").is_none());
        assert!(parse("/").is_none());
        assert!(parse("/ spaced").is_none());
        assert!(parse("//weird").is_none());
    }
}
