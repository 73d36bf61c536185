//! Query parsing: `@command` tokens, residual search text, and completion.
//!
//! A command token is `@` followed by one or more ASCII word characters,
//! wherever it occurs. Every command token is removed from the residual text,
//! recognized or not, so `rust@pinned` searches `rust` among pinned tabs.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::interface::SearchField;
use crate::ranking::split_patterns;

static COMMAND_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"@[A-Za-z0-9_]+").unwrap());

static TRAILING_PARTIAL_COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z0-9_]*)$").unwrap());

/// Completion candidates, in the order they are offered
pub const COMMAND_VOCABULARY: &[&str] = &["pinned", "audio", "url"];

/// A filter or field-switch command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `@audio`: audible or muted tabs only
    Audio,
    /// `@pinned`: pinned tabs only
    Pinned,
    /// `@url`: match against the URL instead of the title
    Url,
    /// Any other `@word`; stripped, no effect
    Unknown(String),
}

impl Command {
    fn from_token(token: &str) -> Self {
        let name = token.trim_start_matches('@').to_ascii_lowercase();
        match name.as_str() {
            "audio" => Command::Audio,
            "pinned" => Command::Pinned,
            "url" => Command::Url,
            _ => Command::Unknown(name),
        }
    }
}

/// A raw query split into commands and residual search text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedQuery {
    pub commands: Vec<Command>,
    /// Query minus command tokens, trimmed
    pub residual: String,
}

impl ParsedQuery {
    pub fn parse(raw: &str) -> Self {
        let mut commands = Vec::new();
        let mut residual = String::with_capacity(raw.len());
        let mut cursor = 0;

        for m in COMMAND_TOKEN.find_iter(raw) {
            residual.push_str(&raw[cursor..m.start()]);
            commands.push(Command::from_token(m.as_str()));
            cursor = m.end();
        }
        residual.push_str(&raw[cursor..]);

        Self {
            commands,
            residual: residual.trim().to_string(),
        }
    }

    pub fn has(&self, command: &Command) -> bool {
        self.commands.contains(command)
    }

    pub fn has_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    pub fn has_text(&self) -> bool {
        !self.residual.is_empty()
    }

    /// Neither commands nor search text
    pub fn is_blank(&self) -> bool {
        !self.has_commands() && !self.has_text()
    }

    pub fn field(&self) -> SearchField {
        if self.has(&Command::Url) {
            SearchField::Url
        } else {
            SearchField::Title
        }
    }

    pub fn patterns(&self) -> Vec<&str> {
        split_patterns(&self.residual)
    }
}

/// Complete a trailing `@partial` to the first matching vocabulary entry.
///
/// Returns the new query, or `None` when the query does not end in a command
/// prefix or nothing in [`COMMAND_VOCABULARY`] starts with it.
pub fn complete_command(query: &str) -> Option<String> {
    let caps = TRAILING_PARTIAL_COMMAND.captures(query)?;
    let partial = caps.get(1)?;
    let prefix = partial.as_str().to_ascii_lowercase();
    let command = COMMAND_VOCABULARY
        .iter()
        .find(|name| name.starts_with(&prefix))?;

    Some(format!("{}{}", &query[..partial.start()], command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_query_has_no_commands() {
        let q = ParsedQuery::parse("  rust docs ");
        assert!(q.commands.is_empty());
        assert_eq!(q.residual, "rust docs");
        assert_eq!(q.patterns(), vec!["rust", "docs"]);
        assert_eq!(q.field(), SearchField::Title);
    }

    #[test]
    fn test_commands_are_stripped_from_residual() {
        let q = ParsedQuery::parse("@url github @Pinned issues");
        assert_eq!(q.commands, vec![Command::Url, Command::Pinned]);
        assert_eq!(q.residual, "github  issues");
        assert_eq!(q.patterns(), vec!["github", "issues"]);
        assert_eq!(q.field(), SearchField::Url);
    }

    #[test]
    fn test_command_matching_is_case_insensitive() {
        let q = ParsedQuery::parse("@AUDIO @Url");
        assert!(q.has(&Command::Audio));
        assert!(q.has(&Command::Url));
        assert!(!q.has_text());
    }

    #[test]
    fn test_unknown_command_is_stripped() {
        let q = ParsedQuery::parse("@bogus mail");
        assert_eq!(q.commands, vec![Command::Unknown("bogus".to_string())]);
        assert_eq!(q.residual, "mail");
    }

    #[test]
    fn test_mid_word_command_is_stripped() {
        let q = ParsedQuery::parse("rust@pinned");
        assert_eq!(q.commands, vec![Command::Pinned]);
        assert_eq!(q.residual, "rust");

        let q = ParsedQuery::parse("bob@example.com");
        assert_eq!(q.commands, vec![Command::Unknown("example".to_string())]);
        assert_eq!(q.residual, "bob.com");
    }

    #[test]
    fn test_bare_at_is_search_text() {
        let q = ParsedQuery::parse("@ home");
        assert!(q.commands.is_empty());
        assert_eq!(q.residual, "@ home");
    }

    #[test]
    fn test_blank_query() {
        assert!(ParsedQuery::parse("").is_blank());
        assert!(ParsedQuery::parse("   ").is_blank());
        assert!(!ParsedQuery::parse("@pinned").is_blank());
    }

    #[test]
    fn test_complete_partial_command() {
        assert_eq!(complete_command("yt @p").as_deref(), Some("yt @pinned"));
        assert_eq!(complete_command("@a").as_deref(), Some("@audio"));
        assert_eq!(complete_command("@U").as_deref(), Some("@url"));
    }

    #[test]
    fn test_complete_empty_partial_takes_first_entry() {
        assert_eq!(complete_command("@").as_deref(), Some("@pinned"));
        assert_eq!(complete_command("docs @").as_deref(), Some("docs @pinned"));
    }

    #[test]
    fn test_complete_without_candidate() {
        assert_eq!(complete_command("@zzz"), None);
        assert_eq!(complete_command("plain text"), None);
        assert_eq!(complete_command("@url docs"), None);
    }

    #[test]
    fn test_complete_mid_word_partial() {
        assert_eq!(complete_command("rust@p").as_deref(), Some("rust@pinned"));
    }
}
