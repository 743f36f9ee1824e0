//! Chat command parsing and dispatch.
//!
//! The host transport receives messages, checks the operator and sends
//! replies; this module only turns command text into a reply string.

use crate::station::DownloadStation;

/// Reply for commands other than `/download` and `/status`
pub const UNKNOWN_COMMAND: &str = "Unknown command. Use /download <link> or /status.";

/// A recognised chat command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `/download <link>`; the link may be empty
    Download(String),
    /// `/status`
    Status,
    /// Any other slash command, by name
    Unknown(String),
}

impl Command {
    /// Parse a chat message. Returns `None` for text that is not a command.
    ///
    /// A `@botname` suffix on the command word is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use ds_relay::Command;
    ///
    /// assert_eq!(
    ///     Command::parse("/download https://example.com/a.iso"),
    ///     Some(Command::Download("https://example.com/a.iso".into()))
    /// );
    /// assert_eq!(Command::parse("/status@my_bot"), Some(Command::Status));
    /// assert_eq!(Command::parse("hello"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim().strip_prefix('/')?;
        let (word, args) = match rest.split_once(char::is_whitespace) {
            Some((word, args)) => (word, args.trim()),
            None => (rest, ""),
        };
        let name = word.split_once('@').map_or(word, |(name, _)| name);

        Some(match name.to_ascii_lowercase().as_str() {
            "download" => Command::Download(args.to_string()),
            "status" => Command::Status,
            _ => Command::Unknown(name.to_string()),
        })
    }
}

impl DownloadStation {
    /// Run `command` and return the reply text.
    pub async fn dispatch(&self, command: Command) -> String {
        match command {
            Command::Download(link) => self.submit_message(&link).await,
            Command::Status => self.report().await,
            Command::Unknown(name) => {
                tracing::debug!(command = %name, "unknown command");
                UNKNOWN_COMMAND.to_string()
            }
        }
    }
}
