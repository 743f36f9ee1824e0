//! Text formatting helpers for chat output

/// Characters with a meaning in Telegram MarkdownV2; each is escaped with `\`.
pub const MARKDOWN_RESERVED: [char; 19] = [
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.',
    '!',
];

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Escape every MarkdownV2 reserved character in `text`.
///
/// # Examples
///
/// ```
/// use ds_relay::utils::escape_markdown;
///
/// assert_eq!(escape_markdown("a_b (1).mkv"), r"a\_b \(1\)\.mkv");
/// assert_eq!(escape_markdown("plain"), "plain");
/// ```
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Bytes as binary megabytes with two decimals, e.g. `"50.00 MB"`.
#[must_use]
pub fn format_mebibytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MIB)
}
