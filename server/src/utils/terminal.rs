//! Terminal output helpers for the startup banner

/// Banner label column width
const LABEL_WIDTH: usize = 10;

/// Format a URL as a clickable terminal hyperlink if supported.
///
/// Uses OSC 8 escape sequences where the terminal supports them and falls
/// back to plain cyan text elsewhere.
pub fn terminal_link(url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        format!("\x1b]8;;{}\x07\x1b[36m{}\x1b[0m\x1b]8;;\x07", url, url)
    } else {
        format!("\x1b[36m{}\x1b[0m", url)
    }
}

/// Banner row with a bold label and a link
pub fn link_line(label: &str, url: &str) -> String {
    format!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<LABEL_WIDTH$}\x1b[0m {}",
        label,
        terminal_link(url)
    )
}

/// Greyed-out banner row for secondary information
pub fn dim_line(label: &str, value: &str) -> String {
    format!("  \x1b[90m➜  {:<LABEL_WIDTH$} {}\x1b[0m", label, value)
}
