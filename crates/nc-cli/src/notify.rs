//! End-of-run notification.
//!
//! [`platform_notifier`] picks a desktop notification on macOS (via
//! `osascript`) and a console message everywhere else.

use std::io::{self, Write};
use std::process::Command;

/// Title used for every notification.
pub const TITLE: &str = "Node Modules Cleaner";

/// Returns the completion message for a run.
#[must_use]
pub const fn completion_message(dry_run: bool) -> &'static str {
    if dry_run {
        "Dry run completed successfully!\nCheck the console for what would have been deleted."
    } else {
        "Node Modules Cleaner has completed successfully!\nCheck the console for detailed statistics."
    }
}

/// Tells the user a run has finished.
pub trait CompletionNotifier {
    /// Delivers one notification.
    fn notify(&mut self, title: &str, message: &str) -> io::Result<()>;
}

/// Writes the notification as text.
#[derive(Debug)]
pub struct ConsoleNotifier<W> {
    out: W,
}

impl<W: Write> ConsoleNotifier<W> {
    /// Creates a notifier writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> CompletionNotifier for ConsoleNotifier<W> {
    fn notify(&mut self, title: &str, message: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "{message}")?;
        self.out.flush()
    }
}

/// Shows a macOS notification followed by a dialog.
#[derive(Debug, Default)]
pub struct MacNotifier;

impl CompletionNotifier for MacNotifier {
    fn notify(&mut self, title: &str, message: &str) -> io::Result<()> {
        let title = applescript_string(title);
        let message = applescript_string(message);

        let scripts = [
            format!(r#"display notification {message} with title {title} sound name "Glass""#),
            format!(
                r#"display dialog {message} with title {title} buttons {{"OK"}} default button "OK" with icon note"#
            ),
        ];

        for script in &scripts {
            let status = Command::new("osascript").arg("-e").arg(script).status()?;
            if !status.success() {
                return Err(io::Error::other(format!("osascript exited with {status}")));
            }
        }
        Ok(())
    }
}

/// Quotes `s` as an AppleScript string literal.
fn applescript_string(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Returns the notifier for the current platform.
#[must_use]
pub fn platform_notifier() -> Box<dyn CompletionNotifier> {
    if cfg!(target_os = "macos") {
        Box::new(MacNotifier)
    } else {
        Box::new(ConsoleNotifier::new(io::stdout()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_message_differs_by_mode() {
        assert!(completion_message(true).starts_with("Dry run completed"));
        assert!(completion_message(false).starts_with("Node Modules Cleaner has completed"));
        assert_ne!(completion_message(true), completion_message(false));
    }

    #[test]
    fn test_console_notifier_output() {
        let mut notifier = ConsoleNotifier::new(Vec::new());
        notifier.notify(TITLE, completion_message(true)).unwrap();

        let text = String::from_utf8(notifier.out).unwrap();
        assert_eq!(
            text,
            "\nNode Modules Cleaner\nDry run completed successfully!\n\
             Check the console for what would have been deleted.\n"
        );
    }

    #[test]
    fn test_applescript_string_escaping() {
        assert_eq!(applescript_string("plain"), "\"plain\"");
        assert_eq!(applescript_string("a \"b\""), "\"a \\\"b\\\"\"");
        assert_eq!(applescript_string("one\ntwo"), "\"one\\ntwo\"");
        assert_eq!(applescript_string("c:\\x"), "\"c:\\\\x\"");
    }
}
