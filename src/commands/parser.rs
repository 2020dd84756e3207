//! Parser for slash-commands in comment text.

use super::types::Command;

/// Parses a comment body into a [`Command`].
///
/// # Parsing Rules
///
/// - The body must start with `/`; anything else is the empty command
/// - Only the first line is considered
/// - The name is the first whitespace-separated token after `/`
/// - The remaining tokens are the arguments, in order
///
/// # Examples
///
/// ```
/// use paul::commands::parse_command;
///
/// let cmd = parse_command("/label good first issue");
/// assert_eq!(cmd.name, "label");
/// assert_eq!(cmd.args, vec!["good", "first", "issue"]);
///
/// let cmd = parse_command("not a command");
/// assert!(cmd.is_empty());
/// assert!(cmd.args.is_empty());
/// ```
pub fn parse_command(body: &str) -> Command {
    let Some(rest) = body.strip_prefix('/') else {
        return Command::default();
    };

    let line = rest.lines().next().unwrap_or_default();
    let mut tokens = line.split_whitespace();

    // "/" followed by whitespace has no name; its "arguments" are not a command either.
    let Some(name) = tokens.next().filter(|_| !line.starts_with(char::is_whitespace)) else {
        return Command::default();
    };

    Command {
        name: name.to_string(),
        args: tokens.map(str::to_string).collect(),
    }
}
