//! Slash-command types.

use serde::{Deserialize, Serialize};

/// A slash-command as written in a comment: `/name arg1 arg2 ...`.
///
/// A comment that is not a command parses to an empty name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    pub fn kind(&self) -> CommandKind {
        CommandKind::from_name(&self.name)
    }
}

/// The commands the dispatcher knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// `/cat`
    Cat,
    /// `/dog`
    Dog,
    /// `/gif <query...>`
    Gif,
    /// `/label <text...>`
    Label,
    /// `/remove-label <label>`
    RemoveLabel,
    /// `/approve`
    Approve,
    /// `/merge`
    Merge,
    /// `/assign <user...>`
    Assign,
    /// Anything else, including the empty name.
    Unknown,
}

impl CommandKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "cat" => CommandKind::Cat,
            "dog" => CommandKind::Dog,
            "gif" => CommandKind::Gif,
            "label" => CommandKind::Label,
            "remove-label" => CommandKind::RemoveLabel,
            "approve" => CommandKind::Approve,
            "merge" => CommandKind::Merge,
            "assign" => CommandKind::Assign,
            _ => CommandKind::Unknown,
        }
    }
}
