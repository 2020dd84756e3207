//! Slash-commands issued in issue and pull request comments.
//!
//! # Supported Commands
//!
//! - `/cat`, `/dog` - post a random animal picture
//! - `/gif <query...>` - post a random gif matching the query
//! - `/label <text...>` - add one label made of the joined arguments
//! - `/remove-label <label>` - remove a label
//! - `/approve` - approve the pull request
//! - `/merge` - merge the pull request if GitHub says it can be merged
//! - `/assign <user...>` - request reviews from the listed users
//!
//! Which commands are honoured, and for whom, is decided by the repository's
//! policy; see [`crate::webhooks::handlers`].
//!
//! # Example
//!
//! ```
//! use paul::commands::{parse_command, CommandKind};
//!
//! let cmd = parse_command("/gif happy dance");
//! assert_eq!(cmd.kind(), CommandKind::Gif);
//! assert_eq!(cmd.args.join(" "), "happy dance");
//! ```

mod parser;
mod types;

pub use parser::parse_command;
pub use types::{Command, CommandKind};
