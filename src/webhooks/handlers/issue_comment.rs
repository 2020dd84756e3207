//! Handler for `issue_comment` webhook events.
//!
//! Parses the comment for a slash-command and runs it if the repository's
//! policy allows it for the comment's author.
//!
//! | Command | Requires |
//! |---------|----------|
//! | `/cat`, `/dog` | `cats_enabled` / `dogs_enabled` |
//! | `/gif <query...>` | `giphy_enabled` |
//! | `/label <text...>` | `labels`, maintainer |
//! | `/remove-label <label>` | `labels`, maintainer, exactly one argument |
//! | `/approve` | `allow_approval`, maintainer, PR |
//! | `/merge` | maintainer, PR |
//! | `/assign <user...>` | `assign`, maintainer, PR |
//!
//! Anything that does not meet its requirements is ignored without error.

use tracing::{debug, info, instrument};

use crate::checks::merge::{MergeOutcome, merge_if_mergeable};
use crate::commands::{Command, CommandKind, parse_command};
use crate::config::PolicyConfig;
use crate::fun::MediaOps;
use crate::github::GitHubOps;
use crate::messages::{UNMERGEABLE_MESSAGE, cat_comment, dog_comment, gif_comment};
use crate::types::ReviewEvent;
use crate::webhooks::events::{CommentAction, IssueCommentEvent};

use super::HandlerError;

/// Handles an issue comment event. Returns the command that was run, if any.
#[instrument(skip_all, fields(repo = %event.repo, issue = %event.number))]
pub async fn handle_issue_comment<C: GitHubOps, M: MediaOps>(
    client: &C,
    media: &M,
    config: &PolicyConfig,
    event: &IssueCommentEvent,
) -> Result<Option<CommandKind>, HandlerError> {
    if event.action != CommentAction::Created {
        return Ok(None);
    }

    let command = parse_command(&event.body);
    if command.is_empty() {
        return Ok(None);
    }

    let kind = command.kind();
    if !is_allowed(kind, &command, config, event) {
        debug!(command = %command.name, author = %event.author, "Command not allowed");
        return Ok(None);
    }

    run(client, media, kind, &command, event).await?;
    info!(command = %command.name, author = %event.author, "Ran command");
    Ok(Some(kind))
}

/// Whether `command` may run for this event under `config`.
fn is_allowed(
    kind: CommandKind,
    command: &Command,
    config: &PolicyConfig,
    event: &IssueCommentEvent,
) -> bool {
    let prs = &config.pull_requests;
    let maintainer = config.is_maintainer(&event.author);
    match kind {
        CommandKind::Cat => prs.cats_enabled,
        CommandKind::Dog => prs.dogs_enabled,
        CommandKind::Gif => prs.giphy_enabled,
        CommandKind::Label => config.labels_enabled && maintainer && !command.args.is_empty(),
        CommandKind::RemoveLabel => {
            config.labels_enabled && maintainer && command.args.len() == 1
        }
        CommandKind::Approve => prs.allow_approval && maintainer && event.is_pull_request,
        CommandKind::Merge => maintainer && event.is_pull_request,
        CommandKind::Assign => {
            prs.assign && maintainer && event.is_pull_request && !command.args.is_empty()
        }
        CommandKind::Unknown => false,
    }
}

async fn run<C: GitHubOps, M: MediaOps>(
    client: &C,
    media: &M,
    kind: CommandKind,
    command: &Command,
    event: &IssueCommentEvent,
) -> Result<(), HandlerError> {
    let number = event.number;
    match kind {
        CommandKind::Cat => {
            let url = media.random_cat().await?;
            client.create_comment(number, &cat_comment(&url)).await?;
        }
        CommandKind::Dog => {
            let url = media.random_dog().await?;
            client.create_comment(number, &dog_comment(&url)).await?;
        }
        CommandKind::Gif => {
            let url = media.random_gif(&command.args.join(" ")).await?;
            client.create_comment(number, &gif_comment(&url)).await?;
        }
        CommandKind::Label => {
            client
                .add_labels(number, &[command.args.join(" ")])
                .await?;
        }
        CommandKind::RemoveLabel => {
            if let [label] = command.args.as_slice() {
                client.remove_label(number, label).await?;
            }
        }
        CommandKind::Approve => {
            client
                .create_review(number, ReviewEvent::Approve, None)
                .await?;
        }
        CommandKind::Merge => {
            if merge_if_mergeable(client, number).await? == MergeOutcome::NotMergeable {
                client.create_comment(number, UNMERGEABLE_MESSAGE).await?;
            }
        }
        CommandKind::Assign => {
            client.request_reviewers(number, &command.args).await?;
        }
        CommandKind::Unknown => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeGitHub, FakeMedia, pull};
    use crate::types::{MergeMethod, PrNumber, RepoId};

    fn comment(body: &str, author: &str, on_pr: bool) -> IssueCommentEvent {
        IssueCommentEvent {
            repo: RepoId::new("octocat", "hello-world"),
            default_branch: "main".into(),
            installation: None,
            action: CommentAction::Created,
            number: PrNumber(4),
            is_pull_request: on_pr,
            body: body.into(),
            author: author.into(),
        }
    }

    fn config() -> PolicyConfig {
        PolicyConfig::from_yaml(
            br#"
maintainers: [octocat]
labels: true
pull_requests:
  allow_approval: true
  assign: true
  cats_enabled: true
  dogs_enabled: true
  giphy_enabled: true
"#,
        )
        .unwrap()
    }

    async fn run_comment(
        fake: &FakeGitHub,
        media: &FakeMedia,
        config: &PolicyConfig,
        event: &IssueCommentEvent,
    ) -> Option<CommandKind> {
        handle_issue_comment(fake, media, config, event)
            .await
            .unwrap()
    }

    /// Runs `body` under [`config`] with a working media fake.
    async fn say(fake: &FakeGitHub, body: &str, author: &str, on_pr: bool) -> Option<CommandKind> {
        run_comment(fake, &FakeMedia::new(), &config(), &comment(body, author, on_pr)).await
    }

    // ─── Fun commands ───

    #[tokio::test]
    async fn cat_posts_picture() {
        let fake = FakeGitHub::new();
        let ran = say(&fake, "/cat", "anyone", false).await;

        assert_eq!(ran, Some(CommandKind::Cat));
        assert_eq!(
            fake.comments(),
            vec![(
                PrNumber(4),
                cat_comment("https://cdn2.thecatapi.com/images/cat.jpg")
            )]
        );
    }

    #[tokio::test]
    async fn dog_disabled_is_ignored() {
        let fake = FakeGitHub::new();
        let ran = run_comment(
            &fake,
            &FakeMedia::new(),
            &PolicyConfig::default(),
            &comment("/dog", "anyone", false),
        )
        .await;

        assert_eq!(ran, None);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn gif_joins_query_and_adds_watermark() {
        let fake = FakeGitHub::new();
        let media = FakeMedia::new();
        let event = comment("/gif happy dance", "anyone", true);
        run_comment(&fake, &media, &config(), &event).await;

        assert_eq!(media.gif_queries(), vec!["happy dance".to_string()]);
        assert_eq!(
            fake.comments()[0].1,
            gif_comment("https://media.giphy.com/media/abc/giphy.gif")
        );
    }

    #[tokio::test]
    async fn media_failure_is_an_error() {
        let fake = FakeGitHub::new();
        let result = handle_issue_comment(
            &fake,
            &FakeMedia::failing(),
            &config(),
            &comment("/cat", "anyone", false),
        )
        .await;

        assert!(matches!(result, Err(HandlerError::Media(_))));
        assert!(fake.comments().is_empty());
    }

    // ─── Labels ───

    #[tokio::test]
    async fn label_joins_arguments_into_one_label() {
        let fake = FakeGitHub::new();
        say(&fake, "/label good first issue", "octocat", false).await;

        assert_eq!(
            fake.labels_added(),
            vec![(PrNumber(4), vec!["good first issue".to_string()])]
        );
    }

    #[tokio::test]
    async fn label_by_non_maintainer_is_ignored() {
        let fake = FakeGitHub::new();
        let ran = say(&fake, "/label bug", "stranger", false).await;

        assert_eq!(ran, None);
        assert!(fake.writes().is_empty());
    }

    #[tokio::test]
    async fn remove_label_needs_exactly_one_argument() {
        let fake = FakeGitHub::new();

        say(&fake, "/remove-label good first", "octocat", false).await;
        assert!(fake.labels_removed().is_empty());

        say(&fake, "/remove-label bug", "octocat", false).await;
        assert_eq!(fake.labels_removed(), vec![(PrNumber(4), "bug".to_string())]);
    }

    // ─── Pull request commands ───

    #[tokio::test]
    async fn approve_submits_approval() {
        let fake = FakeGitHub::new();
        say(&fake, "/approve", "octocat", true).await;

        assert_eq!(
            fake.reviews(),
            vec![(PrNumber(4), ReviewEvent::Approve, None)]
        );
    }

    #[tokio::test]
    async fn approve_on_plain_issue_is_ignored() {
        let fake = FakeGitHub::new();
        let ran = say(&fake, "/approve", "octocat", false).await;

        assert_eq!(ran, None);
        assert!(fake.reviews().is_empty());
    }

    #[tokio::test]
    async fn approve_by_non_maintainer_is_ignored() {
        let fake = FakeGitHub::new();
        let ran = say(&fake, "/approve", "stranger", true).await;

        assert_eq!(ran, None);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn merge_by_non_maintainer_is_ignored() {
        let fake = FakeGitHub::new();
        let mut pr = pull(4, "contributor");
        pr.mergeable = Some(true);
        fake.add_pull(pr);

        let ran = say(&fake, "/merge", "stranger", true).await;

        assert_eq!(ran, None);
        assert!(fake.calls().is_empty());
        assert!(fake.merged().is_empty());
    }

    #[tokio::test]
    async fn merge_when_mergeable() {
        let fake = FakeGitHub::new();
        let mut pr = pull(4, "contributor");
        pr.mergeable = Some(true);
        fake.add_pull(pr);

        let config = PolicyConfig {
            maintainers: ["octocat".to_string()].into(),
            ..PolicyConfig::default()
        };
        run_comment(&fake, &FakeMedia::new(), &config, &comment("/merge", "octocat", true)).await;

        assert_eq!(fake.merged(), vec![(PrNumber(4), MergeMethod::Merge)]);
        assert!(fake.comments().is_empty());
    }

    #[tokio::test]
    async fn unmergeable_gets_a_comment_not_an_error() {
        let fake = FakeGitHub::new();
        let mut pr = pull(4, "contributor");
        pr.mergeable = Some(false);
        fake.add_pull(pr);

        let ran = say(&fake, "/merge", "octocat", true).await;

        assert_eq!(ran, Some(CommandKind::Merge));
        assert!(fake.merged().is_empty());
        assert_eq!(
            fake.comments(),
            vec![(PrNumber(4), UNMERGEABLE_MESSAGE.to_string())]
        );
    }

    #[tokio::test]
    async fn merge_fetch_failure_is_an_error() {
        let fake = FakeGitHub::new();
        fake.fail("get_pull_request");

        let result = handle_issue_comment(
            &fake,
            &FakeMedia::new(),
            &config(),
            &comment("/merge", "octocat", true),
        )
        .await;
        assert!(matches!(result, Err(HandlerError::GitHub(_))));
    }

    #[tokio::test]
    async fn assign_requests_reviewers() {
        let fake = FakeGitHub::new();
        say(&fake, "/assign alice bob", "octocat", true).await;

        assert_eq!(
            fake.reviewers_requested(),
            vec![(PrNumber(4), vec!["alice".to_string(), "bob".to_string()])]
        );
    }

    #[tokio::test]
    async fn assign_without_users_is_ignored() {
        let fake = FakeGitHub::new();
        let ran = say(&fake, "/assign", "octocat", true).await;
        assert_eq!(ran, None);
    }

    // ─── Ignored input ───

    #[tokio::test]
    async fn edited_comments_are_ignored() {
        let fake = FakeGitHub::new();
        let mut event = comment("/cat", "anyone", false);
        event.action = CommentAction::Edited;

        assert_eq!(run_comment(&fake, &FakeMedia::new(), &config(), &event).await, None);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn plain_and_unknown_comments_are_ignored() {
        let fake = FakeGitHub::new();
        let media = FakeMedia::new();
        for body in ["LGTM", "/deploy prod", "/", "/CAT"] {
            assert_eq!(
                run_comment(&fake, &media, &config(), &comment(body, "octocat", true)).await,
                None,
                "{body}"
            );
        }
        assert!(fake.calls().is_empty());
    }
}
