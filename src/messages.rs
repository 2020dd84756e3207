//! User-visible text and label names.
//!
//! Every comment, check run title and label the bot writes comes from here.

/// Label applied by the stale sweep.
pub const STALE_LABEL: &str = "stale";

/// Label that opts a PR into the automated merge sweep.
pub const MERGE_LABEL: &str = "merge";

/// Default review comment for PRs opened with no description.
pub const EMPTY_DESCRIPTION_MESSAGE: &str = "There seems to be no description in your Pull Request.Please add an understanding of what this change proposes to do and why it is needed";

/// Posted when `/merge` is issued on a PR GitHub reports as unmergeable.
pub const UNMERGEABLE_MESSAGE: &str = "This Pull Request Can not be merge currently";

/// Watermark appended to every gif comment, as Giphy's terms require.
pub const GIPHY_WATERMARK_URL: &str =
    "https://raw.githubusercontent.com/Spazzy757/paul/main/web/src/assets/giphy-watermark.png";

pub fn cat_comment(url: &str) -> String {
    format!("My Most Trusted Minion\n\n ![my favorite minion]({})", url)
}

pub fn dog_comment(url: &str) -> String {
    format!(
        "Despite how it looks it is well trained\n\n ![loyal soldier]({})",
        url
    )
}

pub fn gif_comment(url: &str) -> String {
    format!(
        "![giphy]({})\n![giphy watermark]({})",
        url, GIPHY_WATERMARK_URL
    )
}

/// Posted on a PR closed because its author has too many open.
pub fn limit_exceeded_comment(author: &str, max_number: u32) -> String {
    format!(
        "Hi @{}, this Pull Request has been closed because you already have {} open Pull Request(s) against this branch, the maximum allowed in this repository. Please wait for those to be reviewed before opening another.",
        author, max_number
    )
}

pub mod dco {
    pub const CHECK_NAME: &str = "DeveloperCertificateOfOrigin";

    pub const PENDING_TITLE: &str = "Developer Certificate of Origin";
    pub const PENDING_SUMMARY: &str = "Checking Commits Are Signed";
    pub const PENDING_TEXT: &str = "Checking Developer Certificate of Origin";

    pub const FAILURE_TITLE: &str = "Unsigned commits";
    pub const FAILURE_SUMMARY: &str =
        "One or more of the commits in this Pull Request are not signed-off.";
    pub const FAILURE_TEXT: &str =
        "Thank you for your contribution, please make sure you have signed off all your commits";

    pub const SUCCESS_TITLE: &str = "Signed commits";
    pub const SUCCESS_SUMMARY: &str = "All of your commits are signed";
    pub const SUCCESS_TEXT: &str = "Thank you for the contribution, everything looks fine.";
}

pub mod verified {
    pub const CHECK_NAME: &str = "VerifiedCommits";

    pub const PENDING_TITLE: &str = "Verified Commits";
    pub const PENDING_SUMMARY: &str = "Checking Commits Are Verified";
    pub const PENDING_TEXT: &str = "Checking that every commit carries a verified signature";

    pub const FAILURE_TITLE: &str = "Unverified commits";
    pub const FAILURE_SUMMARY: &str =
        "One or more of the commits in this Pull Request are not verified.";
    pub const FAILURE_TEXT: &str =
        "Thank you for your contribution, please make sure all your commits are signed with a verified key";

    pub const SUCCESS_TITLE: &str = "Verified commits";
    pub const SUCCESS_SUMMARY: &str = "All of your commits are verified";
    pub const SUCCESS_TEXT: &str = "Thank you for the contribution, everything looks fine.";
}
