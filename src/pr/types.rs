use serde::{Deserialize, Serialize};

/// A completed pull request, ready to show on the results page.
/// Built by the fetcher; `description` has already been cleaned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRecord {
    pub title: String,
    pub description: String,
    pub url: String,
}

impl PullRequestRecord {
    /// Plain-text block handed to the completion model for this record.
    pub fn details_text(&self) -> String {
        format!(
            "Title: {}\nDescription: {}\nURL: {}",
            self.title, self.description, self.url
        )
    }
}

/// Join records into the text that pre-fills the generation form.
pub fn details_text(records: &[PullRequestRecord]) -> String {
    records
        .iter()
        .map(PullRequestRecord::details_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Which pull requests to fetch and how to authenticate.
#[derive(Clone)]
pub struct FilterCriteria {
    pub organization: String,
    pub project: String,
    pub repository: String,
    /// Personal access token, sent as the Basic auth password.
    pub access_token: String,
    /// Full ref name, e.g. `refs/heads/main`.
    pub target_branch: String,
    pub since_date: String,
}

impl std::fmt::Debug for FilterCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterCriteria")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("repository", &self.repository)
            .field("access_token", &"<redacted>")
            .field("target_branch", &self.target_branch)
            .field("since_date", &self.since_date)
            .finish()
    }
}

/// Body of the Azure DevOps pull request list endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PullRequestList {
    #[serde(default)]
    pub value: Vec<RawPullRequest>,
}

/// One entry of `value`. Azure omits `description` on pull requests
/// created without one.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPullRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
}
