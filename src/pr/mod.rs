pub mod clean;
pub mod types;

pub use clean::clean_description;
pub use types::{details_text, FilterCriteria, PullRequestRecord};

use reqwest::{StatusCode, Url};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::AzureConfig;
use types::PullRequestList;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Azure answered with something other than 200. Body is kept verbatim.
    #[error("Status code: {status}. Response: {body}")]
    Status { status: u16, body: String },

    #[error("Azure DevOps request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid Azure DevOps URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to parse pull request list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Build the pull request list endpoint for a repository.
///
/// Path segments come from user input and are percent-encoded; a base URL
/// with its own path (on-prem collections) is kept as a prefix.
pub fn pull_requests_url(config: &AzureConfig, criteria: &FilterCriteria) -> Result<Url, FetchError> {
    let base = config.base_url();
    let mut url = Url::parse(base).map_err(|_| FetchError::InvalidUrl(base.to_string()))?;

    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend([
            criteria.organization.as_str(),
            criteria.project.as_str(),
            "_apis",
            "git",
            "repositories",
            criteria.repository.as_str(),
            "pullrequests",
        ]);
    url.query_pairs_mut()
        .append_pair("api-version", &config.api_version);

    Ok(url)
}

/// Fetch completed pull requests merged into the target branch since the
/// given date, with descriptions cleaned.
///
/// One GET, no retry. Anything but 200 comes back as `FetchError::Status`
/// carrying the raw response body.
#[instrument(
    skip(client, config, criteria),
    fields(
        organization = %criteria.organization,
        project = %criteria.project,
        repository = %criteria.repository,
    )
)]
pub async fn fetch_pull_requests(
    client: &reqwest::Client,
    config: &AzureConfig,
    criteria: &FilterCriteria,
) -> Result<Vec<PullRequestRecord>, FetchError> {
    let url = pull_requests_url(config, criteria)?;

    debug!(url = %url, branch = %criteria.target_branch, since = %criteria.since_date, "requesting pull requests");
    let response = client
        .get(url)
        .header("Content-Type", "application/json")
        .basic_auth("", Some(&criteria.access_token))
        .query(&[
            ("searchCriteria.status", "completed"),
            ("searchCriteria.targetRefName", criteria.target_branch.as_str()),
            ("searchCriteria.creationDate", criteria.since_date.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    debug!(status = status.as_u16(), body_bytes = body.len(), "received pull request response");

    if status != StatusCode::OK {
        return Err(FetchError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let list: PullRequestList = serde_json::from_str(&body)?;
    let records: Vec<PullRequestRecord> = list
        .value
        .into_iter()
        .map(|raw| PullRequestRecord {
            description: clean_description(raw.description.as_deref()),
            title: raw.title,
            url: raw.url,
        })
        .collect();
    debug!(pull_requests = records.len(), "cleaned pull request descriptions");

    Ok(records)
}
