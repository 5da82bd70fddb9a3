//! Request handlers, independent of the HTTP framework.
//!
//! Each takes the shared [`AppContext`] and a decoded form and returns a
//! [`Page`]. Nothing is kept between calls.

use std::sync::Arc;
use tracing::{info, warn};

use super::templates::{TemplateError, Templates};
use super::types::{FetchRequest, IndexForm, NotesForm, NotesRequest};
use crate::config::Config;
use crate::notes::{self, ChatCompletion, OpenAiClient};
use crate::pr::{self, FetchError};

/// What a handler hands back to the hosting layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Html(String),
    Text { status: u16, body: String },
}

impl Page {
    fn bad_request(body: impl ToString) -> Self {
        Page::Text {
            status: 400,
            body: body.to_string(),
        }
    }

    fn bad_gateway(body: String) -> Self {
        Page::Text { status: 502, body }
    }

    fn rendered(result: Result<String, TemplateError>) -> Self {
        match result {
            Ok(html) => Page::Html(html),
            Err(err) => {
                warn!(error = %err, "template rendering failed");
                Page::Text {
                    status: 500,
                    body: err.to_string(),
                }
            }
        }
    }
}

/// Immutable state shared by every request.
pub struct AppContext {
    pub config: Config,
    pub http: reqwest::Client,
    pub completion: Arc<dyn ChatCompletion>,
    pub templates: Templates,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self, TemplateError> {
        let http = reqwest::Client::new();
        let completion = Arc::new(OpenAiClient::new(http.clone(), &config.openai));
        Ok(Self {
            config,
            http,
            completion,
            templates: Templates::new()?,
        })
    }

    #[cfg(test)]
    pub fn with_completion(mut self, completion: Arc<dyn ChatCompletion>) -> Self {
        self.completion = completion;
        self
    }
}

/// `GET /`
pub fn index(ctx: &AppContext) -> Page {
    Page::rendered(ctx.templates.index())
}

/// `POST /`: fetch, clean and list pull requests.
pub async fn fetch(ctx: &AppContext, form: IndexForm) -> Page {
    let request = match FetchRequest::try_from(form) {
        Ok(request) => request,
        Err(err) => return Page::bad_request(err),
    };

    match pr::fetch_pull_requests(&ctx.http, &ctx.config.azure, &request.criteria).await {
        Ok(records) => {
            info!(pull_requests = records.len(), "rendering pull request list");
            Page::rendered(ctx.templates.results(&records, &request.api_key))
        }
        Err(err) => {
            if let FetchError::Status { status, .. } = &err {
                warn!(status, "pull request fetch rejected");
            } else {
                warn!(error = %err, "pull request fetch failed");
            }
            Page::bad_gateway(format!("Failed to retrieve data. {err}"))
        }
    }
}

/// `POST /release_notes`: ask the model and show its notes.
pub async fn release_notes(ctx: &AppContext, form: NotesForm) -> Page {
    let request = match NotesRequest::try_from(form) {
        Ok(request) => request,
        Err(err) => return Page::bad_request(err),
    };

    match notes::generate_release_notes(
        ctx.completion.as_ref(),
        &ctx.config.openai.system_prompt,
        &request.api_key,
        &request.pr_details,
    )
    .await
    {
        Ok(html) => {
            info!(html_bytes = html.len(), "rendering release notes");
            Page::rendered(ctx.templates.release_notes(&html))
        }
        Err(err) => {
            warn!(error = %err, "release note generation failed");
            Page::bad_gateway(format!("Failed to generate release notes: {err}"))
        }
    }
}
