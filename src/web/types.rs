use serde::Deserialize;
use thiserror::Error;

use crate::pr::FilterCriteria;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Missing form field: {0}")]
    MissingField(&'static str),
}

/// Fields posted by the index form. Names match the HTML inputs.
#[derive(Debug, Default, Deserialize)]
pub struct IndexForm {
    pub organization: Option<String>,
    pub project: Option<String>,
    pub repository: Option<String>,
    pub pat: Option<String>,
    pub main_branch: Option<String>,
    pub date_filter: Option<String>,
    pub openai_api_key: Option<String>,
}

/// Fields posted by the generation form on the results page.
#[derive(Debug, Default, Deserialize)]
pub struct NotesForm {
    pub pr_details: Option<String>,
    pub openai_api_key: Option<String>,
}

/// A validated index submission.
pub struct FetchRequest {
    pub criteria: FilterCriteria,
    /// Carried through to the results page for the generation step.
    pub api_key: String,
}

/// A validated generation submission.
pub struct NotesRequest {
    pub pr_details: String,
    pub api_key: String,
}

impl std::fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchRequest")
            .field("criteria", &self.criteria)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for NotesRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotesRequest")
            .field("pr_details_bytes", &self.pr_details.len())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Present in the submission. Empty values are passed on as-is.
fn required(value: Option<String>, name: &'static str) -> Result<String, FormError> {
    value.ok_or(FormError::MissingField(name))
}

impl TryFrom<IndexForm> for FetchRequest {
    type Error = FormError;

    fn try_from(form: IndexForm) -> Result<Self, Self::Error> {
        Ok(FetchRequest {
            criteria: FilterCriteria {
                organization: required(form.organization, "organization")?,
                project: required(form.project, "project")?,
                repository: required(form.repository, "repository")?,
                access_token: required(form.pat, "pat")?,
                target_branch: required(form.main_branch, "main_branch")?,
                since_date: required(form.date_filter, "date_filter")?,
            },
            api_key: required(form.openai_api_key, "openai_api_key")?,
        })
    }
}

impl TryFrom<NotesForm> for NotesRequest {
    type Error = FormError;

    fn try_from(form: NotesForm) -> Result<Self, Self::Error> {
        Ok(NotesRequest {
            pr_details: required(form.pr_details, "pr_details")?,
            api_key: required(form.openai_api_key, "openai_api_key")?,
        })
    }
}
