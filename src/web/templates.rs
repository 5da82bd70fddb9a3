use tera::{Context, Tera};
use thiserror::Error;

use crate::pr::{details_text, PullRequestRecord};

const BASE: &str = include_str!("../../templates/base.html");
const INDEX: &str = include_str!("../../templates/index.html");
const RESULTS: &str = include_str!("../../templates/results.html");
const RELEASE_NOTES: &str = include_str!("../../templates/release_notes.html");

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to render page: {0}")]
    Render(#[from] tera::Error),
}

/// The three pages, compiled once at startup. `.html` names keep tera's
/// autoescaping on; only the generated notes are inserted unescaped.
#[derive(Debug, Clone)]
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE),
            ("index.html", INDEX),
            ("results.html", RESULTS),
            ("release_notes.html", RELEASE_NOTES),
        ])?;
        Ok(Self { tera })
    }

    pub fn index(&self) -> Result<String, TemplateError> {
        Ok(self.tera.render("index.html", &Context::new())?)
    }

    /// PR list plus the generation form, pre-filled with the records' text.
    pub fn results(
        &self,
        records: &[PullRequestRecord],
        api_key: &str,
    ) -> Result<String, TemplateError> {
        let mut context = Context::new();
        context.insert("pull_requests", records);
        context.insert("pr_details", &details_text(records));
        context.insert("openai_api_key", api_key);
        Ok(self.tera.render("results.html", &context)?)
    }

    /// `notes_html` must already be sanitized HTML.
    pub fn release_notes(&self, notes_html: &str) -> Result<String, TemplateError> {
        let mut context = Context::new();
        context.insert("release_notes", notes_html);
        Ok(self.tera.render("release_notes.html", &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, description: &str) -> PullRequestRecord {
        PullRequestRecord {
            title: title.to_string(),
            description: description.to_string(),
            url: format!("https://dev.azure.com/pr/{title}"),
        }
    }

    #[test]
    fn test_index_has_every_field() {
        let html = Templates::new().unwrap().index().unwrap();
        for field in [
            "organization",
            "project",
            "repository",
            "pat",
            "main_branch",
            "date_filter",
            "openai_api_key",
        ] {
            assert!(html.contains(&format!(r#"name="{field}""#)), "missing {field}");
        }
    }

    #[test]
    fn test_results_lists_records_and_prefills_form() {
        let records = vec![record("Alpha", "Adds alpha"), record("Beta", "")];
        let html = Templates::new().unwrap().results(&records, "sk-abc").unwrap();
        assert!(html.contains("2 pull requests found."));
        assert!(html.contains("<strong>Alpha</strong>"));
        assert!(html.contains("<pre>Adds alpha</pre>"));
        assert!(html.contains("Title: Beta"));
        assert!(html.contains(r#"name="openai_api_key" value="sk-abc""#));
        assert!(html.contains(r#"action="/release_notes""#));
    }

    #[test]
    fn test_results_escapes_descriptions() {
        let records = vec![record("X", "<img src=x onerror=alert(1)>")];
        let html = Templates::new().unwrap().results(&records, "k").unwrap();
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img"));
    }

    #[test]
    fn test_results_empty() {
        let html = Templates::new().unwrap().results(&[], "k").unwrap();
        assert!(html.contains("No pull requests matched."));
    }

    #[test]
    fn test_release_notes_inserted_unescaped() {
        let html = Templates::new()
            .unwrap()
            .release_notes("<h1>Notes</h1>\n<ul>\n<li>fixed bug</li>\n</ul>\n")
            .unwrap();
        assert!(html.contains("<h1>Notes</h1>"));
        assert!(html.contains("<li>fixed bug</li>"));
    }
}
