use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

/// Link schemes allowed through; anything else is replaced with `#`.
const SAFE_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Render model output (markdown) as HTML for the notes page.
///
/// CommonMark plus tables and strikethrough. Raw HTML in the input is
/// emitted as escaped text, never as markup, and link or image targets
/// with a scheme other than http, https or mailto are neutralized.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// Keep relative targets and allowed schemes, replace the rest with `#`.
fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let trimmed = url.trim_start_matches(|c: char| c.is_whitespace() || c.is_control());
    let scheme = trimmed
        .split_once(':')
        .map(|(head, _)| head)
        .filter(|head| !head.contains(['/', '?', '#']));

    let allowed = match scheme {
        None => true,
        Some(scheme) => SAFE_SCHEMES.iter().any(|safe| scheme.eq_ignore_ascii_case(safe)),
    };

    if allowed {
        url
    } else {
        CowStr::Borrowed("#")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_list() {
        let html = to_html("# Notes\n- fixed bug");
        assert!(html.contains("<h1>Notes</h1>"));
        assert!(html.contains("<li>fixed bug</li>"));
    }

    #[test]
    fn test_emphasis_and_links() {
        let html = to_html("**Checkout** now retries, see [PR](https://example.com/pr/1).");
        assert!(html.contains("<strong>Checkout</strong>"));
        assert!(html.contains(r#"<a href="https://example.com/pr/1">PR</a>"#));
    }

    #[test]
    fn test_tables_enabled() {
        let html = to_html("| Area | Change |\n|---|---|\n| API | faster |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>faster</td>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = to_html("Intro\n\n<script>alert(1)</script>\n\nand <b>inline</b> tags");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_script_urls_are_neutralized() {
        let html = to_html("[click](javascript:alert(document.cookie)) ![i](javascript:x) [d](Data:text/html,x) <vbscript:run>");
        assert!(!html.to_lowercase().contains("javascript:"));
        assert!(!html.to_lowercase().contains("data:"));
        assert!(!html.contains(r#"href="vbscript:"#));
        assert!(html.contains(r##"<a href="#">click</a>"##));
        assert!(html.contains(r##"<img src="#" alt="i" />"##));
    }

    #[test]
    fn test_safe_urls_are_kept() {
        let html = to_html("[a](https://example.com/x) [b](mailto:team@example.com) [c](/docs/notes.md) [d](#top) [e](HTTP://EXAMPLE.COM)");
        assert!(html.contains(r#"href="https://example.com/x""#));
        assert!(html.contains(r#"href="mailto:team@example.com""#));
        assert!(html.contains(r#"href="/docs/notes.md""#));
        assert!(html.contains(r##"href="#top""##));
        assert!(html.contains(r#"href="HTTP://EXAMPLE.COM""#));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_html(""), "");
    }
}
