use regex::Regex;
use std::sync::LazyLock;

/// Boilerplate sections that run to the end of a description once they start.
/// Matched literally and case-sensitively anywhere in the text, in this order.
const SECTION_MARKERS: [&str; 5] = [
    "Tested on:",
    "Testing proof:",
    "Tests:",
    "Testing:",
    "Note for Reviewer:",
];

static SECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SECTION_MARKERS
        .iter()
        .map(|marker| {
            Regex::new(&format!("(?s){}.*", regex::escape(marker))).expect("valid section pattern")
        })
        .collect()
});

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n+").expect("valid blank-line pattern"));

/// Strip review boilerplate from a pull request description.
///
/// Absent or empty input yields an empty string. Steps:
/// 1. drop every literal `---`
/// 2. cut each marker section from its first occurrence to the end of the text
/// 3. collapse runs of blank lines into a single newline
/// 4. trim surrounding whitespace
///
/// `---` goes first so that removing it can never splice a new marker
/// together, which keeps the function idempotent.
pub fn clean_description(description: Option<&str>) -> String {
    let description = match description {
        Some(text) if !text.is_empty() => text,
        _ => return String::new(),
    };

    let mut cleaned = description.replace("---", "");
    for pattern in SECTION_PATTERNS.iter() {
        if let Some(found) = pattern.find(&cleaned) {
            cleaned.truncate(found.start());
        }
    }

    BLANK_LINES.replace_all(&cleaned, "\n").trim().to_string()
}
