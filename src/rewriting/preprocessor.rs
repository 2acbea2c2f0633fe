//*** START FILE: src/rewriting/preprocessor.rs ***//
use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\$\$.*?\$\$").unwrap());
static INLINE_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$.*?\$").unwrap());
static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[.*?\]\(.*?\)").unwrap());
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());

static KEPT_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,2} ").unwrap());
static DEEP_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{3,} ").unwrap());

/// Strips content that is not prose before it reaches the generator: block and
/// inline math, markdown images and fenced code. A delimiter without a partner
/// is left as it is.
pub fn remove_equations_and_graphs(text: &str) -> String {
    let text = BLOCK_MATH.replace_all(text, "");
    let text = INLINE_MATH.replace_all(&text, "");
    let text = IMAGE.replace_all(&text, "");
    CODE_FENCE.replace_all(&text, "").into_owned()
}

/// Drops `###`-and-deeper heading lines. Level 1/2 headings and blank lines stay.
pub fn remove_subheadings(text: &str) -> String {
    text.split('\n')
        .filter(|line| KEPT_HEADING.is_match(line) || !DEEP_HEADING.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

//*** END FILE: src/rewriting/preprocessor.rs ***//
