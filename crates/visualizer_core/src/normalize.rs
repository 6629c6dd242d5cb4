use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static GLYPHS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[♠♣♥♦]").unwrap());
static CAMEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());
static LETTER_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-zA-Z])([0-9])").unwrap());
static DIGIT_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9])([a-zA-Z])").unwrap());
// The first alternative consumes a whole multi-letter unit so `cm` never becomes `c m`.
static LETTER_UNIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(cm|mm|kg)|([a-z])(cm|mm|kg|m|g|°|π)").unwrap());
static UNIT_LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(cm|mm|kg|m|g|°|π)([a-zA-Z])").unwrap());
static FUNCTION_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-zA-Z])(and|of|the|is|to|in|by|with|for)").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Cleans text captured from a rendered document into a readable query.
///
/// Every rule only ever inserts a space between two non-space characters (or
/// removes characters), so repeating the pipeline converges. The pipeline is
/// run until the text is stable, which makes the function idempotent.
///
/// An empty result means "no selection".
pub fn normalize_selection(raw: &str) -> String {
    let mut current = single_pass(raw);
    loop {
        let next = single_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn single_pass(text: &str) -> String {
    let text = GLYPHS.replace_all(text, " ");
    let text = CAMEL.replace_all(&text, "${1} ${2}");
    let text = LETTER_DIGIT.replace_all(&text, "${1} ${2}");
    let text = DIGIT_LETTER.replace_all(&text, "${1} ${2}");
    let text = LETTER_UNIT.replace_all(&text, |caps: &Captures| {
        if let Some(unit) = caps.get(1) {
            unit.as_str().to_string()
        } else {
            format!("{} {}", &caps[2], &caps[3])
        }
    });
    let text = UNIT_LETTER.replace_all(&text, "${1} ${2}");
    let text = FUNCTION_WORD.replace_all(&text, "${1} ${2}");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}
