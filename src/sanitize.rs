use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

static HEADERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"#{1,6}\s?").expect("valid regex"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("valid regex"));
static BULLETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-*+]\s").expect("valid regex"));
static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*\d+\.\s").expect("valid regex"));
static FENCED_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[\s\S]*?```").expect("valid regex"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").expect("valid regex"));
static HORIZONTAL_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^-{3,}$").expect("valid regex"));
static LINKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]\(.*?\)").expect("valid regex"));
static EXTRA_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Strip markdown markup from a vision-model description so the text can be
/// fed to an image-generation prompt verbatim. Substitutions run in a fixed
/// order; fenced code blocks are dropped with their content, everything else
/// keeps the inner text.
pub fn remove_markdown(text: &str) -> String {
    let text = HEADERS.replace_all(text, "");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = BULLETS.replace_all(&text, "");
    let text = NUMBERED.replace_all(&text, "");
    let text = FENCED_CODE.replace_all(&text, "");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = HORIZONTAL_RULE.replace_all(&text, "");
    let text = LINKS.replace_all(&text, "$1");
    let text = EXTRA_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Replace every whole-word, case-insensitive occurrence of the given words
/// with the trigger word. Entries are regex-escaped, so punctuation inside a
/// word is matched literally.
pub fn replace_words_with_trigger(text: &str, words_to_replace: &[String], trigger_word: &str) -> String {
    let words: Vec<String> = words_to_replace
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();

    if words.is_empty() {
        return text.to_string();
    }

    let pattern = format!(r"(?i)\b({})\b", words.join("|"));
    let re = Regex::new(&pattern).expect("escaped alternation is a valid pattern");

    // NoExpand keeps `$` in the trigger word literal instead of expanding
    // capture groups.
    re.replace_all(text, NoExpand(trigger_word)).to_string()
}
