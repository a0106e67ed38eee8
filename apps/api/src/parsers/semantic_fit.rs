use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref BOLD_RE: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
}

/// One titled block of a semantic-fit explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitSection {
    pub title: String,
    pub bullets: Vec<String>,
}

/// Splits `**Title**` / bullet-list markup into sections.
///
/// Bold spans and the text between them alternate as title and body, so text
/// with no markup at all becomes a single title with no bullets. Best effort:
/// never fails, and empty input yields no sections.
pub fn parse_semantic_fit(text: &str) -> Vec<FitSection> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut fragments = Vec::new();
    let mut last = 0;
    for caps in BOLD_RE.captures_iter(text) {
        let (Some(whole), Some(title)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        fragments.push(&text[last..whole.start()]);
        fragments.push(title.as_str());
        last = whole.end();
    }
    fragments.push(&text[last..]);
    fragments.retain(|f| !f.is_empty());

    fragments
        .chunks(2)
        .map(|pair| FitSection {
            title: pair[0].trim().to_string(),
            bullets: pair.get(1).map(|body| parse_bullets(body)).unwrap_or_default(),
        })
        .collect()
}

/// Lines starting with `- ` or `* ` open a bullet; other non-blank lines
/// continue the current one. Text before the first bullet is dropped.
fn parse_bullets(body: &str) -> Vec<String> {
    let mut bullets: Vec<String> = Vec::new();

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            let item = item.trim();
            if !item.is_empty() {
                bullets.push(item.to_string());
            }
        } else if let Some(current) = bullets.last_mut() {
            current.push(' ');
            current.push_str(line);
        }
    }

    bullets
}
