//! CEO name extraction from search text and model replies

use regex::Regex;
use std::sync::OnceLock;

use crate::normalize::value::is_placeholder;

fn ceo_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

    PATTERNS.get_or_init(|| {
        [
            r"CEO(?: of [A-Za-z0-9&.,\s]+?)? is ([A-Z][a-zA-Z.'\- ]+)",
            r"([A-Z][a-zA-Z.'\-]+(?: [A-Z][a-zA-Z.'\-]+)+) is the CEO",
            r"CEO[:\-]\s*([A-Z][a-zA-Z.'\- ]+)",
            r"Chief Executive Officer[:\-]?\s*([A-Z][a-zA-Z.'\- ]+)",
            r"([A-Z][a-z]+ [A-Z][a-zA-Z.'\-]+),? (?:CEO|Chief Executive Officer)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid regex pattern"))
        .collect()
    })
}

/// Find a CEO name in free search text using a cascade of patterns
pub fn ceo_from_text(text: &str) -> Option<String> {
    ceo_patterns().iter().find_map(|re| {
        re.captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| clean_name(m.as_str()))
    })
}

/// Clean the reply of the strict CEO prompt; `NONE` and chatter are absent
pub fn clean_ceo_reply(reply: &str) -> Option<String> {
    let first = reply.lines().map(str::trim).find(|l| !l.is_empty())?;
    let first = first
        .trim_matches(['"', '\'', '*', '`'])
        .trim_start_matches("CEO:")
        .trim();

    if first.to_uppercase().starts_with("NONE") || is_placeholder(first) {
        return None;
    }
    clean_name(first)
}

/// Trim a captured name to its leading capitalized words
///
/// Requires at least two words; stops at sentence punctuation. Initials such
/// as "Q." do not end the name.
fn clean_name(candidate: &str) -> Option<String> {
    let clause = candidate
        .split([',', ';', '(', '\n'])
        .next()
        .unwrap_or_default();

    let mut words = Vec::new();
    for word in clause.split_whitespace() {
        if !word.chars().next().is_some_and(char::is_uppercase) || words.len() == 4 {
            break;
        }
        let bare = word.trim_end_matches('.');
        if bare.len() > 1 && word.ends_with('.') {
            words.push(bare);
            break;
        }
        words.push(word);
    }

    if words.len() < 2 {
        return None;
    }

    let name = words.join(" ");
    let name = name.trim_end_matches('-').to_string();
    (!is_placeholder(&name)).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceo_is_pattern() {
        let text = "Acme Robotics news. The CEO of Acme Robotics is Jane Doe. She joined in 2019.";
        assert_eq!(ceo_from_text(text).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_is_the_ceo_pattern() {
        let text = "Interview: John Q. Public is the CEO who turned things around";
        assert_eq!(ceo_from_text(text).as_deref(), Some("John Q. Public"));
    }

    #[test]
    fn test_trailing_title_pattern() {
        let text = "said Maria Lopez, CEO, in a statement";
        assert_eq!(ceo_from_text(text).as_deref(), Some("Maria Lopez"));
    }

    #[test]
    fn test_no_ceo() {
        assert_eq!(ceo_from_text("Acme makes robots for warehouses."), None);
    }

    #[test]
    fn test_clean_ceo_reply() {
        assert_eq!(clean_ceo_reply("Jane Doe").as_deref(), Some("Jane Doe"));
        assert_eq!(clean_ceo_reply("\"Jane Doe\"\n").as_deref(), Some("Jane Doe"));
        assert_eq!(clean_ceo_reply("NONE"), None);
        assert_eq!(clean_ceo_reply("none."), None);
        assert_eq!(clean_ceo_reply(""), None);
        assert_eq!(clean_ceo_reply("unknown"), None);
    }
}
