//! Subsidiary list extraction

use serde_json::Value;
use std::collections::HashSet;

use super::json::{extract_json, JsonShape};
use crate::models::Subsidiary;
use crate::normalize::value::{array_field, coerce_count, string_field};
use crate::utils::favicon_url;

/// Parse subsidiaries from a model reply; empty on failure
pub fn parse_subsidiaries(raw: &str) -> Vec<Subsidiary> {
    match extract_json(raw, JsonShape::Any) {
        Ok(value) => subsidiaries_from_value(&value),
        Err(e) => {
            if !raw.trim().is_empty() {
                tracing::warn!(error = %e, "Could not parse subsidiaries from reply");
            }
            Vec::new()
        }
    }
}

/// Decode subsidiaries from an array or a `{"subsidiaries": [...]}` wrapper
pub fn subsidiaries_from_value(value: &Value) -> Vec<Subsidiary> {
    let items: &[Value] = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(_) => array_field(value, &["subsidiaries", "Subsidiaries"]),
        _ => &[],
    };

    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(subsidiary_from_value)
        .filter(|s| seen.insert(s.name.to_lowercase()))
        .collect()
}

/// Decode one subsidiary, or a bare name
pub fn subsidiary_from_value(value: &Value) -> Option<Subsidiary> {
    if let Value::String(name) = value {
        let name = name.trim();
        return (!name.is_empty()).then(|| Subsidiary {
            name: name.to_string(),
            ..Default::default()
        });
    }

    let name = string_field(value, &["name", "subsidiary_name", "company", "company_name"])?;
    let url = string_field(value, &["url", "website", "link"])
        .map(|u| with_scheme(&u))
        .unwrap_or_default();
    let logo = string_field(value, &["logo", "logo_url"])
        .unwrap_or_else(|| if url.is_empty() { String::new() } else { favicon_url(&url) });

    Some(Subsidiary {
        name,
        logo,
        url,
        description: string_field(value, &["description", "summary"]).unwrap_or_default(),
        sector: string_field(value, &["sector", "industry"]).unwrap_or_default(),
        country: string_field(value, &["country", "headquarters", "location"]).unwrap_or_default(),
        linkedin_members: coerce_count(
            ["linkedin_members", "linkedin_followers", "employees"]
                .iter()
                .find_map(|key| value.get(*key)),
        ),
    })
}

fn with_scheme(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subsidiaries() {
        let raw = r#"```json
[
  {"name": "Widget Labs", "url": "widgetlabs.com", "sector": "Software", "linkedin_members": "1,200 employees", "country": "UK"},
  {"name": "widget labs", "url": "https://dup.example.com"},
  {"name": "Gadget GmbH", "url": "https://gadget.de", "logo": "data:image/png;base64,AAA", "linkedin_members": 35}
]
```"#;
        let subs = parse_subsidiaries(raw);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].url, "https://widgetlabs.com");
        assert_eq!(subs[0].linkedin_members, 1200);
        assert_eq!(
            subs[0].logo,
            "https://www.google.com/s2/favicons?sz=64&domain_url=widgetlabs.com"
        );
        assert_eq!(subs[1].logo, "data:image/png;base64,AAA");
        assert_eq!(subs[1].linkedin_members, 35);
    }

    #[test]
    fn test_wrapped_and_bare_names() {
        let raw = r#"{"subsidiaries": ["Alpha Ltd", {"name": "Beta Inc"}]}"#;
        let subs = parse_subsidiaries(raw);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].name, "Alpha Ltd");
        assert!(subs[1].logo.is_empty());
    }

    #[test]
    fn test_garbage_is_empty() {
        assert!(parse_subsidiaries("none found").is_empty());
    }
}
