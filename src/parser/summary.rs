//! Line parser for the markdown "Company Details" summary
//!
//! The summary prompt asks for `- Key: value` lines. Models add bold markers,
//! swap dash characters, wrap URLs in markdown links and answer "Unknown"
//! or echo the `<placeholder>`. Every field is therefore optional.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::normalize::value::{is_http_url, is_placeholder};

/// Fields read from a summary
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanyDetails {
    pub company_name: Option<String>,
    pub year_founded: Option<i32>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub headquarters: Option<String>,
    pub ceo: Option<String>,
    pub ownership: Option<String>,
    pub primary_business_focus: Option<String>,
    pub primary_sectors: Vec<String>,
    pub secondary_sectors: Vec<String>,
    pub press_page: Option<String>,
}

impl CompanyDetails {
    /// Parse summary markdown; lines that do not fit are ignored
    pub fn parse(markdown: &str) -> Self {
        let mut details = Self::default();

        for line in markdown.lines() {
            let Some((key, value)) = split_line(line) else {
                continue;
            };
            if is_placeholder(&value) {
                continue;
            }

            match key.as_str() {
                "company name" | "name" => details.company_name = Some(value),
                "year founded" | "founded" => details.year_founded = find_year(&value),
                "website" => details.website = extract_url(&value).filter(|u| is_http_url(u)),
                "linkedin" => {
                    details.linkedin =
                        extract_url(&value).filter(|u| u.to_lowercase().contains("linkedin.com"))
                }
                "headquarters" | "hq" => details.headquarters = Some(value),
                "ceo" => details.ceo = Some(value),
                "ownership status" | "ownership" => details.ownership = Some(value),
                "primary business focus" | "business focus" => {
                    details.primary_business_focus = Some(value)
                }
                "primary sectors" | "primary sector" => details.primary_sectors = split_list(&value),
                "secondary sectors" | "secondary sector" => {
                    details.secondary_sectors = split_list(&value)
                }
                "press page" | "press-page" | "presspage" | "newsroom" => {
                    details.press_page = extract_url(&value).filter(|u| is_http_url(u))
                }
                _ => {}
            }
        }

        details
    }
}

/// Split `- **Key**: value` into a lower-cased key and a cleaned value
fn split_line(line: &str) -> Option<(String, String)> {
    let line = line.replace(['–', '—'], "-");
    let line = line
        .trim()
        .trim_start_matches(['-', '*', '•'])
        .trim();
    let (key, value) = line.split_once(':')?;

    let key = key.replace("**", "").trim().to_lowercase();
    let value = value.replace("**", "").trim().to_string();
    if key.is_empty() || key.len() > 40 {
        return None;
    }
    Some((key, value))
}

/// URL from a markdown link or plain text
pub fn extract_url(text: &str) -> Option<String> {
    static MD_LINK_RE: OnceLock<Regex> = OnceLock::new();
    static URL_RE: OnceLock<Regex> = OnceLock::new();

    let md_re = MD_LINK_RE.get_or_init(|| {
        Regex::new(r"\[[^\]]*\]\((https?://[^)\s]+)\)").expect("Invalid regex pattern")
    });
    if let Some(caps) = md_re.captures(text) {
        return Some(caps[1].to_string());
    }

    let url_re = URL_RE
        .get_or_init(|| Regex::new(r"https?://[^\s)\]]+").expect("Invalid regex pattern"));
    url_re
        .find(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',']).to_string())
}

/// First four-digit year in text
pub fn find_year(text: &str) -> Option<i32> {
    static YEAR_RE: OnceLock<Regex> = OnceLock::new();

    let re = YEAR_RE.get_or_init(|| Regex::new(r"\b(1[6-9]\d{2}|20\d{2})\b").expect("Invalid regex pattern"));
    re.captures(text).and_then(|c| c[1].parse().ok())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty() && !is_placeholder(s))
        .map(str::to_string)
        .collect()
}

/// Replace every CEO line with `- CEO: <name>`, appending one if absent
pub fn replace_ceo_line(summary: &str, ceo: Option<&str>) -> String {
    let ceo_line = format!("- CEO: {}", ceo.unwrap_or("Unknown"));
    let mut replaced = false;

    let mut lines: Vec<String> = summary
        .lines()
        .map(|line| {
            let cleaned = line.replace(['–', '—'], "-").replace("**", "").trim().to_lowercase();
            if cleaned.starts_with("- ceo") || cleaned.starts_with("ceo") {
                replaced = true;
                ceo_line.clone()
            } else {
                line.to_string()
            }
        })
        .collect();

    if !replaced {
        lines.push(ceo_line);
    }

    lines.join("\n").trim().to_string()
}
