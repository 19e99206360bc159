//! Monetary value parsing
//!
//! Event values arrive as display text written by the model, for example
//! `"$44,000,000,000 (enterprise value)"`, `"$2.2B"` or `"Undisclosed"`.
//! [`MonetaryValue`] keeps that text untouched and extracts what it can.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Parsed event value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MonetaryValue {
    /// Original display text
    pub raw: String,
    /// Amount in whole currency units
    pub amount: Option<u64>,
    /// ISO currency code
    pub currency: Option<String>,
    /// Parenthetical qualifier such as "cash" or "enterprise value"
    pub qualifier: Option<String>,
    /// Value is explicitly undisclosed
    pub undisclosed: bool,
}

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(billion|bn|b|million|mm|mn|m|thousand|k)?\b")
            .expect("Invalid regex pattern")
    })
}

/// Amount written right after a currency symbol or code: `$5M`, `GBP 120 million`
fn currency_amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(?:[$€£¥]|\b(?:USD|EUR|GBP|JPY|CHF|CAD|AUD|CNY|INR|SEK|NOK|DKK|SGD|HKD)\b)\s*(\d[\d,]*(?:\.\d+)?)\s*(billion|bn|b|million|mm|mn|m|thousand|k)?\b",
        )
        .expect("Invalid regex pattern")
    })
}

/// Amount written right before a currency code: `120 million GBP`
fn amount_currency_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(billion|bn|b|million|mm|mn|m|thousand|k)?\s*\b(?:USD|EUR|GBP|JPY|CHF|CAD|AUD|CNY|INR|SEK|NOK|DKK|SGD|HKD)\b",
        )
        .expect("Invalid regex pattern")
    })
}

fn qualifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^()]+)\)").expect("Invalid regex pattern"))
}

fn iso_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(USD|EUR|GBP|JPY|CHF|CAD|AUD|CNY|INR|SEK|NOK|DKK|SGD|HKD)\b")
            .expect("Invalid regex pattern")
    })
}

fn canonical_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[$€£¥]|[A-Z]{3}\s?)?\d{1,3}(?:,\d{3})*\s*\([^()]+\)$")
            .expect("Invalid regex pattern")
    })
}

impl MonetaryValue {
    /// Parse display text; never fails
    pub fn parse(text: &str) -> Self {
        let raw = text.trim().to_string();
        let lower = raw.to_lowercase();

        let undisclosed = lower.contains("undisclosed") || lower.contains("not disclosed");

        let qualifier = qualifier_re()
            .captures_iter(&raw)
            .last()
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|q| !q.is_empty());

        let currency = currency_of(&raw);

        // Parentheticals never carry the headline amount
        let body = qualifier_re().replace_all(&raw, " ");
        let amount = if undisclosed { None } else { parse_amount(&body) };

        Self {
            raw,
            amount,
            currency,
            qualifier,
            undisclosed,
        }
    }

    /// Text is empty
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Whether the display text follows the comma-grouped-digits plus
    /// parenthetical-qualifier format, or is an explicit "Undisclosed"
    pub fn is_canonical(&self) -> bool {
        if self.undisclosed {
            return true;
        }
        canonical_re().is_match(&self.raw)
    }

    /// Canonical rendering of the parsed amount, when one was found
    pub fn canonical(&self) -> Option<String> {
        if self.undisclosed {
            return Some(String::from("Undisclosed"));
        }
        let amount = self.amount?;
        let prefix = match self.currency.as_deref() {
            None | Some("USD") => String::from("$"),
            Some("EUR") => String::from("€"),
            Some("GBP") => String::from("£"),
            Some(code) => format!("{code} "),
        };
        let mut text = format!("{prefix}{}", group_digits(amount));
        if let Some(qualifier) = &self.qualifier {
            text.push_str(&format!(" ({qualifier})"));
        }
        Some(text)
    }
}

fn currency_of(text: &str) -> Option<String> {
    let symbol = text.chars().find_map(|c| match c {
        '$' => Some("USD"),
        '€' => Some("EUR"),
        '£' => Some("GBP"),
        '¥' => Some("JPY"),
        _ => None,
    });
    symbol
        .map(str::to_string)
        .or_else(|| iso_code_re().captures(text).map(|c| c[1].to_string()))
}

fn parse_amount(text: &str) -> Option<u64> {
    let caps = currency_amount_re()
        .captures(text)
        .or_else(|| amount_currency_re().captures(text))
        .or_else(|| amount_re().captures(text))?;
    let number = caps.get(1)?.as_str().replace(',', "");
    let multiplier: u64 = match caps.get(2).map(|m| m.as_str().to_lowercase()).as_deref() {
        Some("billion" | "bn" | "b") => 1_000_000_000,
        Some("million" | "mm" | "mn" | "m") => 1_000_000,
        Some("thousand" | "k") => 1_000,
        _ => 1,
    };

    if let Ok(whole) = number.parse::<u64>() {
        return whole.checked_mul(multiplier);
    }
    let fractional: f64 = number.parse().ok()?;
    let value = (fractional * multiplier as f64).round();
    (value.is_finite() && value >= 0.0).then_some(value as u64)
}

/// Group digits in threes: `2200000000` → `"2,200,000,000"`
pub fn group_digits(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render a bare USD amount the way event values are displayed
pub fn format_usd(amount: u64) -> String {
    format!("${}", group_digits(amount))
}
