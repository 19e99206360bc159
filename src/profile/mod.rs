//! AI company overview derivation
//!
//! Turns the parsed summary fields into a [`CompanyOverview`] shaped like
//! the one the company database produces, so the two can be compared side
//! by side.

pub mod taxonomy;

use crate::models::{CompanyOverview, Importance, SectorTag};
use crate::parser::CompanyDetails;
use crate::utils::{extract_domain, is_url};

/// Company name hint from user input
///
/// URLs give their first domain label, title-cased: `https://www.acme-robotics.io`
/// becomes `Acme-Robotics`. Anything else is returned trimmed.
pub fn company_name_from_query(query: &str) -> String {
    let query = query.trim();
    if !is_url(query) {
        return query.to_string();
    }

    let Ok(host) = extract_domain(query) else {
        return query.to_string();
    };
    let host = host.trim_start_matches("www.");
    let label = host.split('.').next().unwrap_or(host);
    title_case(label)
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut boundary = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if boundary {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            boundary = false;
        } else {
            out.push(c);
            boundary = true;
        }
    }
    out
}

/// Split "City, Region, Country" at the last comma; the country is normalized
pub fn split_headquarters(headquarters: &str) -> (Option<String>, Option<String>) {
    let hq = headquarters.trim();
    if hq.is_empty() {
        return (None, None);
    }

    match hq.rsplit_once(',') {
        Some((city, country)) if !city.trim().is_empty() && !country.trim().is_empty() => {
            let city = city
                .split(',')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(", ");
            (Some(city), Some(taxonomy::normalize_country(country)))
        }
        _ => (Some(hq.trim_matches(',').trim().to_string()), None),
    }
}

/// Build the AI overview for a query from summary fields and the description
pub fn ai_overview(query: &str, details: &CompanyDetails, description: Option<&str>) -> CompanyOverview {
    let (city, country) = details
        .headquarters
        .as_deref()
        .map(split_headquarters)
        .unwrap_or_default();

    let input_website = is_url(query).then(|| query.trim().to_string());

    let sectors = details
        .primary_sectors
        .iter()
        .map(|s| (s, Importance::Primary))
        .chain(details.secondary_sectors.iter().map(|s| (s, Importance::Secondary)))
        .map(|(sector, importance)| SectorTag {
            sector: sector.clone(),
            id: None,
            importance,
        })
        .collect();

    CompanyOverview {
        name: details
            .company_name
            .clone()
            .unwrap_or_else(|| company_name_from_query(query)),
        city,
        country,
        ownership: details
            .ownership
            .as_deref()
            .and_then(taxonomy::classify_ownership)
            .map(str::to_string),
        website: details.website.clone().or(input_website),
        linkedin: details.linkedin.clone(),
        webpage_monitored: details.press_page.clone(),
        description: description.filter(|d| !d.trim().is_empty()).map(str::to_string),
        year_founded: details.year_founded,
        ceo: details.ceo.clone(),
        primary_business_focus: details
            .primary_business_focus
            .as_deref()
            .and_then(taxonomy::map_business_focus),
        sectors,
    }
}
