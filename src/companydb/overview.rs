//! Company database records flattened into overview and roster shapes

use serde_json::Value;

use crate::models::{BusinessFocus, CompanyOverview, Importance, ManagementEntry, RoleStatus, SectorTag};
use crate::normalize::value::{array_field, as_int, int_field, string_field, url_field};

const CURRENT_ROLE_KEYS: &[&str] = &["Management_Roles_current", "Managmant_Roles_current"];
const PAST_ROLE_KEYS: &[&str] = &["Management_Roles_past", "Managmant_Roles_past"];

/// Company object of a record; records either wrap it in `Company` or are the company
fn company_of(record: &Value) -> Option<&Value> {
    let company = record.get("Company").filter(|c| c.is_object()).unwrap_or(record);
    company.is_object().then_some(company)
}

fn nested(value: &Value, object: &str, keys: &[&str]) -> Option<String> {
    value.get(object).and_then(|inner| string_field(inner, keys))
}

fn year_founded(company: &Value) -> Option<i32> {
    let from_years = company
        .get("_years")
        .and_then(|years| int_field(years, &["Year", "year"]));
    let direct = int_field(company, &["year_founded"]).filter(|y| (1000..=9999).contains(y));

    from_years
        .or(direct)
        .and_then(|y| i32::try_from(y).ok())
        .filter(|y| *y > 0)
}

fn business_focus(company: &Value) -> Option<BusinessFocus> {
    let value = ["_primary_business_focus", "primary_business_focus_id"]
        .iter()
        .filter_map(|key| company.get(*key))
        .find(|v| !v.is_null())?;

    let (name, id) = if value.is_object() {
        (
            string_field(value, &["business_focus", "primary_business_focus", "name"]).unwrap_or_default(),
            int_field(value, &["id"]),
        )
    } else {
        (String::new(), as_int(value))
    };

    let id = id.and_then(|i| u32::try_from(i).ok()).unwrap_or(0);
    (!name.is_empty() || id != 0).then_some(BusinessFocus { name, id })
}

fn sector_tags(list: &[Value], importance: Option<Importance>) -> Vec<SectorTag> {
    list.iter()
        .filter_map(|entry| {
            let (sector, id) = match entry {
                Value::String(s) => (s.trim().to_string(), None),
                Value::Object(_) => (
                    string_field(entry, &["sector_name", "sector", "name"])?,
                    int_field(entry, &["id", "sector_id"]),
                ),
                _ => return None,
            };
            let importance = importance.unwrap_or_else(|| {
                string_field(entry, &["Sector_importance", "importance"])
                    .map_or(Importance::Primary, |s| Importance::parse(&s))
            });
            (!sector.is_empty()).then_some(SectorTag { sector, id, importance })
        })
        .collect()
}

/// Sectors from the `sectors_payload` JSON string, else from the plain lists
fn sectors(company: &Value) -> Vec<SectorTag> {
    let payload = array_field(company, &["new_sectors_data"])
        .first()
        .and_then(|data| data.get("sectors_payload"))
        .and_then(|p| match p {
            Value::String(s) => serde_json::from_str::<Value>(s).ok(),
            Value::Object(_) => Some(p.clone()),
            _ => None,
        });

    if let Some(payload) = payload {
        let mut tags = sector_tags(array_field(&payload, &["primary_sectors"]), Some(Importance::Primary));
        tags.extend(sector_tags(
            array_field(&payload, &["secondary_sectors"]),
            Some(Importance::Secondary),
        ));
        if !tags.is_empty() {
            return tags;
        }
    }

    sector_tags(array_field(company, &["sectors_id", "_sectors", "sectors"]), None)
}

/// Flatten a company record into an overview
///
/// Returns `None` when the record holds no company object. `fallback_name` is
/// used when the record carries no name.
pub fn db_overview(record: &Value, fallback_name: &str) -> Option<CompanyOverview> {
    let company = company_of(record)?;

    Some(CompanyOverview {
        name: string_field(company, &["name"]).unwrap_or_else(|| fallback_name.to_string()),
        city: nested(company, "_locations", &["City", "city"]),
        country: nested(company, "_locations", &["Country", "country"]),
        ownership: nested(company, "_ownership_type", &["ownership"]),
        website: url_field(company, &["url", "website"]),
        linkedin: company
            .get("linkedin_data")
            .and_then(|l| url_field(l, &["LinkedIn_URL", "linkedin_url"]))
            .or_else(|| url_field(company, &["linkedin_url"])),
        webpage_monitored: url_field(company, &["webpage_monitored", "press_page_url", "news_url"]),
        description: string_field(company, &["description"]),
        year_founded: year_founded(company),
        ceo: None,
        primary_business_focus: business_focus(company),
        sectors: sectors(company),
    })
}

fn role_from_value(value: &Value, default_status: RoleStatus) -> Option<ManagementEntry> {
    let name = string_field(value, &["Individual_text", "individual_name", "name"])?;
    let position = array_field(value, &["job_titles_id"])
        .iter()
        .filter_map(|t| string_field(t, &["job_title"]))
        .collect::<Vec<_>>()
        .join(", ");
    let status = string_field(value, &["Status", "status"])
        .map_or(default_status, |s| RoleStatus::parse(&s));

    let mut entry = ManagementEntry::new(name, position, status);
    entry.linkedin_url = url_field(value, &["linkedin_url", "LinkedIn_URL"]);
    Some(entry)
}

/// Management roster of a company record, current roles first
pub fn db_management(record: &Value) -> Vec<ManagementEntry> {
    let Some(company) = company_of(record) else {
        return Vec::new();
    };

    // Rosters sit next to the company object or inside it
    let roster = |keys: &[&str]| {
        let list = array_field(record, keys);
        if list.is_empty() && !std::ptr::eq(record, company) {
            array_field(company, keys)
        } else {
            list
        }
    };

    roster(CURRENT_ROLE_KEYS)
        .iter()
        .filter_map(|v| role_from_value(v, RoleStatus::Current))
        .chain(
            roster(PAST_ROLE_KEYS)
                .iter()
                .filter_map(|v| role_from_value(v, RoleStatus::Past)),
        )
        .collect()
}
