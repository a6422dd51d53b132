use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::membership::{MembershipRecord, Region};
use crate::session::SessionStore;

/// "north-america" -> "North America".
pub fn humanize_slug(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Avatar fallback: first character of each space-separated word.
pub fn initials(name: &str) -> String {
    name.split(' ').filter_map(|part| part.chars().next()).collect()
}

/// Long US date, e.g. "January 5, 2025".
pub fn format_member_since(join_date: DateTime<Utc>) -> String {
    join_date.format("%B %-d, %Y").to_string()
}

/// Read-only dashboard view over a membership record.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub name: String,
    pub initials: String,
    pub email: String,
    pub region: Region,
    pub region_label: String,
    pub badge_label: String,
    pub badge_accent: String,
    pub annual_fee: String,
    pub membership_years: u32,
    pub member_since: String,
}

impl MemberProfile {
    pub fn from_record(record: &MembershipRecord) -> Self {
        let tier = record.membership_type;
        Self {
            name: record.name.clone(),
            initials: initials(&record.name),
            email: record.email.clone(),
            region: record.region,
            region_label: record.region.label(),
            badge_label: tier.badge_label().to_string(),
            badge_accent: tier.accent().to_string(),
            annual_fee: format!("€{}", tier.annual_fee_eur()),
            membership_years: 1,
            member_since: format_member_since(record.join_date),
        }
    }
}

/// Name shown in the site header. Never fails: unreadable storage falls back
/// to the generic greeting.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderGreeting {
    pub display_name: String,
    pub signed_in: bool,
}

impl HeaderGreeting {
    pub const FALLBACK_NAME: &'static str = "User";

    pub fn from_session(session: &SessionStore) -> Self {
        match session.read_lenient() {
            Some(record) if !record.name.is_empty() => Self {
                display_name: record.name,
                signed_in: true,
            },
            Some(_) => Self {
                display_name: Self::FALLBACK_NAME.to_string(),
                signed_in: true,
            },
            None => Self {
                display_name: Self::FALLBACK_NAME.to_string(),
                signed_in: false,
            },
        }
    }
}
