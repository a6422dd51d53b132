use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::humanize_slug;

// ── Region ──────────────────────────────────────────────────────────────────

/// Where a member is located. Drives the regional content on the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    NorthAmerica,
    SouthAmerica,
    Europe,
    Africa,
    Asia,
    Oceania,
    Antarctica,
}

impl Region {
    /// Selector order on the join page.
    pub const ALL: [Region; 7] = [
        Region::NorthAmerica,
        Region::SouthAmerica,
        Region::Europe,
        Region::Africa,
        Region::Asia,
        Region::Oceania,
        Region::Antarctica,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Region::NorthAmerica => "north-america",
            Region::SouthAmerica => "south-america",
            Region::Europe => "europe",
            Region::Africa => "africa",
            Region::Asia => "asia",
            Region::Oceania => "oceania",
            Region::Antarctica => "antarctica",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.slug() == slug)
    }

    pub fn label(self) -> String {
        humanize_slug(self.slug())
    }
}

// ── Tier ────────────────────────────────────────────────────────────────────

/// Membership category picked on the last step of the join flow.
/// Fees are display constants only; nothing is charged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    #[default]
    Individual,
    Project,
}

impl MembershipTier {
    pub fn annual_fee_eur(self) -> u32 {
        match self {
            MembershipTier::Individual => 10,
            MembershipTier::Project => 100,
        }
    }

    pub fn badge_label(self) -> &'static str {
        match self {
            MembershipTier::Individual => "Individual Member",
            MembershipTier::Project => "Project Member",
        }
    }

    /// Badge colour family used by the frontend.
    pub fn accent(self) -> &'static str {
        match self {
            MembershipTier::Individual => "blue",
            MembershipTier::Project => "emerald",
        }
    }
}

// ── Record ──────────────────────────────────────────────────────────────────

/// A joined member, exactly as persisted under the session key.
///
/// Unknown fields are ignored on read, so records carrying a `password` from
/// older builds still load; the password is never written back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRecord {
    pub name: String,
    pub email: String,
    pub region: Region,
    pub membership_type: MembershipTier,
    pub join_date: DateTime<Utc>,
    pub is_logged_in: bool,
}

impl MembershipRecord {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        region: Region,
        membership_type: MembershipTier,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            region,
            membership_type,
            join_date: joined_at,
            is_logged_in: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_region_wire_names() {
        for region in Region::ALL {
            let json = serde_json::to_string(&region).unwrap();
            assert_eq!(json, format!("\"{}\"", region.slug()));
            assert_eq!(Region::from_slug(region.slug()), Some(region));
        }
        assert_eq!(Region::from_slug("atlantis"), None);
    }

    #[test]
    fn test_region_labels() {
        assert_eq!(Region::NorthAmerica.label(), "North America");
        assert_eq!(Region::Europe.label(), "Europe");
    }

    #[test]
    fn test_tier_display_constants() {
        assert_eq!(MembershipTier::default(), MembershipTier::Individual);
        assert_eq!(MembershipTier::Individual.annual_fee_eur(), 10);
        assert_eq!(MembershipTier::Project.annual_fee_eur(), 100);
        assert_eq!(MembershipTier::Project.badge_label(), "Project Member");
        assert_eq!(MembershipTier::Project.accent(), "emerald");
    }

    #[test]
    fn test_record_json_layout() {
        let joined = Utc.with_ymd_and_hms(2025, 1, 5, 9, 30, 0).unwrap();
        let record = MembershipRecord::new(
            "Ada Lovelace",
            "ada@example.com",
            Region::Europe,
            MembershipTier::Individual,
            joined,
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "Ada Lovelace");
        assert_eq!(value["region"], "europe");
        assert_eq!(value["membershipType"], "individual");
        assert_eq!(value["isLoggedIn"], true);
        assert_eq!(value["joinDate"], "2025-01-05T09:30:00Z");
        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_legacy_record_with_password_loads() {
        let raw = r#"{
            "name": "Ada",
            "email": "ada@example.com",
            "password": "x",
            "region": "south-america",
            "membershipType": "project",
            "isLoggedIn": true,
            "joinDate": "2024-03-01T12:00:00.000Z"
        }"#;
        let record: MembershipRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.region, Region::SouthAmerica);
        assert_eq!(record.membership_type, MembershipTier::Project);
    }

    #[test]
    fn test_foreign_region_is_rejected() {
        let raw = r#"{"name":"A","email":"a@b","region":"mars","membershipType":"individual","isLoggedIn":true,"joinDate":"2024-03-01T12:00:00Z"}"#;
        assert!(serde_json::from_str::<MembershipRecord>(raw).is_err());
    }
}
