use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category choices offered by the add form
pub const DOMAINS: [&str; 8] = [
    "Education",
    "Health",
    "Finance",
    "Productivity",
    "Entertainment",
    "Marketing",
    "Development",
    "Design",
];

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Pricing {
    #[default]
    Free,
    Paid,
}

impl Pricing {
    pub fn is_free(&self) -> bool {
        matches!(self, Pricing::Free)
    }

    /// Anything that is not exactly "Paid" counts as free
    pub fn from_label(label: &str) -> Self {
        if label == "Paid" {
            Pricing::Paid
        } else {
            Pricing::Free
        }
    }

    /// Stored flags are read the other way round: only "Free" is free.
    pub fn from_stored(label: &str) -> Self {
        if label == "Free" {
            Pricing::Free
        } else {
            Pricing::Paid
        }
    }
}

/// One directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    pub id: String,
    pub app_name: String,
    pub company: String,
    pub website: String,
    pub domain: String,
    pub is_free: Pricing,
    pub summary: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub video_url: String,
    pub created_at: String,
}

impl AppRecord {
    pub fn logo(&self) -> Option<&str> {
        non_empty(&self.logo_url)
    }

    pub fn audio(&self) -> Option<&str> {
        non_empty(&self.audio_url)
    }

    pub fn video(&self) -> Option<&str> {
        non_empty(&self.video_url)
    }

    pub fn created_at_parsed(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// ISO 8601 timestamp with millisecond precision, e.g. `2024-01-02T03:04:05.678Z`
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_timestamp() -> String {
    timestamp(Utc::now())
}

#[cfg(test)]
pub(crate) fn sample(name: &str, company: &str, domain: &str, pricing: Pricing, created_at: &str) -> AppRecord {
    AppRecord {
        id: format!("id-{}", name.to_lowercase()),
        app_name: name.to_string(),
        company: company.to_string(),
        website: format!("https://{}.example.com", name.to_lowercase()),
        domain: domain.to_string(),
        is_free: pricing,
        summary: format!("{} summary", name),
        logo_url: String::new(),
        audio_url: String::new(),
        video_url: String::new(),
        created_at: created_at.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_with_stored_field_names() {
        let rec = sample("Notely", "Acme", "Productivity", Pricing::Paid, "2024-01-01T00:00:00.000Z");
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["appName"], "Notely");
        assert_eq!(value["isFree"], "Paid");
        assert_eq!(value["createdAt"], "2024-01-01T00:00:00.000Z");
        assert!(value.get("logoUrl").is_some());
    }

    #[test]
    fn pricing_labels_for_import_and_storage() {
        assert_eq!(Pricing::from_label("Paid"), Pricing::Paid);
        assert_eq!(Pricing::from_label("paid"), Pricing::Free);
        assert_eq!(Pricing::from_label(""), Pricing::Free);
        assert_eq!(Pricing::from_stored("Free"), Pricing::Free);
        assert_eq!(Pricing::from_stored("Trial"), Pricing::Paid);
        assert_eq!(Pricing::from_stored(""), Pricing::Paid);
        assert_eq!(Pricing::Paid.to_string(), "Paid");
    }

    #[test]
    fn timestamp_uses_millis_and_z() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(timestamp(at), "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn empty_media_urls_are_absent() {
        let mut rec = sample("Pod", "Acme", "Health", Pricing::Free, "2024-01-01T00:00:00.000Z");
        assert_eq!(rec.logo(), None);
        rec.video_url = "https://youtu.be/abc".into();
        assert_eq!(rec.video(), Some("https://youtu.be/abc"));
    }

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}
