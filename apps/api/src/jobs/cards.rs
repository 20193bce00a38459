//! Normalizes raw provider records into display-ready job cards.

use serde::Serialize;
use serde_json::Value;

use crate::jobs::resolver::{display_or, resolve};

pub const MISSING_FIELD: &str = "N/A";
pub const MISSING_URL: &str = "#";
/// Descriptions longer than this many characters are cut and get `...`.
const DESCRIPTION_PREVIEW_CHARS: usize = 220;

const LINKEDIN_TITLE: &[&str] = &["title", "jobTitle", "job_title", "position", "vacancy"];
const LINKEDIN_COMPANY: &[&str] = &["company", "companyName", "employer", "hiringOrganization.name"];
const LINKEDIN_LOCATION: &[&str] = &[
    "location",
    "jobLocation",
    "formattedLocation",
    "locations",
    "place",
    "meta.location",
];
const LINKEDIN_URL: &[&str] = &["url", "jobUrl", "applyUrl"];
const LINKEDIN_DESCRIPTION: &[&str] = &["description", "summary"];

const NAUKRI_TITLE: &[&str] = &["title", "jobTitle", "job_title", "position"];
const NAUKRI_COMPANY: &[&str] = &["companyName", "company", "employer"];
const NAUKRI_LOCATION: &[&str] = &["location", "locations", "place"];
const NAUKRI_URL: &[&str] = &["jobUrl", "url"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobCard {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Original record, attached only when the caller asks for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl JobCard {
    pub fn from_linkedin(record: &Value) -> Self {
        let description = resolve(record, LINKEDIN_DESCRIPTION).unwrap_or_default();
        Self {
            title: display_or(resolve(record, LINKEDIN_TITLE), MISSING_FIELD),
            company: display_or(resolve(record, LINKEDIN_COMPANY), MISSING_FIELD),
            location: display_or(resolve(record, LINKEDIN_LOCATION), MISSING_FIELD),
            url: display_or(resolve(record, LINKEDIN_URL), MISSING_URL),
            description: Some(preview(&description)),
            raw: None,
        }
    }

    pub fn from_naukri(record: &Value) -> Self {
        Self {
            title: display_or(resolve(record, NAUKRI_TITLE), MISSING_FIELD),
            company: display_or(resolve(record, NAUKRI_COMPANY), MISSING_FIELD),
            location: display_or(resolve(record, NAUKRI_LOCATION), MISSING_FIELD),
            url: display_or(resolve(record, NAUKRI_URL), MISSING_URL),
            description: None,
            raw: None,
        }
    }

    pub fn with_raw(mut self, record: Value) -> Self {
        self.raw = Some(record);
        self
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    cut.push_str("...");
    cut
}
