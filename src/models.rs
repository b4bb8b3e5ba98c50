use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A government job posting as published in `jobs.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub organization: String,
    pub qualification: String,
    pub department: String,
    pub location: String,
    pub posted_date: NaiveDate,
    pub deadline: NaiveDate,
    pub notification_url: String,
    pub apply_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Active,
    Inactive,
}

/// An official site tracked as an origin of job postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub status: SourceStatus,
}

impl Source {
    pub fn is_active(&self) -> bool {
        self.status == SourceStatus::Active
    }

    pub fn region(&self) -> &str {
        self.state.as_deref().unwrap_or("All India")
    }
}

/// A user-submitted candidate source awaiting manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub name: String,
    pub url: String,
    pub department: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Suggestion {
    /// Local backup copy kept under the `sources` key until a maintainer
    /// reviews it.
    pub fn as_pending_source(&self) -> Source {
        Source {
            name: self.name.clone(),
            url: self.url.clone(),
            department: self.department.clone(),
            state: self.state.clone(),
            status: SourceStatus::Inactive,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFeed {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SourceFeed {
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_feed_reads_scraper_output() {
        let raw = r#"{
            "lastUpdated": "2024-01-10T08:30:00.123456",
            "source": "Multiple Official Government Sources",
            "jobs": [{
                "id": "ssc_42",
                "title": "CGL Recruitment",
                "organization": "Staff Selection Commission",
                "department": "ssc",
                "qualification": "Graduate",
                "location": "All India",
                "postedDate": "2024-01-10",
                "deadline": "2024-02-09",
                "salary": "As per Pay Matrix",
                "officialUrl": "https://ssc.nic.in",
                "notificationUrl": "https://ssc.nic.in/Portal/Notifications",
                "applyUrl": "https://ssc.nic.in/Portal/Apply"
            }]
        }"#;
        let feed: JobFeed = serde_json::from_str(raw).unwrap();
        assert_eq!(feed.jobs.len(), 1);
        let job = &feed.jobs[0];
        assert_eq!(job.posted_date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(job.salary.as_deref(), Some("As per Pay Matrix"));
        assert!(feed.last_updated.is_some());
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let jobs: JobFeed = serde_json::from_str("{}").unwrap();
        let sources: SourceFeed = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        assert!(jobs.jobs.is_empty());
        assert!(sources.sources.is_empty());
    }

    #[test]
    fn source_region_defaults_to_all_india() {
        let source: Source = serde_json::from_str(
            r#"{"name": "UPSC", "url": "https://upsc.gov.in", "department": "upsc", "status": "active"}"#,
        )
        .unwrap();
        assert!(source.is_active());
        assert_eq!(source.region(), "All India");
    }
}
