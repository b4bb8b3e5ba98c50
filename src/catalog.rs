//! Loading the job and source feeds into an in-memory catalog.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::FetchError;
use crate::models::{Job, JobFeed, Source, SourceFeed};

/// Where a feed lives: a file on disk or an http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    Path(PathBuf),
    Url(String),
}

impl From<&str> for FeedLocation {
    fn from(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            FeedLocation::Url(raw.to_string())
        } else {
            FeedLocation::Path(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for FeedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedLocation::Path(path) => write!(f, "{}", path.display()),
            FeedLocation::Url(url) => write!(f, "{url}"),
        }
    }
}

impl FeedLocation {
    async fn fetch<T: DeserializeOwned>(&self, client: &reqwest::Client) -> Result<T, FetchError> {
        let location = self.to_string();
        let raw = match self {
            FeedLocation::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|source| FetchError::Io {
                    location: location.clone(),
                    source,
                })?,
            FeedLocation::Url(url) => {
                let http_err = |source| FetchError::Http {
                    location: location.clone(),
                    source,
                };
                client
                    .get(url)
                    .send()
                    .await
                    .and_then(|resp| resp.error_for_status())
                    .map_err(http_err)?
                    .bytes()
                    .await
                    .map_err(http_err)?
                    .to_vec()
            }
        };
        serde_json::from_slice(&raw).map_err(|source| FetchError::Parse { location, source })
    }
}

/// The two fixed feed endpoints.
#[derive(Debug, Clone)]
pub struct Feeds {
    pub jobs: FeedLocation,
    pub sources: FeedLocation,
    client: reqwest::Client,
}

impl Feeds {
    pub fn new(jobs: impl Into<FeedLocation>, sources: impl Into<FeedLocation>) -> Self {
        Self {
            jobs: jobs.into(),
            sources: sources.into(),
            client: reqwest::Client::new(),
        }
    }
}

/// Summary counters shown in the page header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_sources: usize,
    pub active_sources: usize,
    pub total_jobs: usize,
    pub today_jobs: usize,
}

/// Active job postings plus the source list, as of one load.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub jobs: Vec<Job>,
    pub sources: Vec<Source>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Catalog {
    /// Drops postings whose deadline has passed and orders the rest newest
    /// first.
    pub fn from_feeds(job_feed: JobFeed, source_feed: SourceFeed, today: NaiveDate) -> Self {
        let total = job_feed.jobs.len();
        let mut jobs: Vec<Job> = job_feed
            .jobs
            .into_iter()
            .filter(|job| job.deadline >= today)
            .collect();
        jobs.sort_by(|a, b| b.posted_date.cmp(&a.posted_date));
        tracing::debug!("{} of {} jobs still open on {}", jobs.len(), total, today);

        Self {
            jobs,
            sources: source_feed.sources,
            last_updated: job_feed.last_updated.as_deref().and_then(parse_timestamp),
        }
    }

    pub fn stats(&self, today: NaiveDate) -> Stats {
        Stats {
            total_sources: self.sources.len(),
            active_sources: self.active_sources().count(),
            total_jobs: self.jobs.len(),
            today_jobs: self.jobs.iter().filter(|job| job.posted_date == today).count(),
        }
    }

    pub fn active_sources(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter().filter(|source| source.is_active())
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }
}

/// Fetches both feeds. Either one failing fails the whole load.
pub async fn load(feeds: &Feeds, today: NaiveDate) -> Result<Catalog, FetchError> {
    let source_feed: SourceFeed = feeds.sources.fetch(&feeds.client).await?;
    let job_feed: JobFeed = feeds.jobs.fetch(&feeds.client).await?;
    let catalog = Catalog::from_feeds(job_feed, source_feed, today);
    tracing::info!(
        "loaded {} active jobs and {} sources",
        catalog.jobs.len(),
        catalog.sources.len()
    );
    Ok(catalog)
}

/// Accepts RFC 3339 as well as the scraper's naive `isoformat()` output,
/// which is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes().max(0);
    if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}
