//! Page view models. Each page is built from plain data and rendered by an
//! askama template, so re-rendering after any state change only needs the
//! current catalog, saved set and clock.

use askama::Template;
use chrono::{DateTime, NaiveDate, Utc};

use crate::catalog::{format_time_ago, Catalog, Stats};
use crate::filter::{self, FilterCriteria, Listing, QuickFilter, SortKey, ANY};
use crate::models::{Job, Source};
use crate::saved::SavedJobs;
use crate::shell::ShareData;
use crate::suggest::SuggestionForm;

/// Number of active sources listed on the home page.
const SOURCES_SHOWN: usize = 5;

const QUALIFICATIONS: [(&str, &str); 7] = [
    (ANY, "All Qualifications"),
    ("10th", "10th Pass"),
    ("12th", "12th Pass"),
    ("graduate", "Graduate"),
    ("post graduate", "Post Graduate"),
    ("diploma", "Diploma"),
    ("b.tech", "B.Tech/BE"),
];

const DEPARTMENTS: [(&str, &str); 7] = [
    (ANY, "All Departments"),
    ("ssc", "SSC"),
    ("upsc", "UPSC"),
    ("railway", "Railway"),
    ("banking", "Banking"),
    ("defence", "Defence"),
    ("state", "State Govt"),
];

const LOCATIONS: [(&str, &str); 6] = [
    (ANY, "All Locations"),
    ("all india", "All India"),
    ("delhi", "Delhi"),
    ("maharashtra", "Maharashtra"),
    ("uttar pradesh", "Uttar Pradesh"),
    ("bihar", "Bihar"),
];

const SORTS: [(&str, &str); 2] = [("newest", "Newest First"), ("deadline", "Deadline Soon")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Saved,
}

#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn options(choices: &[(&'static str, &'static str)], current: &str) -> Vec<SelectOption> {
    choices
        .iter()
        .map(|&(value, label)| SelectOption {
            value,
            label,
            selected: value.eq_ignore_ascii_case(current),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Chip {
    pub value: &'static str,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct JobCard<'a> {
    pub job: &'a Job,
    pub days_left: i64,
    pub urgent: bool,
    pub saved: bool,
}

impl<'a> JobCard<'a> {
    pub fn new(job: &'a Job, today: NaiveDate, saved: &SavedJobs) -> Self {
        let days_left = filter::days_left(job.deadline, today);
        Self {
            job,
            days_left,
            urgent: filter::is_urgent(days_left),
            saved: saved.contains(&job.id),
        }
    }
}

#[derive(Template)]
#[template(path = "jobs.html")]
pub struct JobsPage<'a> {
    pub page: Page,
    pub cards: Vec<JobCard<'a>>,
    pub stats: Stats,
    pub last_updated: Option<String>,
    pub sources: Vec<&'a Source>,
    pub qualifications: Vec<SelectOption>,
    pub departments: Vec<SelectOption>,
    pub locations: Vec<SelectOption>,
    pub sorts: Vec<SelectOption>,
    pub chips: Vec<Chip>,
    pub notice: Option<String>,
    pub return_to: String,
}

impl<'a> JobsPage<'a> {
    pub fn build(
        catalog: &'a Catalog,
        listing: &Listing,
        saved: &SavedJobs,
        now: DateTime<Utc>,
        notice: Option<String>,
        return_to: String,
    ) -> Self {
        let today = now.date_naive();
        let jobs: Vec<&Job> = match listing {
            Listing::Fields(criteria) => filter::filter(&catalog.jobs, criteria),
            Listing::Quick(quick) => filter::quick_filter(&catalog.jobs, *quick, today),
            Listing::Saved => saved.select(&catalog.jobs),
        };
        let default_criteria = FilterCriteria::default();
        let criteria = match listing {
            Listing::Fields(criteria) => criteria,
            _ => &default_criteria,
        };
        let active_chip = match listing {
            Listing::Quick(quick) => Some(*quick),
            _ => None,
        };
        let sort = match criteria.sort {
            SortKey::Unsorted => SortKey::Newest,
            key => key,
        };

        Self {
            page: if *listing == Listing::Saved { Page::Saved } else { Page::Home },
            cards: jobs.into_iter().map(|job| JobCard::new(job, today, saved)).collect(),
            stats: catalog.stats(today),
            last_updated: catalog.last_updated.map(|ts| format_time_ago(ts, now)),
            sources: catalog.active_sources().take(SOURCES_SHOWN).collect(),
            qualifications: options(&QUALIFICATIONS, &criteria.qualification),
            departments: options(&DEPARTMENTS, &criteria.department),
            locations: options(&LOCATIONS, &criteria.location),
            sorts: options(&SORTS, sort.as_str()),
            chips: QuickFilter::ALL
                .iter()
                .map(|chip| Chip {
                    value: chip.as_str(),
                    label: chip.label(),
                    active: active_chip == Some(*chip),
                })
                .collect(),
            notice,
            return_to,
        }
    }

    pub fn is_saved_page(&self) -> bool {
        self.page == Page::Saved
    }
}

#[derive(Template)]
#[template(path = "suggest.html")]
pub struct SuggestPage {
    pub form: SuggestionForm,
    pub departments: Vec<SelectOption>,
    pub notice: Option<String>,
    pub issue_url: Option<String>,
}

impl SuggestPage {
    pub fn new(form: SuggestionForm, notice: Option<String>, issue_url: Option<String>) -> Self {
        let departments = options(&DEPARTMENTS[1..], &form.department);
        Self {
            form,
            departments,
            notice,
            issue_url,
        }
    }

    pub fn state_value(&self) -> &str {
        self.form.state.as_deref().unwrap_or("")
    }

    pub fn email_value(&self) -> &str {
        self.form.email.as_deref().unwrap_or("")
    }
}

#[derive(Template)]
#[template(path = "share.html")]
pub struct SharePage {
    pub data: ShareData,
    pub clipboard: String,
}
