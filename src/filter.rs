//! Filtering and ordering of the job catalog.
//!
//! Everything here is a pure function over a slice of jobs; the caller
//! decides which [`Listing`] is in effect.

use chrono::{Days, NaiveDate};

use crate::models::Job;

/// Value of a filter field that matches every job.
pub const ANY: &str = "all";

/// Jobs with this many days left or fewer are flagged urgent.
pub const URGENT_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    Newest,
    Deadline,
    /// Keep the incoming order.
    #[default]
    Unsorted,
}

impl SortKey {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "newest" => SortKey::Newest,
            "deadline" => SortKey::Deadline,
            _ => SortKey::Unsorted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Deadline => "deadline",
            SortKey::Unsorted => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub qualification: String,
    pub department: String,
    pub location: String,
    pub sort: SortKey,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            qualification: ANY.into(),
            department: ANY.into(),
            location: ANY.into(),
            sort: SortKey::default(),
        }
    }
}

impl FilterCriteria {
    /// Missing or blank fields mean "all".
    pub fn new(
        qualification: Option<&str>,
        department: Option<&str>,
        location: Option<&str>,
        sort: Option<&str>,
    ) -> Self {
        let field = |value: Option<&str>| match value.map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => ANY.to_string(),
        };
        Self {
            qualification: field(qualification),
            department: field(department),
            location: field(location),
            sort: sort.map(SortKey::parse).unwrap_or_default(),
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        let qualification = self.qualification == ANY
            || contains_ignore_case(&job.qualification, &self.qualification);
        let department =
            self.department == ANY || job.department.to_lowercase() == self.department.to_lowercase();
        let location =
            self.location == ANY || contains_ignore_case(&job.location, &self.location);
        qualification && department && location
    }
}

/// Single-predicate shortcut chips. Applying one replaces the field filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickFilter {
    Today,
    Week,
    Tenth,
    Graduate,
}

impl QuickFilter {
    pub const ALL: [QuickFilter; 4] = [
        QuickFilter::Today,
        QuickFilter::Week,
        QuickFilter::Tenth,
        QuickFilter::Graduate,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "today" => Some(QuickFilter::Today),
            "week" => Some(QuickFilter::Week),
            "10th" => Some(QuickFilter::Tenth),
            "graduate" => Some(QuickFilter::Graduate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuickFilter::Today => "today",
            QuickFilter::Week => "week",
            QuickFilter::Tenth => "10th",
            QuickFilter::Graduate => "graduate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuickFilter::Today => "Today",
            QuickFilter::Week => "This Week",
            QuickFilter::Tenth => "10th Pass",
            QuickFilter::Graduate => "Graduate",
        }
    }

    pub fn matches(&self, job: &Job, today: NaiveDate) -> bool {
        match self {
            QuickFilter::Today => job.posted_date == today,
            QuickFilter::Week => today
                .checked_sub_days(Days::new(7))
                .map_or(true, |week_ago| job.posted_date >= week_ago),
            QuickFilter::Tenth | QuickFilter::Graduate => {
                contains_ignore_case(&job.qualification, self.as_str())
            }
        }
    }
}

/// Which subset of the catalog is on screen. Exactly one mode at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Fields(FilterCriteria),
    Quick(QuickFilter),
    Saved,
}

pub fn filter<'a>(jobs: &'a [Job], criteria: &FilterCriteria) -> Vec<&'a Job> {
    let mut matched: Vec<&Job> = jobs.iter().filter(|job| criteria.matches(job)).collect();
    sort_jobs(&mut matched, criteria.sort);
    matched
}

/// Keeps catalog order.
pub fn quick_filter<'a>(jobs: &'a [Job], quick: QuickFilter, today: NaiveDate) -> Vec<&'a Job> {
    jobs.iter().filter(|job| quick.matches(job, today)).collect()
}

/// Stable sort, so ties keep their prior relative order.
pub fn sort_jobs(jobs: &mut [&Job], key: SortKey) {
    match key {
        SortKey::Newest => jobs.sort_by(|a, b| b.posted_date.cmp(&a.posted_date)),
        SortKey::Deadline => jobs.sort_by(|a, b| a.deadline.cmp(&b.deadline)),
        SortKey::Unsorted => {}
    }
}

pub fn days_left(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days().max(0)
}

pub fn is_urgent(days_left: i64) -> bool {
    days_left <= URGENT_DAYS
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn job(id: &str, qualification: &str, department: &str, location: &str, posted: &str, deadline: &str) -> Job {
        Job {
            id: id.into(),
            title: format!("{id} post"),
            organization: "Board".into(),
            qualification: qualification.into(),
            department: department.into(),
            location: location.into(),
            posted_date: date(posted),
            deadline: date(deadline),
            notification_url: String::new(),
            apply_url: String::new(),
            salary: None,
            official_url: None,
        }
    }

    fn catalog() -> Vec<Job> {
        vec![
            job("rrb", "10th Pass", "railway", "All India", "2024-01-17", "2024-02-10"),
            job("ssc", "Graduate", "ssc", "All India", "2024-01-15", "2024-01-25"),
            job("bpsc", "Post Graduate", "state", "Bihar", "2024-01-12", "2024-01-20"),
            job("ibps", "Graduate", "Banking", "Mumbai, Maharashtra", "2024-01-05", "2024-03-01"),
        ]
    }

    fn ids(jobs: &[&Job]) -> Vec<String> {
        jobs.iter().map(|j| j.id.clone()).collect()
    }

    #[test]
    fn all_fields_any_returns_everything_sorted() {
        let mut jobs = catalog();
        jobs.reverse();
        let criteria = FilterCriteria {
            sort: SortKey::Newest,
            ..FilterCriteria::default()
        };
        let newest = filter(&jobs, &criteria);
        assert_eq!(ids(&newest), vec!["rrb", "ssc", "bpsc", "ibps"]);
        assert!(newest.windows(2).all(|w| w[0].posted_date >= w[1].posted_date));

        let criteria = FilterCriteria {
            sort: SortKey::Deadline,
            ..FilterCriteria::default()
        };
        let by_deadline = filter(&jobs, &criteria);
        assert_eq!(by_deadline.len(), jobs.len());
        assert!(by_deadline.windows(2).all(|w| w[0].deadline <= w[1].deadline));
    }

    #[test]
    fn unknown_sort_keeps_order() {
        let mut jobs = catalog();
        jobs.reverse();
        let criteria = FilterCriteria::new(None, None, None, Some("salary"));
        assert_eq!(criteria.sort, SortKey::Unsorted);
        assert_eq!(ids(&filter(&jobs, &criteria)), vec!["ibps", "bpsc", "ssc", "rrb"]);
    }

    #[test]
    fn qualification_is_substring_department_is_exact() {
        let jobs = catalog();
        let grads = filter(&jobs, &FilterCriteria::new(Some("GRADUATE"), None, None, None));
        assert_eq!(ids(&grads), vec!["ssc", "bpsc", "ibps"]);

        let banking = filter(&jobs, &FilterCriteria::new(None, Some("banking"), None, None));
        assert_eq!(ids(&banking), vec!["ibps"]);

        let partial = filter(&jobs, &FilterCriteria::new(None, Some("bank"), None, None));
        assert!(partial.is_empty());
    }

    #[test]
    fn location_and_fields_combine() {
        let jobs = catalog();
        let criteria = FilterCriteria::new(Some("graduate"), Some("all"), Some("maharashtra"), Some("deadline"));
        assert_eq!(ids(&filter(&jobs, &criteria)), vec!["ibps"]);
    }

    #[test]
    fn blank_fields_mean_all() {
        let criteria = FilterCriteria::new(Some(""), Some("  "), None, None);
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn quick_today_only_returns_todays_posts() {
        let today = date("2024-01-18");
        let jobs = vec![
            job("a", "Graduate", "ssc", "All India", "2024-01-18", "2024-02-01"),
            job("b", "Graduate", "ssc", "All India", "2024-01-08", "2024-02-01"),
        ];
        assert_eq!(ids(&quick_filter(&jobs, QuickFilter::Today, today)), vec!["a"]);
    }

    #[test]
    fn quick_week_includes_seven_days_back() {
        let jobs = catalog();
        let week = quick_filter(&jobs, QuickFilter::Week, date("2024-01-19"));
        assert_eq!(ids(&week), vec!["rrb", "ssc", "bpsc"]);
    }

    #[test]
    fn quick_qualification_tokens() {
        let jobs = catalog();
        let today = date("2024-01-18");
        assert_eq!(ids(&quick_filter(&jobs, QuickFilter::Tenth, today)), vec!["rrb"]);
        assert_eq!(
            ids(&quick_filter(&jobs, QuickFilter::Graduate, today)),
            vec!["ssc", "bpsc", "ibps"]
        );
        assert_eq!(QuickFilter::parse("10th"), Some(QuickFilter::Tenth));
        assert_eq!(QuickFilter::parse("monthly"), None);
    }

    #[test]
    fn days_left_and_urgency() {
        let left = days_left(date("2024-01-20"), date("2024-01-18"));
        assert_eq!(left, 2);
        assert!(is_urgent(left));

        assert_eq!(days_left(date("2024-01-10"), date("2024-01-18")), 0);
        assert!(!is_urgent(days_left(date("2024-01-22"), date("2024-01-18"))));
        assert!(is_urgent(days_left(date("2024-01-21"), date("2024-01-18"))));
    }
}
