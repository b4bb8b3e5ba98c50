//! Recording user-suggested job sources.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::error::{HandoffError, ValidationError};
use crate::models::Suggestion;
use crate::shell::{Opened, Shell};
use crate::store::{Store, StoreExt, SOURCES, SUGGESTIONS};

const OFFICIAL_SUFFIXES: [&str; 3] = [".gov.in", ".nic.in", ".ac.in"];
const OFFICIAL_WORDS: [&str; 2] = ["government", "official"];

pub const INVALID_URL_NOTICE: &str = "Please provide a valid .gov.in or official URL";
pub const SUBMITTED_NOTICE: &str = "Suggestion submitted for review!";
pub const HANDOFF_FAILED_NOTICE: &str = "Failed to submit. Try email option.";

/// Raw suggestion form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionForm {
    pub name: String,
    pub url: String,
    pub department: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl SuggestionForm {
    /// Trims fields, turns blank optionals into `None` and drops the state
    /// unless the department is a state government.
    pub fn into_suggestion(self, submitted_at: DateTime<Utc>) -> Suggestion {
        let optional = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let department = self.department.trim().to_string();
        let state = if department.eq_ignore_ascii_case("state") {
            optional(self.state)
        } else {
            None
        };
        Suggestion {
            name: self.name.trim().to_string(),
            url: self.url.trim().to_string(),
            department,
            state,
            email: optional(self.email),
            submitted_at,
        }
    }
}

/// Matches the whole input, so a trailing slash after the domain does not
/// count as ending in `.gov.in`.
pub fn is_official_url(url: &str) -> bool {
    let url = url.to_lowercase();
    OFFICIAL_SUFFIXES.iter().any(|suffix| url.ends_with(suffix))
        || OFFICIAL_WORDS.iter().any(|word| url.contains(word))
}

pub fn validate(url: &str) -> Result<(), ValidationError> {
    if is_official_url(url) {
        Ok(())
    } else {
        Err(ValidationError { url: url.to_string() })
    }
}

pub fn issue_body(suggestion: &Suggestion) -> String {
    format!(
        "\n## New Source Suggestion\n\n\
         **Name:** {name}\n\
         **URL:** {url}\n\
         **Department:** {department}\n\
         **State:** {state}\n\
         **Submitted by:** {email}\n\
         **Date:** {date}\n\n\
         ### Verification Checklist\n\
         - [ ] URL is accessible\n\
         - [ ] Contains job notifications\n\
         - [ ] Official government site\n\
         - [ ] Added to scraper\n",
        name = suggestion.name,
        url = suggestion.url,
        department = suggestion.department,
        state = suggestion.state.as_deref().unwrap_or("N/A"),
        email = suggestion.email.as_deref().unwrap_or("Anonymous"),
        date = suggestion.submitted_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    )
}

/// Pre-filled issue-creation page under `issue_base` (a repository URL).
pub fn issue_url(issue_base: &str, suggestion: &Suggestion) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("{}/issues/new", issue_base.trim_end_matches('/')))?;
    url.query_pairs_mut()
        .append_pair("title", &format!("Suggest Source: {}", suggestion.name))
        .append_pair("body", &issue_body(suggestion));
    Ok(url)
}

/// A validated suggestion after it has been recorded.
#[derive(Debug)]
pub struct Submission {
    pub suggestion: Suggestion,
    pub handoff: Result<Opened, HandoffError>,
}

impl Submission {
    pub fn notice(&self) -> &'static str {
        match self.handoff {
            Ok(_) => SUBMITTED_NOTICE,
            Err(_) => HANDOFF_FAILED_NOTICE,
        }
    }
}

pub struct Recorder<'a> {
    store: &'a dyn Store,
    shell: &'a dyn Shell,
    issue_base: &'a str,
}

impl<'a> Recorder<'a> {
    pub fn new(store: &'a dyn Store, shell: &'a dyn Shell, issue_base: &'a str) -> Self {
        Recorder {
            store,
            shell,
            issue_base,
        }
    }

    /// Rejects non-official URLs without side effects. Otherwise the
    /// suggestion is stored locally first, then handed off; a failed
    /// handoff is reported in the returned [`Submission`], not as an error.
    pub fn submit(&self, form: SuggestionForm, now: DateTime<Utc>) -> Result<Submission, ValidationError> {
        validate(form.url.trim())?;
        let suggestion = form.into_suggestion(now);

        self.record_locally(&suggestion);

        let handoff = issue_url(self.issue_base, &suggestion)
            .map_err(HandoffError::from)
            .and_then(|url| self.shell.open(url.as_str()));
        if let Err(err) = &handoff {
            tracing::warn!("suggestion for {} kept locally, handoff failed: {err}", suggestion.url);
        } else {
            tracing::info!("suggestion for {} submitted", suggestion.url);
        }

        Ok(Submission { suggestion, handoff })
    }

    fn record_locally(&self, suggestion: &Suggestion) {
        if let Err(err) = self.store.append(SUGGESTIONS, suggestion.clone()) {
            tracing::warn!("could not store suggestion locally: {err}");
        }
        if let Err(err) = self.store.append(SOURCES, suggestion.as_pending_source()) {
            tracing::warn!("could not store pending source locally: {err}");
        }
    }
}
