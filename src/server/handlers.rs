use axum::extract::{Query, State};
use axum::http::Uri;
use axum::response::Redirect;
use axum::{Form, Json};
use serde::Deserialize;
use url::Url;

use crate::catalog::Stats;
use crate::error::AppResult;
use crate::filter::{FilterCriteria, Listing, QuickFilter};
use crate::server::state::SharedState;
use crate::shell::{ShareData, Shared};
use crate::suggest::{SuggestionForm, INVALID_URL_NOTICE};
use crate::views::{JobsPage, SharePage, SuggestPage};

const NOTICE: &str = "notice";

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub qualification: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub sort: Option<String>,
    pub quick: Option<String>,
    pub notice: Option<String>,
}

impl HomeQuery {
    /// Any `quick` value replaces the field filters; one that names no chip
    /// shows the whole catalog.
    fn listing(&self) -> Listing {
        match self.quick.as_deref() {
            Some(raw) => match QuickFilter::parse(raw) {
                Some(quick) => Listing::Quick(quick),
                None => Listing::Fields(FilterCriteria::default()),
            },
            None => Listing::Fields(FilterCriteria::new(
                self.qualification.as_deref(),
                self.department.as_deref(),
                self.location.as_deref(),
                self.sort.as_deref(),
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub id: String,
    #[serde(default)]
    pub return_to: Option<String>,
}

fn render_jobs(state: &SharedState, listing: Listing, notice: Option<String>, uri: &Uri) -> AppResult<String> {
    let catalog = state.catalog();
    let saved = state.saved();
    let page = JobsPage::build(&catalog, &listing, &saved, state.now(), notice, return_path(uri));
    Ok(askama::Template::render(&page)?)
}

pub async fn home(
    State(state): State<SharedState>,
    Query(query): Query<HomeQuery>,
    uri: Uri,
) -> AppResult<axum::response::Html<String>> {
    let listing = query.listing();
    tracing::debug!("home listing {:?}", listing);
    render_jobs(&state, listing, query.notice, &uri).map(axum::response::Html)
}

pub async fn saved(
    State(state): State<SharedState>,
    Query(query): Query<NoticeQuery>,
    uri: Uri,
) -> AppResult<axum::response::Html<String>> {
    render_jobs(&state, Listing::Saved, query.notice, &uri).map(axum::response::Html)
}

pub async fn toggle_save(State(state): State<SharedState>, Form(form): Form<ToggleForm>) -> Redirect {
    let notice = match state.toggle_saved(&form.id) {
        Ok(toggle) => toggle.notice(),
        Err(err) => {
            tracing::warn!("could not persist saved jobs: {err}");
            "Could not update saved jobs"
        }
    };
    Redirect::to(&with_notice(form.return_to.as_deref().unwrap_or("/"), notice))
}

pub async fn refresh(State(state): State<SharedState>) -> Redirect {
    let notice = match state.refresh().await {
        Ok(stats) => {
            tracing::info!("refreshed catalog: {} jobs", stats.total_jobs);
            "Refreshed successfully!"
        }
        Err(err) => {
            tracing::error!("Error loading jobs: {err}");
            "Failed to load jobs"
        }
    };
    Redirect::to(&with_notice("/", notice))
}

pub async fn suggest_form() -> SuggestPage {
    SuggestPage::new(SuggestionForm::default(), None, None)
}

pub async fn suggest(State(state): State<SharedState>, Form(form): Form<SuggestionForm>) -> SuggestPage {
    match state.recorder().submit(form.clone(), state.now()) {
        Ok(submission) => {
            let issue_url = submission.handoff.as_ref().ok().map(|opened| opened.url().to_string());
            SuggestPage::new(SuggestionForm::default(), Some(submission.notice().to_string()), issue_url)
        }
        Err(err) => {
            tracing::info!("rejected suggestion: {err}");
            SuggestPage::new(form, Some(INVALID_URL_NOTICE.to_string()), None)
        }
    }
}

pub async fn share(State(state): State<SharedState>) -> SharePage {
    let data = ShareData::for_app(state.settings.share_url.clone());
    let clipboard = match state.shell().share(&data) {
        Shared::Clipboard(text) => text,
        Shared::Sheet => data.clipboard_text(),
    };
    SharePage { data, clipboard }
}

pub async fn livez() -> &'static str {
    tracing::debug!("service is live");
    "ok"
}

pub async fn healthz(State(state): State<SharedState>) -> Json<Stats> {
    let stats = state.catalog().stats(state.today());
    Json(stats)
}

/// Current path and query minus any notice, for posting back to.
fn return_path(uri: &Uri) -> String {
    let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    strip_query_param(target, NOTICE)
}

/// Only local absolute paths are honoured; anything else falls back to `/`.
fn with_notice(return_to: &str, notice: &str) -> String {
    let base = if return_to.starts_with('/') && !return_to.starts_with("//") {
        strip_query_param(return_to, NOTICE)
    } else {
        "/".to_string()
    };
    let separator = if base.contains('?') { '&' } else { '?' };
    let encoded: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(NOTICE, notice)
        .finish();
    format!("{base}{separator}{encoded}")
}

fn strip_query_param(target: &str, name: &str) -> String {
    let Ok(mut url) = Url::parse("http://localhost").and_then(|base| base.join(target)) else {
        return "/".to_string();
    };
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != name)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_is_appended_and_replaced() {
        assert_eq!(with_notice("/", "Job saved!"), "/?notice=Job+saved%21");
        assert_eq!(
            with_notice("/?quick=week&notice=old", "Removed from saved"),
            "/?quick=week&notice=Removed+from+saved"
        );
    }

    #[test]
    fn foreign_return_targets_are_dropped() {
        assert_eq!(with_notice("https://evil.example", "x"), "/?notice=x");
        assert_eq!(with_notice("//evil.example/", "x"), "/?notice=x");
    }

    #[test]
    fn return_path_strips_notice() {
        let uri: Uri = "/saved?notice=Job+saved%21".parse().unwrap();
        assert_eq!(return_path(&uri), "/saved");
        let uri: Uri = "/?department=ssc&sort=deadline".parse().unwrap();
        assert_eq!(return_path(&uri), "/?department=ssc&sort=deadline");
    }

    #[test]
    fn quick_chip_replaces_field_filters() {
        let query = HomeQuery {
            department: Some("ssc".into()),
            quick: Some("today".into()),
            ..HomeQuery::default()
        };
        assert_eq!(query.listing(), Listing::Quick(QuickFilter::Today));

        let query = HomeQuery {
            department: Some("ssc".into()),
            quick: Some("monthly".into()),
            ..HomeQuery::default()
        };
        assert_eq!(query.listing(), Listing::Fields(FilterCriteria::default()));

        let query = HomeQuery {
            department: Some("ssc".into()),
            ..HomeQuery::default()
        };
        assert!(matches!(query.listing(), Listing::Fields(c) if c.department == "ssc"));
    }
}
