//! Optional runtime capabilities: opening external pages and sharing.
//!
//! A served page cannot drive a native shell, so [`BrowserShell`] hands the
//! URL back for the page to open in a new tab. [`NoShell`] is the fallback
//! when no browser context is available.

use serde::Serialize;

use crate::error::HandoffError;

/// How an external page was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened {
    NewTab(String),
}

impl Opened {
    pub fn url(&self) -> &str {
        match self {
            Opened::NewTab(url) => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareData {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ShareData {
    pub fn for_app(url: impl Into<String>) -> Self {
        Self {
            title: "Sarkari Naukri - Govt Jobs".into(),
            text: "Find latest government job notifications! Download now:".into(),
            url: url.into(),
        }
    }

    /// What goes on the clipboard when no share sheet exists.
    pub fn clipboard_text(&self) -> String {
        format!("{} {}", self.text, self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shared {
    /// The platform share sheet took it.
    Sheet,
    /// Fell back to copying text.
    Clipboard(String),
}

pub trait Shell: Send + Sync {
    fn open(&self, url: &str) -> Result<Opened, HandoffError>;

    fn share(&self, data: &ShareData) -> Shared {
        Shared::Clipboard(data.clipboard_text())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserShell;

impl Shell for BrowserShell {
    fn open(&self, url: &str) -> Result<Opened, HandoffError> {
        tracing::debug!("handing {url} to the browser");
        Ok(Opened::NewTab(url.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoShell;

impl Shell for NoShell {
    fn open(&self, url: &str) -> Result<Opened, HandoffError> {
        Err(HandoffError::Unavailable(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_opens_in_new_tab() {
        let opened = BrowserShell.open("https://github.com/x/y/issues/new").unwrap();
        assert_eq!(opened.url(), "https://github.com/x/y/issues/new");
    }

    #[test]
    fn no_shell_refuses_and_shares_by_clipboard() {
        assert!(matches!(
            NoShell.open("https://example.org"),
            Err(HandoffError::Unavailable(_))
        ));
        let data = ShareData::for_app("https://example.org/releases");
        assert_eq!(
            NoShell.share(&data),
            Shared::Clipboard(
                "Find latest government job notifications! Download now: https://example.org/releases"
                    .into()
            )
        );
    }
}
