use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandoffMode {
    Browser,
    None,
}

/// Runtime settings, read from `SARKARI_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub listen_addr: String,
    pub jobs_feed: String,
    pub sources_feed: String,
    /// Directory for persisted preferences. Empty keeps them in memory.
    pub store_dir: String,
    pub static_dir: String,
    pub issue_base: String,
    pub share_url: String,
    pub handoff: HandoffMode,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_env(Environment::with_prefix("SARKARI"))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let issue_base = "https://github.com/sarkari-jobs/sarkari-jobs-portal";
        let conf = Config::builder()
            .set_default("listen_addr", "0.0.0.0:3000")?
            .set_default("jobs_feed", "data/jobs.json")?
            .set_default("sources_feed", "data/sources.json")?
            .set_default("store_dir", "data/store")?
            .set_default("static_dir", "static")?
            .set_default("issue_base", issue_base)?
            .set_default("share_url", "")?
            .set_default("handoff", "browser")?
            .add_source(env)
            .build()?;
        let mut s: Settings = conf.try_deserialize()?;
        if s.share_url.is_empty() {
            s.share_url = format!("{}/releases", s.issue_base.trim_end_matches('/'));
        }
        Ok(s)
    }
}
