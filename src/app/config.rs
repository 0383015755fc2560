const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Where the backend lives. Baked in at build time through
/// `COURSE_TRACKER_API`, falling back to the local default.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let base = option_env!("COURSE_TRACKER_API").unwrap_or(DEFAULT_API_BASE);
        Self { base_url: base.trim_end_matches('/').to_string() }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
