//! # Module: Browser Launch
//!
//! ## Responsibility
//! Build web search URLs for the search bar and hand URLs (search results,
//! OneNote notebook links) to the desktop's default handler.
//!
//! ## Guarantees
//! - Queries are trimmed and percent-encoded; a blank query yields no URL
//! - Launch failures are returned, never panicked on
//!
//! ## NOT Responsible For
//! - Deciding when to open anything (see `coordinator`)

use reqwest::Url;

use crate::DashboardError;

/// A web search provider offered by the search bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchEngine {
    /// Google, the Enter default.
    #[default]
    Google,
    /// ChatGPT with the query prefilled.
    ChatGpt,
    /// GitHub code and repository search.
    GitHub,
    /// Brave Search.
    Brave,
}

impl SearchEngine {
    /// Every engine in the order the search bar cycles through them.
    pub const ALL: [SearchEngine; 4] = [
        SearchEngine::Google,
        SearchEngine::ChatGpt,
        SearchEngine::GitHub,
        SearchEngine::Brave,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::ChatGpt => "ChatGPT",
            Self::GitHub => "GitHub",
            Self::Brave => "Brave",
        }
    }

    /// The engine after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Google => Self::ChatGpt,
            Self::ChatGpt => Self::GitHub,
            Self::GitHub => Self::Brave,
            Self::Brave => Self::Google,
        }
    }

    fn base(self) -> &'static str {
        match self {
            Self::Google => "https://www.google.com/search",
            Self::ChatGpt => "https://chat.openai.com/",
            Self::GitHub => "https://github.com/search",
            Self::Brave => "https://search.brave.com/search",
        }
    }

    /// Search URL for `query` with the query in the `q` parameter.
    ///
    /// # Returns
    /// `None` when the query is blank after trimming.
    pub fn search_url(self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Url::parse_with_params(self.base(), &[("q", query)])
            .ok()
            .map(String::from)
    }
}

/// Opens `target` (a URL or a `onenote:` link) with the system handler.
///
/// Blocks until the handler process has been started.
///
/// # Errors
/// Returns `DashboardError::Other` when no handler could be launched.
pub fn open_in_browser(target: &str) -> Result<(), DashboardError> {
    open::that(target).map_err(|e| DashboardError::Other(format!("{target}: {e}")))
}
