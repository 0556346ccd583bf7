use url::form_urlencoded;

use crate::Timestamp;

const QUERY_KEY: &str = "query";
const SINCE_KEY: &str = "since";

/// Immutable snapshot of what the result stream is searching for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SearchParams {
    pub query: String,
    pub since: Option<Timestamp>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>, since: Option<Timestamp>) -> Self {
        Self {
            query: query.into(),
            since,
        }
    }
}

/// A navigation change carrying only the field that was edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationUpdate {
    Query(String),
    Since(String),
}

/// Shareable navigation state: the `query` and `since` URL parameters.
///
/// Both are independent; an absent or empty value means "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationState {
    query: Option<String>,
    since: Option<String>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a URL query string such as `?query=cat&since=2014-01-01`.
    /// Unknown keys are ignored; a repeated key keeps its last value.
    pub fn from_query_string(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut state = Self::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                QUERY_KEY => state.query = Some(value.into_owned()),
                SINCE_KEY => state.since = Some(value.into_owned()),
                _ => {}
            }
        }
        state
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in [(QUERY_KEY, &self.query), (SINCE_KEY, &self.since)] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// Merge a partial update, leaving the other field untouched.
    pub fn apply(&mut self, update: &NavigationUpdate) {
        match update {
            NavigationUpdate::Query(query) => self.query = Some(query.clone()),
            NavigationUpdate::Since(since) => self.since = Some(since.clone()),
        }
    }

    pub fn query(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }

    pub fn since(&self) -> &str {
        self.since.as_deref().unwrap_or_default()
    }

    pub fn params(&self) -> SearchParams {
        let since = self
            .since
            .as_deref()
            .map(str::trim)
            .filter(|since| !since.is_empty())
            .map(Timestamp::from);
        SearchParams::new(self.query(), since)
    }
}

/// The two editable search fields.
///
/// Seeding the form from navigation never produces an update; only edits that
/// change a field do, and each one names that field alone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchForm {
    query: String,
    since: String,
}

impl SearchForm {
    pub fn from_navigation(navigation: &NavigationState) -> Self {
        Self {
            query: navigation.query().to_string(),
            since: navigation.since().to_string(),
        }
    }

    pub fn edit_query(&mut self, text: impl Into<String>) -> Option<NavigationUpdate> {
        let text = text.into();
        if text == self.query {
            return None;
        }
        self.query = text.clone();
        Some(NavigationUpdate::Query(text))
    }

    pub fn edit_since(&mut self, text: impl Into<String>) -> Option<NavigationUpdate> {
        let text = text.into();
        if text == self.since {
            return None;
        }
        self.since = text.clone();
        Some(NavigationUpdate::Since(text))
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn since(&self) -> &str {
        &self.since
    }
}
