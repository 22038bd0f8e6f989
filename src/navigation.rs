//! URL State
//!
//! Tabs and wizard steps live in the query string so a reload or a shared
//! link lands on the same view. [`Location`] parses and rebuilds
//! `path?query` strings with percent-encoding.

use std::fmt;

/// A parsed in-app URL: path plus ordered query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: Vec<(String, String)>,
}

impl Location {
    /// Parse `"/path?a=1&b=2"`. A fragment is discarded.
    pub fn parse(url: &str) -> Self {
        let url = url.split('#').next().unwrap_or_default();
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, query),
            None => (url, ""),
        };

        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(k), decode(v))
            })
            .collect();

        Self {
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            query,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// First value of `key`
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace every value of `key` with `value`, keeping its position
    pub fn set_param(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.query.iter().position(|(k, _)| k == key) {
            Some(pos) => {
                self.query[pos].1 = value;
                let mut seen = false;
                self.query.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.query.push((key.to_string(), value)),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_param(key, value);
        self
    }

    pub fn remove_param(&mut self, key: &str) {
        self.query.retain(|(k, _)| k != key);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, urlencoding::encode(k), urlencoding::encode(v))?;
        }
        Ok(())
    }
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|s| s.into_owned())
        .unwrap_or(raw)
}

/// Tabs of the settings page, synced to `?tab=`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettingsTab {
    #[default]
    Profile,
    Security,
    Notifications,
    Feedback,
}

impl SettingsTab {
    pub const QUERY_KEY: &'static str = "tab";

    pub const ALL: [SettingsTab; 4] = [
        SettingsTab::Profile,
        SettingsTab::Security,
        SettingsTab::Notifications,
        SettingsTab::Feedback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsTab::Profile => "profile",
            SettingsTab::Security => "security",
            SettingsTab::Notifications => "notifications",
            SettingsTab::Feedback => "feedback",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SettingsTab::Profile => "Profile",
            SettingsTab::Security => "Security",
            SettingsTab::Notifications => "Notifications",
            SettingsTab::Feedback => "Feedback",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.as_str() == value)
    }

    /// Tab named by the location, falling back to [`SettingsTab::Profile`]
    pub fn from_location(location: &Location) -> Self {
        location
            .param(Self::QUERY_KEY)
            .and_then(Self::parse)
            .unwrap_or_default()
    }

    /// URL selecting this tab on `location`
    pub fn apply(&self, location: &Location) -> String {
        location
            .clone()
            .with_param(Self::QUERY_KEY, self.as_str())
            .to_string()
    }
}
