use serde::{Deserialize, Serialize};

pub type StoryId = u64;

/// One Hacker News item as returned by `item/{id}.json`.
///
/// The same field names are used on the wire towards the frontend, so the
/// struct is both the upstream decode target and the API payload.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Story {
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub descendants: i32,
    pub id: StoryId,
    #[serde(default)]
    pub kids: Vec<StoryId>,
    #[serde(default)]
    pub score: i32,
    /// Creation time, Unix epoch seconds.
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Absent for text posts and non-story items such as comments.
    #[serde(default)]
    pub url: Option<String>,
}

impl Story {
    /// True when the story links somewhere: URL present and not blank.
    #[must_use]
    pub fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }

    /// Case-insensitive substring match on the title.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn title_contains(&self, needle: &str) -> bool {
        !self.title.is_empty() && self.title.to_lowercase().contains(needle)
    }
}
