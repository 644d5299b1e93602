pub mod story_query;
pub mod story_source;

pub use story_query::StoryQuery;
pub use story_source::StorySource;
