pub mod paged;
pub mod story;

pub use paged::PagedResult;
pub use story::{Story, StoryId};
