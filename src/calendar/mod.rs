pub mod event;
pub mod fixtures;
pub mod grouping;

pub use event::{PiEvent, SortKey};
pub use fixtures::generate_fixture_events;
pub use grouping::{group_by_day, sort_events, DayBuckets};
