//! Loading and filtering of invocation event streams

pub mod events;
pub mod parquet;
pub mod preprocessing;

pub use events::{load_class_list, load_events, EventFormat};
pub use preprocessing::{EventFilter, FilterStats};
