pub mod time;

pub use time::{elapsed_seconds, readable_duration};
