//! Small shared helpers

pub mod code;
pub mod time;

pub use code::sanitize_code;
pub use time::format_day_label;
