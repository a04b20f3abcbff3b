//! Scroll-to-value interpolation.
//!
//! Only linear interpolation is supported; the map is closed-form and pure.

pub mod functions;

pub use functions::{format_css_number, is_valid_over, progress, round_hundredths, value_at};
