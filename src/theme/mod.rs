//! Theme templates: storage, resolution and validation

pub mod markup;
pub mod store;

pub use markup::{ACTION_ATTR, SUMMARY_PLACEHOLDER_ATTR, action_ids, validate_template};
pub use store::{ThemeInfo, ThemeStore, validate_theme_name};
