//! Build-definition files: discovery, grouping and content checks

pub mod dockerfile;
pub mod grouper;
pub mod locator;
pub mod patterns;

pub use dockerfile::copies_user_code;
pub use grouper::{canonical_build_files, group_build_files};
pub use locator::locate_build_files;
