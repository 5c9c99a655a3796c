#![warn(clippy::uninlined_format_args)]

pub mod group_document;

pub use group_document::{GroupDocument, GroupMember, JsonGroupDocument};
