pub mod clipboard;
pub mod launcher;
pub mod listing;
pub mod operations;
