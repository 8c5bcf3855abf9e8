pub mod dialog;
pub mod help;
pub mod panel;
pub mod preview;
pub mod status_bar;
