pub mod action;
pub mod dashboard;
pub mod setup;
pub mod ui;
