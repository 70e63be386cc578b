pub mod account;
pub mod catalog;
pub mod config;
pub mod context;
pub mod details;
pub mod list;
pub mod prompts;
pub mod tools;
pub mod ui;
