// src/lib.rs

pub mod api;
pub mod canned;
pub mod chatbot;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod errors;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod ui;
pub mod utils;

pub use chatbot::Chatbot;
pub use errors::{CareError, CareResult};
