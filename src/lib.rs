pub mod config;
pub mod contents;
pub mod error;
pub mod web;

pub use error::{ContentsError, HostError};
