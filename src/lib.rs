//! Government job listings: feed loading, filtering, saved jobs and source
//! suggestions, served as HTML.

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod saved;
pub mod server;
pub mod shell;
pub mod store;
pub mod suggest;
pub mod views;
