//! Search GitHub users and page through their repositories.
//!
//! [`search::SearchController`] and [`repos::RepoList`] hold the fetch state;
//! [`directory::Directory`] is the seam to the API and [`github::GitHub`] its
//! reqwest implementation. The remaining modules are the terminal front end.

pub mod action;
pub mod app;
pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod event;
pub mod github;
pub mod pagination;
pub mod repos;
pub mod search;
pub mod tui;
pub mod types;
pub mod ui;
