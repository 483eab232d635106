pub mod admin;
pub mod advanced_results;
pub mod auth;
pub mod contact;
pub mod extractors;
pub mod projects;
