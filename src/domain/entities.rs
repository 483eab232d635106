pub mod contact;
pub mod envelope;
pub mod list_query;
pub mod option_fields;
pub mod project;
pub mod token;
pub mod user;
