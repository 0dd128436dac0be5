pub mod admin;
pub mod profile;
