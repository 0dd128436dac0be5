pub mod approval;
pub mod handlers;
pub mod models;
pub mod store;
