pub mod cache;
pub mod recipe;
pub mod status;
