pub mod config;
pub mod edit;
pub mod print;
pub mod trash;
