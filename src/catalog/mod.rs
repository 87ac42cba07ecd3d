pub mod detail;
pub mod fetch;
pub mod fields;
pub mod image;
pub mod movie;
pub mod types;
pub mod worker;
