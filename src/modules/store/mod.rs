pub mod file_store;
pub mod model;
pub mod seed;
