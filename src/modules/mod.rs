pub mod feed;
pub mod post;
pub mod store;
pub mod upload;
