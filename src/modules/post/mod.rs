pub mod controller;
pub mod model;
pub mod post_service;
pub mod repository;
