//! Image-sharing feed backed by a single JSON file.
//!
//! Users, posts and likes live in one document that is loaded, changed and
//! rewritten as a whole for every operation (see [`modules::store`]). The
//! post repository joins them into [`modules::post::model::FeedPost`]s, and
//! [`modules::feed::reconciler`] holds the client-side optimistic view of a
//! feed while like toggles are in flight.

pub mod app_state;
pub mod application;
pub mod config;
pub mod error;
pub mod modules;
