pub mod invalidation;
pub mod reconciler;
