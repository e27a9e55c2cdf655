pub mod payments;
pub mod profile;
pub mod sessions;
pub mod webhooks;
