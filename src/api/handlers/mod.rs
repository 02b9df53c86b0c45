//! HTTP request handlers for API endpoints.

pub mod health;
pub mod webhooks;
