//! HTTP surface for the dashboard actions
//!
//! [`ServerBuilder`] wires a store, an identity provider and the view cache
//! into an axum [`Router`](axum::Router).

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
