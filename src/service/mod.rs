//! Plug-and-play directory lookup routes for Axum.
//!
//! This module exposes [`GraphClient`](crate::GraphClient) lookups over HTTP
//! for host applications: the host builds the client, mounts the router, and
//! the rest is handled here.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use graph_directory::{ClientCredential, GraphClient, GraphConfig};
//! use graph_directory::service::{GraphServiceConfig, user_routes};
//!
//! let credential = ClientCredential::from_env()?;
//! let client = GraphClient::new(GraphConfig::from_env()?, credential);
//!
//! let app = axum::Router::new()
//!     .merge(user_routes(GraphServiceConfig::new(), client));
//!
//! // GET /api/users?username=alice@contoso.com -> 200 "User: <id>"
//! // GET /api/users/alice@contoso.com          -> 200 JSON user record
//! ```

mod config;
mod error;
mod routes;
mod state;

pub use config::GraphServiceConfig;
pub use error::ServiceError;
pub use routes::user_routes;
