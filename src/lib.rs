#![doc = include_str!("../README.md")]

pub mod client;
pub mod credential;
pub mod error;
#[cfg(feature = "service")]
pub mod service;
pub mod types;

// Re-exports for convenient access
pub use client::{DirectoryLookup, GraphClient, GraphConfig};
pub use credential::{
    ClientCredential, ClientSecretProvider, StaticTokenProvider, TokenProvider,
};
pub use error::Error;
pub use types::{DirectoryUser, UserId, UserPrincipalName};
