//! Upstream transit API integration.
//!
//! # Data Flow
//! ```text
//! Dispatcher
//!     → session.rs (POST login with access token, read "true", extract cookie)
//!     → Credential (apiCredentials=<value>)
//!     → client.rs (GET data endpoint with Cookie header)
//!     → ProxyResult (status + JSON body)
//! ```
//!
//! # Security Constraints
//! - Access token comes from configuration only
//! - Neither the token nor the credential is ever logged
//!
//! # Design Decisions
//! - Two strictly sequential calls; the query needs the login's cookie
//! - No retries, no credential caching, no extra timeouts

pub mod client;
pub mod session;
pub mod types;

pub use client::TransitClient;
pub use session::SessionAuthenticator;
pub use types::{
    AuthenticationError, Credential, ProxyResult, UpstreamCall, UpstreamError, UpstreamResult,
};
