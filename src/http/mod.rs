//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → request.rs (method, query parameters, request ID)
//!     → [dispatcher validates, authenticates, queries]
//!     → response.rs (CORS + JSON headers, status, body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{InboundRequest, X_REQUEST_ID};
pub use response::GatewayResponse;
pub use server::HttpServer;
