//! Transit API gateway library.
//!
//! Authenticates against the SPTrans Olho Vivo API, forwards line search
//! and arrival forecast queries, and relays the JSON answer with
//! permissive CORS headers.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::GatewayConfig;
pub use dispatch::Dispatcher;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
