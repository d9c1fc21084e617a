//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → OPTIONS? → bare 200 preflight
//!     → operation.rs (parse operation + required parameter, no I/O)
//!     → UpstreamCall (endpoint path + query string)
//!     → upstream login → upstream query
//!     → response shaping (CORS, JSON) → GatewayResponse
//! ```
//!
//! # Design Decisions
//! - Unknown or absent operation is a 400
//! - Upstream statuses, including 4xx/5xx, are passed through with their body
//! - Authentication, transport and JSON failures become a 500 naming the
//!   operation

pub mod dispatcher;
pub mod error;
pub mod operation;

pub use dispatcher::Dispatcher;
pub use error::{GatewayError, ValidationError};
pub use operation::{Operation, OperationRequest};
