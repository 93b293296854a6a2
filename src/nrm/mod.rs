// ABOUTME: Client side of the OESS control API (HTTP query strings, JSON bodies).
// ABOUTME: Exposes typed requests, the transport seam and session bootstrap.

mod client;
mod error;
mod request;
mod session;
mod transport;
pub mod wire;

pub use client::{DEFAULT_TIMEOUT, NrmClient};
pub use error::{NrmError, Result};
pub use request::{IMMEDIATE, NrmRequest, ProvisionRequest};
pub use session::{Credentials, Session, SessionConfig, SessionError, Workgroup};
pub use transport::{HttpTransport, Transport};
