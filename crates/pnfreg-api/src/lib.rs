// pnfreg-api: Async HTTP client for VES event collectors

pub mod auth;
pub mod collector;
pub mod error;
pub mod transport;

pub use auth::CollectorAuth;
pub use collector::CollectorClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
