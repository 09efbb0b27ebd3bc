//! MediScan Engine HTTP server
//!
//! External glue around the scan pipeline: three endpoints that feed the
//! core and relay its outcomes.
//!
//! - `POST /scan` - a base64 frame (or a user-confirmed candidate string)
//!   in, a resolved/blocked/not-found payload out
//! - `GET /drugs/search?q=` - catalog contains-search
//! - `GET /health` - liveness and catalog size
//!
//! No pipeline logic lives here; handlers drive ephemeral
//! [`scan_service::ScanSession`]s against shared state.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_app;
pub use state::AppState;
