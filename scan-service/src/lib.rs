//! Scan resolution flow for MediScan Engine
//!
//! Ties the pieces of a scan attempt together: a captured frame goes to
//! the OCR collaborator, the recognized candidates run through the
//! matching cascade, prescription-gated records short-circuit to a
//! reduced-disclosure outcome, and the result is narrated through the
//! narration engine. Every state change is observable on a watch channel
//! so the presentation layer can render the flow without being part of it.
//!
//! ```text
//! Idle -> Capturing -> AwaitingRecognition -> {ReviewingCandidates | Resolving}
//!      -> {Resolved | PrescriptionBlocked | NotFound} -> Idle (on dismiss)
//! ```
//!
//! Recognition sits behind the [`providers::OcrProvider`] trait; a remote
//! HTTP provider and a canned one for development are included.

pub mod config;
pub mod error;
pub mod providers;
pub mod session;

pub use config::*;
pub use error::*;
pub use providers::{create_provider, OcrProvider};
pub use session::*;
