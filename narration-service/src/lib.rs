//! Bilingual narration engine for MediScan Engine
//!
//! Turns a composed result message into speech, mixing two languages
//! within a single utterance: drug names and ingredients stay in Latin
//! script while the surrounding text is Vietnamese (or whichever base
//! language is configured).
//!
//! The pipeline has three small pieces:
//!
//! - [`segmenter`] - splits a message into maximal same-language runs
//!   using a lightweight diacritic/shape heuristic (lossless: the segments
//!   concatenate back to the input)
//! - [`voice`] - picks the best available platform voice for a language
//!   tag, with graceful fallbacks
//! - [`sequencer`] - plays segments strictly in order through the single
//!   process-wide speech channel, with cancellation that stops the
//!   in-flight utterance and guarantees at most one active job
//!
//! Speech output itself sits behind the [`providers::SpeechPlatform`]
//! trait; an HTTP provider and a silent fallback are included.
//!
//! # Example
//!
//! ```rust,no_run
//! use narration_service::{NarrationConfig, Narrator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let narrator = Narrator::from_config(NarrationConfig::from_env())?;
//!
//! let handle = narrator.narrate("Paracetamol 500mg giúp hạ sốt", "vi-VN");
//! // ... a new scan arriving would call narrator.narrate(...) again,
//! // cancelling this job implicitly, or:
//! handle.cancel();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod messages;
pub mod providers;
pub mod segmenter;
pub mod sequencer;
pub mod voice;

pub use config::*;
pub use error::*;
pub use messages::*;
pub use providers::{create_platform, SpeechPlatform, UtteranceRequest};
pub use segmenter::*;
pub use sequencer::*;
pub use voice::*;
