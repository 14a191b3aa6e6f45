//! # screenforge-core
//!
//! Shared building blocks for the Screenforge workspace: the error taxonomy used
//! across the assembly pipeline and the validated identifier newtypes exchanged
//! with persistence.

pub mod error;
pub mod types;

pub use error::{Result, ScreenforgeError};
pub use types::{FlowId, MAX_ID_LEN, ScreenId};
