//! # screenforge-store
//!
//! Persistence of assembled screens.
//!
//! [`ScreenStore::insert_screen`] accepts a [`NewScreen`], which can only be
//! built from a [`ValidatedScreen`](screenforge_ui::ValidatedScreen). A screen
//! that failed validation therefore cannot reach storage.

pub mod inmemory;
pub mod service;

pub use inmemory::InMemoryScreenStore;
pub use service::{NewScreen, ScreenStore, StoredScreen};
