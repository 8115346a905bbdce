//! Project data: the artifact model and its collaborative document form.
//!
//! - `model`: every artifact type, from [`ParsedPrompt`] to [`ProjectComponents`]
//! - `document`: [`ProjectDocument`], an Automerge-backed store for a project
//! - `wasm`: WASM bindings for browser usage (JsProjectGenerator)

pub mod document;
pub mod model;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use document::ProjectDocument;
pub use model::*;

#[cfg(feature = "wasm")]
pub use wasm::JsProjectGenerator;
