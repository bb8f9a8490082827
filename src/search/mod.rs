//! Search Module
//!
//! Query-side helpers shared by the store and the API.
//!
//! ## Responsibilities
//! - **Tokenization**: filenames and paths are split into lowercase tokens so that
//!   substring search can run over the token index instead of every record.
//! - **Reduction**: every result list is deduplicated by content hash and filtered by
//!   the requested thumbnail size class before it reaches a caller.
//! - **API**: the `/query*` endpoints.
//!
//! ## Submodules
//! - **`tokenizer`**: path tokens, file types, extension patterns.
//! - **`reduce`**: `SizeClass` and `reduce`.
//! - **`handlers`**: HTTP handlers.

pub mod handlers;
pub mod reduce;
pub mod tokenizer;
