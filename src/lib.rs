//! pvai is a `pv`-style pipe relay that asks a remote LLM what it thinks of the
//! data flowing through it.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the relay loop, prompt construction, incremental text
//!   decoding, the commentary client, and secrets loading.
//! - [`api`] defines the Gemini request/response payloads and model listing.
//! - [`cli`] parses flags, wires up logging and interruption handling, and
//!   drives [`core::relay::run_relay`] over the process stdio handles.
//! - [`utils`] holds URL, logging, and formatting helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod utils;
