//! Fixed configuration shared across the application

/// Gemini model asked for commentary.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Upper bound on the bytes relayed (and commented on) per read.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Gemini REST endpoint; overridable with `GEMINI_BASE_URL`.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
