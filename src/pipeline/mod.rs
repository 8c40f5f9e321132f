//! Pipeline stages for batch PDF-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step, with no
//! shared state between them, so every stage is independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ parse ──▶ merge ──▶ write
//! (fs)     (cloud)   (strings) (fs)
//! ```
//!
//! 1. [`scan`]  — enumerate `.pdf` entries in the input folder
//! 2. parsing   — [`crate::client`] / [`crate::parser`]; the only stage
//!    with network I/O
//! 3. [`merge`] — join a file's pages into one Markdown string, dropping
//!    the repeated header paragraph on pages after the first
//! 4. [`write`] — persist merged output (or individual pages) to disk

pub mod merge;
pub mod scan;
pub mod write;
