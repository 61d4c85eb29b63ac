//! `telfill-io` — file layer for the enrichment pipeline.
//!
//! Owns everything byte-shaped: delimiter detection over a seekable
//! stream, legacy-encoding decode, CSV parse into the engine's table
//! type, and the final CSV export.

pub mod csv;
