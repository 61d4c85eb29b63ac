//! `telfill-enrich` — CPF contact-enrichment engine.
//!
//! Pure engine crate: receives pre-parsed tables, returns the enriched
//! output table plus a structured run report. No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod mapper;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod report;
pub mod schema;
pub mod source;

pub use config::EnrichConfig;
pub use engine::run;
pub use error::EnrichError;
pub use model::{MergeTable, Mode, Priority, SourceBatch, SourceRecord, Table};
pub use report::{ReportEvent, RunReport};
