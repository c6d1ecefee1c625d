//! Apple cultivar catalog
//!
//! Record model, spreadsheet reading and image matching used by ingestion.

pub mod images;
pub mod record;
pub mod source;

pub use images::ImageIndex;
pub use record::CultivarRecord;
pub use source::{read_records, SourceError};
