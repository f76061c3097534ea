//! Converts the Mérimée historic-monuments CSV export into the castle
//! dataset JSON read by `castellarium-core`.

pub mod centuries;
pub mod convert;
pub mod error;
pub mod selection;

pub use centuries::{centuries_from_text, centuries_from_years, roman, roman_to_int};
pub use convert::{
    convert, import_file, parse_coords, record_from_row, DatasetCoordinates, DatasetRecord,
    ImportSummary, Row,
};
pub use error::IngestError;
pub use selection::is_selected;
