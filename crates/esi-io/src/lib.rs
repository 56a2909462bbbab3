//! On-disk inverse-matrix container (writer + reader) and minimal
//! `.spi`/`.sxyz` solution-point text readers.

pub mod container;
pub mod points_text;
pub mod reader;
pub mod writer;

pub use container::{FixedHeader, INVERSE_FILE_MAGIC};
pub use points_text::{parse_points_text, read_points_file, NamedPoint};
pub use reader::InverseFileReader;
pub use writer::{InverseFileWriter, NameTables};
