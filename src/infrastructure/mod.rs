pub mod file_source;
pub mod workbook_decoder;

pub use file_source::{content_type_for, FileReader, MemoryReader, PathReader, SelectedFile};
pub use workbook_decoder::{CalamineDecoder, SheetRows, WorkbookDecoder};
