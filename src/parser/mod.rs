pub mod lexer;
pub mod import_scanner;

pub use lexer::{Lexer, Token};
pub use import_scanner::{scan_file, scan_source, ImportScan, CGO_IMPORT, UNSAFE_IMPORT};
