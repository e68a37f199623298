pub mod types;
pub mod evaluation;
pub mod search;
pub mod logger_extensions;


pub use types::*;
pub use evaluation::*;
pub use search::*;
pub use logger_extensions::SelectionLogging;
