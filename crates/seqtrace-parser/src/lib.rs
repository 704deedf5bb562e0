pub mod error;
pub mod filter;
pub mod input;
pub mod parser;

pub use error::{Error, Result};
pub use filter::FilterCriteria;
pub use input::read_log_lines;
pub use parser::{LogLineParser, ParseOutcome, ParseStats};
