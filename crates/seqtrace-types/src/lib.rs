pub mod error;
pub mod event;
pub mod record;
pub mod template;

pub use error::{Error, Result};
pub use event::{EventMetadata, SequenceEvent};
pub use record::{LogRecord, Severity};
pub use template::{SequenceMapping, Template};
