pub mod db;
pub mod document;
pub mod error;
pub mod parser;
pub mod report;
pub mod vocab;

pub use error::{DocumentError, VocabError};
pub use parser::record::{DailyRecord, Match, NoteItem, OutputRecord, RESOLVED_MARKER};
pub use parser::{daily_records, process_document};
pub use vocab::{SymptomRule, Vocabulary};
