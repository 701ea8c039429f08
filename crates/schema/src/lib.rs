pub mod document;
pub mod span;
pub mod vocabulary;

pub use document::{
    is_valid_document_id, new_id, Direction, Document, DocumentSummary, Entity, Relation,
    DEFAULT_STATUS,
};
pub use span::{CharIndex, Span};
pub use vocabulary::Vocabulary;
