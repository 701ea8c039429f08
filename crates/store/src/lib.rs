pub mod error;
pub mod persist;
pub mod store;
pub mod vocab;

pub use error::{ErrorKind, Result, StoreError};
pub use persist::JsonDirectory;
pub use store::{
    AnnotationDefaults, DocumentStore, NewDocument, NewEntity, NewRelation, StoreStats,
};
pub use vocab::load_vocabulary;
