pub mod reader;
pub mod schema;

pub use reader::DatasetReader;
pub use schema::{Dataset, Edge, Entity, EntityKind};
