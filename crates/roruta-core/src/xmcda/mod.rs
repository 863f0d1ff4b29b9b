//! XMCDA 2.0 exchange with the decision workbench.
//!
//! - [`writer`]: the six session documents the workbench consumes
//! - [`reader`]: relations and the representative value function it produces

pub mod reader;
pub mod writer;

pub use reader::{
    get_representative_function, read_declared_relations, read_discovered_relations,
    read_relations, RelationOrigin, Relations,
};
pub use writer::{SessionDocuments, XmcdaWriter};
