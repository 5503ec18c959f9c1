pub mod address;
pub mod error;
pub mod fees;
pub mod graph;
pub mod node;
pub mod types;

#[cfg(test)]
mod test_util;

pub use error::{ErrorKind, GraphError, PreconditionError};
pub use fees::{AddressSet, FeeAndValue};
pub use graph::{TxGraph, DEFAULT_NETWORK};
pub use node::Node;
pub use types::{Ancestry, GraphTx};
