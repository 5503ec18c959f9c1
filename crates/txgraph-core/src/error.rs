use bitcoin::Txid;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("transaction input not found in graph: {0}")]
    InputNotFound(Txid),

    #[error("missing node in graph: {0}")]
    MissingAncestor(Txid),

    #[error("output {vout} of {txid} not found in graph")]
    MissingOutput { txid: Txid, vout: u32 },

    #[error("amount overflow while summing the inputs or outputs of {0}")]
    AmountOverflow(Txid),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

/// Graph shapes rejected by [`crate::TxGraph::fees_and_values`].
#[derive(Debug, thiserror::Error)]
pub enum PreconditionError {
    #[error("{0} is a known transaction with no known funding, yet it spends inputs")]
    KnownTail(Txid),

    #[error(
        "expected graph to contain the input transactions of the first funding transactions, \
         but {0} funds a tracked address"
    )]
    ExternallyFunded(Txid),
}

/// Coarse classification of a [`GraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An input references a node or output the graph does not hold, or
    /// amounts exceed what a transaction can carry.
    Inconsistency,
    /// The graph does not have the shape the query expects.
    Precondition,
    /// A transaction needed for a fee is unknown to the graph.
    Lookup,
}

impl GraphError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputNotFound(_) => ErrorKind::Lookup,
            Self::MissingAncestor(_) | Self::MissingOutput { .. } | Self::AmountOverflow(_) => {
                ErrorKind::Inconsistency
            }
            Self::Precondition(_) => ErrorKind::Precondition,
        }
    }
}
