use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::node::{NodeInfo, ZWaveEndpoint};

/// Marks the start of a data frame transaction inside the protocol engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionStartedEvent {
    id: String,
}

impl TransactionStartedEvent {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for TransactionStartedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionStartedEvent{{id={}}}", self.id)
    }
}

/// Lifecycle notifications emitted by a controller. Each one is delivered
/// once and never acknowledged.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    NodeAdded(ZWaveEndpoint),
    NodeUpdated(ZWaveEndpoint),
    ConnectionFailure(Arc<dyn Error + Send + Sync>),
    ControllerInfo {
        library_version: String,
        home_id: u32,
        node_id: u8,
    },
    InclusionStarted,
    Inclusion {
        node_info: NodeInfo,
        success: bool,
    },
    InclusionStopped,
    ExclusionStarted,
    Exclusion {
        node_info: NodeInfo,
        success: bool,
    },
    ExclusionStopped,
    TransactionStarted(TransactionStartedEvent),
}

impl ControllerEvent {
    pub fn connection_failure<E>(cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::ConnectionFailure(Arc::new(cause))
    }

    /// Short name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NodeAdded(_) => "node_added",
            Self::NodeUpdated(_) => "node_updated",
            Self::ConnectionFailure(_) => "connection_failure",
            Self::ControllerInfo { .. } => "controller_info",
            Self::InclusionStarted => "inclusion_started",
            Self::Inclusion { .. } => "inclusion",
            Self::InclusionStopped => "inclusion_stopped",
            Self::ExclusionStarted => "exclusion_started",
            Self::Exclusion { .. } => "exclusion",
            Self::ExclusionStopped => "exclusion_stopped",
            Self::TransactionStarted(_) => "transaction_started",
        }
    }
}
