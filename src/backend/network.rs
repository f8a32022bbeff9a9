use crate::domain::{Email, Payload};
use parking_lot::RwLock;
use std::sync::Arc;

/// A payload handed to the simulated network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Who the payload was addressed to.
    pub recipient: Email,
    /// What was sent.
    pub payload: Payload,
}

/// Network stand-in that records deliveries instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct SimulatedNetwork {
    outbox: Arc<RwLock<Vec<Delivery>>>,
}

impl SimulatedNetwork {
    /// Creates a network with an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a delivery.
    pub fn send(&self, payload: Payload, recipient: Email) {
        self.outbox.write().push(Delivery { recipient, payload });
    }

    /// Every delivery so far, oldest first.
    pub fn outbox(&self) -> Vec<Delivery> {
        self.outbox.read().clone()
    }
}
