//! Bounded per-seat outboxes and delivery bookkeeping.

use std::sync::Arc;

use tokio::sync::mpsc;
use traitor_game::Seat;
use traitor_protocol::LobbyMessage;

use crate::DeliveryError;

/// Sending half of a seat's outbox, held by the lobby.
///
/// Every recipient of a broadcast gets a clone of the same `Arc`; the
/// message itself is never copied or modified after it is built.
pub type PlayerSender = mpsc::Sender<Arc<LobbyMessage>>;

/// Receiving half of a seat's outbox, held by the client connection.
pub type PlayerReceiver = mpsc::Receiver<Arc<LobbyMessage>>;

/// Creates a bounded outbox. A capacity of zero is bumped to one.
pub fn outbox(capacity: usize) -> (PlayerSender, PlayerReceiver) {
    mpsc::channel(capacity.max(1))
}

/// What happened to one delivered message.
///
/// Session actions never fail because a receiver was slow or absent;
/// the report says who got the message and who did not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Seats whose outbox accepted the message, in seat order.
    pub delivered: Vec<Seat>,
    /// Seats that missed it, in seat order.
    pub failed: Vec<DeliveryError>,
}

impl DeliveryReport {
    /// Returns `true` if every addressed seat received the message.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use traitor_protocol::StateMessage;

    use super::*;
    use traitor_game::Phase;

    #[tokio::test]
    async fn test_outbox_zero_capacity_still_usable() {
        let (tx, mut rx) = outbox(0);
        let msg = Arc::new(LobbyMessage::from(StateMessage {
            phase: Ok(Phase::Claiming),
        }));
        tx.try_send(Arc::clone(&msg)).unwrap();
        let got = rx.recv().await.unwrap();
        assert!(Arc::ptr_eq(&got, &msg));
    }

    #[test]
    fn test_delivery_report_is_complete() {
        let mut report = DeliveryReport::default();
        report.delivered.push(Seat(0));
        assert!(report.is_complete());
        report.failed.push(DeliveryError::NoChannel(Seat(1)));
        assert!(!report.is_complete());
    }
}
