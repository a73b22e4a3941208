/**
 * Broadcast Dispatcher
 *
 * Fans a `BroadcastMessage` out to every session that is open at the moment
 * of dispatch.
 *
 * # Delivery
 *
 * The message is serialized once, then sent to each session of a registry
 * snapshot. A session whose send fails is unregistered and the loop moves on
 * to the rest of the snapshot. Nothing is acknowledged, retried or replayed.
 *
 * # Enqueue
 *
 * Producers do not call `dispatch` on the request path. They hold a cloneable
 * `BroadcastHandle` and `enqueue` messages onto an unbounded queue drained by
 * a background worker, so an HTTP response never waits on fan-out.
 *
 * The recipient snapshot is taken inside `enqueue`, on the caller's task. A
 * session that registers after `enqueue` returns is not a recipient, however
 * late the worker gets to the message.
 */

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::backend::realtime::message::BroadcastMessage;
use crate::backend::realtime::registry::{ConnectionRegistry, Session};

/// Outcome of one dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Sessions in the snapshot
    pub attempted: usize,
    /// Sessions that accepted the frame
    pub delivered: usize,
    /// Sessions removed after a failed send
    pub pruned: usize,
}

/// Serializes messages and fans them out to a registry's open sessions
#[derive(Clone)]
pub struct BroadcastDispatcher {
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastDispatcher {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Deliver `message` to the current snapshot, pruning failed sessions
    pub fn dispatch(&self, message: &BroadcastMessage) -> Result<DispatchReport, serde_json::Error> {
        self.deliver(message, self.registry.snapshot())
    }

    /// Deliver `message` to an already captured set of sessions
    fn deliver(
        &self,
        message: &BroadcastMessage,
        snapshot: Vec<Arc<Session>>,
    ) -> Result<DispatchReport, serde_json::Error> {
        let frame = message.to_frame()?;
        let mut report = DispatchReport {
            attempted: snapshot.len(),
            ..DispatchReport::default()
        };

        for session in snapshot {
            match session.send(&frame) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(session_id = %session.id(), error = %e, "Send failed, pruning session");
                    session.mark_closing();
                    self.registry.unregister(&session.id());
                    report.pruned += 1;
                }
            }
        }

        tracing::info!(
            kind = message.kind(),
            delivered = report.delivered,
            pruned = report.pruned,
            "[Realtime] Broadcast dispatched"
        );
        Ok(report)
    }

    /// Start the background worker and return the handle producers enqueue on
    ///
    /// Must be called from within a Tokio runtime. The worker exits once
    /// every handle has been dropped.
    pub fn spawn(self) -> (BroadcastHandle, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();
        let registry = Arc::clone(&self.registry);
        let worker = tokio::spawn(async move {
            while let Some(Delivery { message, recipients }) = rx.recv().await {
                if let Err(e) = self.deliver(&message, recipients) {
                    tracing::error!(kind = message.kind(), error = %e, "[Realtime] Failed to serialize broadcast");
                }
            }
            tracing::debug!("[Realtime] Broadcast worker stopped");
        });
        (BroadcastHandle { registry, tx }, worker)
    }
}

/// A queued message and the sessions that were open when it was enqueued
struct Delivery {
    message: BroadcastMessage,
    recipients: Vec<Arc<Session>>,
}

/// Cloneable producer side of the broadcast queue
#[derive(Clone)]
pub struct BroadcastHandle {
    registry: Arc<ConnectionRegistry>,
    tx: mpsc::UnboundedSender<Delivery>,
}

impl BroadcastHandle {
    /// Queue a message for fan-out without waiting for delivery
    ///
    /// Recipients are fixed here: the sessions open at the moment of the call.
    pub fn enqueue(&self, message: BroadcastMessage) {
        let recipients = self.registry.snapshot();
        if let Err(e) = self.tx.send(Delivery { message, recipients }) {
            tracing::warn!(kind = e.0.message.kind(), "[Realtime] Broadcast worker not running, message dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn notification(text: &str) -> BroadcastMessage {
        BroadcastMessage::NotificationCreated { text: text.to_string() }
    }

    #[test]
    fn test_delivers_to_every_open_session_once() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut receivers = Vec::new();
        for _ in 0..5 {
            let (tx, rx) = mpsc::unbounded_channel();
            registry.register(tx);
            receivers.push(rx);
        }

        let dispatcher = BroadcastDispatcher::new(Arc::clone(&registry));
        let report = dispatcher.dispatch(&notification("hello")).unwrap();
        assert_eq!(report, DispatchReport { attempted: 5, delivered: 5, pruned: 0 });

        for mut rx in receivers {
            assert_eq!(rx.try_recv().unwrap(), r#"{"message":"hello"}"#);
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn test_failed_session_is_pruned_and_others_still_receive() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();
        let (tx_c, mut rx_c) = mpsc::unbounded_channel();
        registry.register(tx_a);
        let broken = registry.register(tx_b);
        registry.register(tx_c);
        drop(rx_b);

        let dispatcher = BroadcastDispatcher::new(Arc::clone(&registry));
        let report = dispatcher.dispatch(&notification("x")).unwrap();
        assert_eq!(report, DispatchReport { attempted: 3, delivered: 2, pruned: 1 });

        assert!(registry.snapshot().iter().all(|s| s.id() != broken.id()));
        assert_eq!(registry.len(), 2);
        assert_eq!(rx_a.try_recv().unwrap(), r#"{"message":"x"}"#);
        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_c.try_recv().unwrap(), r#"{"message":"x"}"#);
        assert!(rx_c.try_recv().is_err());
    }

    #[test]
    fn test_late_joiner_gets_nothing_retroactively() {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = BroadcastDispatcher::new(Arc::clone(&registry));
        dispatcher.dispatch(&notification("before")).unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(tx);
        assert!(rx.try_recv().is_err());

        dispatcher.dispatch(&notification("after")).unwrap();
        assert_eq!(rx.try_recv().unwrap(), r#"{"message":"after"}"#);
    }

    #[test]
    fn test_dispatch_with_no_sessions() {
        let dispatcher = BroadcastDispatcher::new(Arc::new(ConnectionRegistry::new()));
        let report = dispatcher.dispatch(&notification("nobody")).unwrap();
        assert_eq!(report, DispatchReport::default());
    }

    #[tokio::test]
    async fn test_enqueue_is_delivered_by_worker() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(tx);

        let (handle, _worker) = BroadcastDispatcher::new(Arc::clone(&registry)).spawn();
        handle.enqueue(BroadcastMessage::EventDeleted { event_id: 9 });

        let frame = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("broadcast not delivered")
            .unwrap();
        assert_eq!(frame, r#"{"type":"EVENT_DELETED","eventId":"9"}"#);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_session_registered_after_enqueue_is_not_a_recipient() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (tx_early, mut rx_early) = mpsc::unbounded_channel();
        registry.register(tx_early);

        let (handle, _worker) = BroadcastDispatcher::new(Arc::clone(&registry)).spawn();
        // The worker cannot run before the next await on a current-thread runtime.
        handle.enqueue(notification("early"));
        let (tx_late, mut rx_late) = mpsc::unbounded_channel();
        registry.register(tx_late);

        let frame = timeout(Duration::from_secs(1), rx_early.recv())
            .await
            .expect("broadcast not delivered")
            .unwrap();
        assert_eq!(frame, r#"{"message":"early"}"#);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx_late.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_worker_stops_when_handles_dropped() {
        let (handle, worker) = BroadcastDispatcher::new(Arc::new(ConnectionRegistry::new())).spawn();
        drop(handle);
        timeout(Duration::from_secs(1), worker).await.unwrap().unwrap();
    }
}
