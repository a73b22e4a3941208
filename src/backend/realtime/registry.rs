/**
 * Connection Registry
 *
 * Tracks the live-update sessions currently connected to this process.
 *
 * Each session owns the sending half of an outbound frame queue; the
 * receiving half is drained by the socket's writer task. A send fails once
 * the writer has exited, which is how transport failures surface here.
 *
 * The registry is the only thing that mutates the session set. Readers take a
 * `snapshot()` and iterate it without holding any lock, so a slow fan-out
 * never blocks new connections from registering.
 */

use dashmap::DashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Outbound frame queue of one session
pub type SessionSender = mpsc::UnboundedSender<String>;

/// Unique session identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Open = 0,
    Closing = 1,
    Closed = 2,
}

impl SessionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => SessionState::Open,
            1 => SessionState::Closing,
            _ => SessionState::Closed,
        }
    }
}

/// A single session's send failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("session {0} is not open")]
    NotOpen(SessionId),
    #[error("transport for session {0} is closed")]
    TransportClosed(SessionId),
}

/// One open live-update connection
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    state: AtomicU8,
    transport: SessionSender,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_open(&self) -> bool {
        self.state() == SessionState::Open
    }

    /// Queue a frame for delivery; the state is checked first
    pub fn send(&self, frame: &str) -> Result<(), BroadcastError> {
        if !self.is_open() {
            return Err(BroadcastError::NotOpen(self.id));
        }
        self.transport
            .send(frame.to_string())
            .map_err(|_| BroadcastError::TransportClosed(self.id))
    }

    /// Move OPEN → CLOSING; later states are left alone
    pub fn mark_closing(&self) {
        let _ = self.state.compare_exchange(
            SessionState::Open as u8,
            SessionState::Closing as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    fn mark_closed(&self) {
        self.state.store(SessionState::Closed as u8, Ordering::Release);
    }
}

/// Registry of all connected sessions
#[derive(Default)]
pub struct ConnectionRegistry {
    sessions: DashMap<SessionId, Arc<Session>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session around `transport`, assigning a fresh ID
    pub fn register(&self, transport: SessionSender) -> Arc<Session> {
        let session = Arc::new(Session {
            id: SessionId::new(),
            state: AtomicU8::new(SessionState::Open as u8),
            transport,
        });
        self.sessions.insert(session.id, Arc::clone(&session));
        tracing::debug!(session_id = %session.id, live = self.sessions.len(), "Session registered");
        session
    }

    /// Close and remove a session
    ///
    /// Idempotent: returns `false` and does nothing if the session was
    /// already removed.
    pub fn unregister(&self, id: &SessionId) -> bool {
        match self.sessions.remove(id) {
            Some((_, session)) => {
                session.mark_closed();
                tracing::debug!(session_id = %id, live = self.sessions.len(), "Session unregistered");
                true
            }
            None => false,
        }
    }

    /// Point-in-time copy of the sessions that are currently OPEN
    pub fn snapshot(&self) -> Vec<Arc<Session>> {
        self.sessions
            .iter()
            .filter(|entry| entry.value().is_open())
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Number of registered sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
