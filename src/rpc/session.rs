//! Open `/sse` sessions, keyed by session id.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use super::message::JsonRpcResponse;

/// Replies queued per session before a stalled reader is dropped.
pub const SESSION_BUFFER: usize = 64;

pub type SessionSender = mpsc::Sender<JsonRpcResponse>;
pub type SessionReceiver = mpsc::Receiver<JsonRpcResponse>;

/// Outbound channels of every connected event stream.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionSender>>,
    buffer: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_buffer(SESSION_BUFFER)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `buffer` must be non-zero.
    pub fn with_buffer(buffer: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            buffer: buffer.max(1),
        }
    }

    /// Register a new session. The returned guard removes it when dropped.
    pub fn open(self: &Arc<Self>) -> (SessionGuard, SessionReceiver) {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(self.buffer);
        self.sessions.lock().insert(id.clone(), tx);
        tracing::debug!(session_id = %id, "SSE session opened");
        (
            SessionGuard {
                id,
                store: Arc::clone(self),
            },
            rx,
        )
    }

    /// Queue `response` on the session's stream. Returns `false` when the
    /// session is unknown or its stream has gone away. A session whose queue
    /// is full is dropped, which ends its stream once the queue drains.
    pub fn send(&self, id: &str, response: JsonRpcResponse) -> bool {
        let mut sessions = self.sessions.lock();
        let Some(tx) = sessions.get(id) else {
            return false;
        };
        match tx.try_send(response) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(session_id = %id, buffer = self.buffer, "SSE session queue full, dropping session");
                sessions.remove(id);
                false
            }
            Err(TrySendError::Closed(_)) => {
                sessions.remove(id);
                false
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    fn remove(&self, id: &str) {
        if self.sessions.lock().remove(id).is_some() {
            tracing::debug!(session_id = %id, "SSE session closed");
        }
    }

    /// Drop every sender so that open streams end.
    pub fn close_all(&self) {
        let closed = {
            let mut sessions = self.sessions.lock();
            let count = sessions.len();
            sessions.clear();
            count
        };
        if closed > 0 {
            tracing::info!(closed, "Closed SSE sessions");
        }
    }
}

/// Keeps a session registered for as long as its stream is alive.
pub struct SessionGuard {
    id: String,
    store: Arc<SessionStore>,
}

impl SessionGuard {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.store.remove(&self.id);
    }
}
