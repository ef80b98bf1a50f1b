//! Pending-request queue owned by a transport.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use bytes::Bytes;

use telephony_core::types::UserRequestId;

/// A request issued by a client that produced transport traffic.
#[derive(Debug, Clone)]
pub struct UserRequest {
    id: UserRequestId,
    command: u32,
}

impl UserRequest {
    /// Creates a request for the given command code.
    pub fn new(command: u32) -> Self {
        Self {
            id: UserRequestId::new(),
            command,
        }
    }

    /// Request identity.
    pub fn id(&self) -> UserRequestId {
        self.id
    }

    /// Originating command code.
    pub fn command(&self) -> u32 {
        self.command
    }
}

/// One in-flight unit of work queued against a transport.
#[derive(Debug)]
pub struct PendingRequest {
    id: u32,
    user_request: Option<Arc<UserRequest>>,
    payload: Bytes,
}

impl PendingRequest {
    /// Queue-assigned identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The user request this entry serves, if any.
    pub fn user_request(&self) -> Option<&Arc<UserRequest>> {
        self.user_request.as_ref()
    }

    /// Raw payload.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

/// FIFO of pending requests.
///
/// Readers take snapshots via [`PendingQueue::peek_all`]; nothing but
/// [`PendingQueue::pop`] removes entries.
#[derive(Debug)]
pub struct PendingQueue {
    entries: Mutex<VecDeque<Arc<PendingRequest>>>,
    next_id: AtomicU32,
}

impl PendingQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            next_id: AtomicU32::new(1),
        }
    }

    /// Appends a request and returns its identifier.
    pub fn push(&self, user_request: Option<Arc<UserRequest>>, payload: impl Into<Bytes>) -> u32 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = Arc::new(PendingRequest {
            id,
            user_request,
            payload: payload.into(),
        });
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(entry);
        id
    }

    /// Removes and returns the oldest request.
    pub fn pop(&self) -> Option<Arc<PendingRequest>> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
    }

    /// Oldest request without removing it.
    pub fn head(&self) -> Option<Arc<PendingRequest>> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .front()
            .cloned()
    }

    /// Number of queued requests.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all entries in FIFO order.
    pub fn peek_all(&self) -> Vec<Arc<PendingRequest>> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

impl Default for PendingQueue {
    fn default() -> Self {
        Self::new()
    }
}
