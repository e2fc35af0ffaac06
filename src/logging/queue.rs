//! A fixed-capacity, drop-oldest message queue between log producers and the
//! viewer's periodic drain.
//!
//! Storage is a circular buffer allocated once at construction. `enqueue`
//! never blocks on the consumer and never grows the buffer: when the queue is
//! full the oldest message is evicted to make room.
use super::Severity;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Capacity used by the log window.
pub const DEFAULT_CAPACITY: usize = 100;

/// A single buffered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub severity: Severity,
    pub text: String,
}

impl LogMessage {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

struct Ring {
    slots: Box<[Option<LogMessage>]>,
    head: usize,
    len: usize,
}

impl Ring {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Appends `message`, returning the evicted oldest entry if the ring was full.
    fn push(&mut self, message: LogMessage) -> Option<LogMessage> {
        let capacity = self.capacity();
        if self.len == capacity {
            let evicted = self.slots[self.head].replace(message);
            self.head = (self.head + 1) % capacity;
            evicted
        } else {
            let tail = (self.head + self.len) % capacity;
            self.slots[tail] = Some(message);
            self.len += 1;
            None
        }
    }

    fn take_all(&mut self) -> Vec<LogMessage> {
        let capacity = self.capacity();
        let mut out = Vec::with_capacity(self.len);
        for offset in 0..self.len {
            if let Some(message) = self.slots[(self.head + offset) % capacity].take() {
                out.push(message);
            }
        }
        self.head = 0;
        self.len = 0;
        out
    }
}

/// Bounded FIFO with a drop-oldest overflow policy.
///
/// Any thread may call [`enqueue`](Self::enqueue); [`drain`](Self::drain) is
/// meant for the single consumer.
pub struct BoundedLogQueue {
    ring: Mutex<Ring>,
    dropped: AtomicU64,
}

impl BoundedLogQueue {
    /// Creates a queue holding at most `capacity` messages (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: Mutex::new(Ring::with_capacity(capacity.max(1))),
            dropped: AtomicU64::new(0),
        }
    }

    /// Appends a message, evicting the oldest one if the queue is full.
    ///
    /// Returns `true` when an eviction happened.
    pub fn enqueue(&self, message: LogMessage) -> bool {
        let evicted = self.ring.lock().push(message);
        // The evicted string is freed outside the lock.
        match evicted {
            Some(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Removes and returns every queued message in FIFO order.
    pub fn drain(&self) -> Vec<LogMessage> {
        self.ring.lock().take_all()
    }

    /// Discards every queued message.
    pub fn clear(&self) {
        let discarded = self.ring.lock().take_all();
        drop(discarded);
    }

    pub fn len(&self) -> usize {
        self.ring.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.ring.lock().capacity()
    }

    /// Number of messages evicted by overflow since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for BoundedLogQueue {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
