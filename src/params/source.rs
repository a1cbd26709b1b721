//! # Event sources for reactive stations.
//!
//! An [`EventSource`] is a cloneable handle to the receiving side of a tokio
//! channel. Each source configured on a station gets its own event strand
//! that invokes the worker once per received value.
//!
//! Clones share the same receiver: strands listening to one source (on one
//! or many stations) compete for values, and every value is delivered to
//! exactly one of them.
//!
//! ```rust
//! use stationmaster::{EventSource, Value};
//!
//! let (tx, source) = EventSource::channel(16);
//! tx.try_send(Value::new("job-1")).unwrap();
//! drop(tx); // closing: strands exit once the queue is drained
//! # let _ = source;
//! ```

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::workers::Value;

enum Receiver {
    Bounded(mpsc::Receiver<Value>),
    Unbounded(mpsc::UnboundedReceiver<Value>),
}

/// Shared inbound channel of [`Value`]s.
#[derive(Clone)]
pub struct EventSource {
    rx: Arc<Mutex<Receiver>>,
}

impl EventSource {
    /// Creates a bounded channel and returns its sender with the wrapped receiver.
    pub fn channel(capacity: usize) -> (mpsc::Sender<Value>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self::from(rx))
    }

    /// Creates an unbounded channel and returns its sender with the wrapped receiver.
    pub fn unbounded() -> (mpsc::UnboundedSender<Value>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::from(rx))
    }

    /// Waits for the next value; `None` once every sender is dropped and the queue is empty.
    pub async fn recv(&self) -> Option<Value> {
        let mut rx = self.rx.lock().await;
        match &mut *rx {
            Receiver::Bounded(rx) => rx.recv().await,
            Receiver::Unbounded(rx) => rx.recv().await,
        }
    }
}

impl From<mpsc::Receiver<Value>> for EventSource {
    fn from(rx: mpsc::Receiver<Value>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(Receiver::Bounded(rx))),
        }
    }
}

impl From<mpsc::UnboundedReceiver<Value>> for EventSource {
    fn from(rx: mpsc::UnboundedReceiver<Value>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(Receiver::Unbounded(rx))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drains_then_reports_closed() {
        let (tx, source) = EventSource::unbounded();
        tx.send(Value::new(1u8)).unwrap();
        tx.send(Value::new(2u8)).unwrap();
        drop(tx);

        assert_eq!(source.recv().await.and_then(|v| v.get::<u8>()), Some(1));
        assert_eq!(source.recv().await.and_then(|v| v.get::<u8>()), Some(2));
        assert!(source.recv().await.is_none());
    }

    #[tokio::test]
    async fn clones_share_the_queue() {
        let (tx, a) = EventSource::channel(4);
        let b = a.clone();
        tx.send(Value::new("x")).await.unwrap();
        drop(tx);

        assert!(a.recv().await.is_some());
        assert!(b.recv().await.is_none());
    }
}
