//! Message channel used to hand partial sums back to the aggregator
//!
//! A thin wrapper over a bounded flume channel that counts traffic, so
//! callers can check that exactly one value per worker went through.

use crate::error::{Error, Result};
use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Traffic counters shared by both halves of a channel
///
/// Workers bump `sent` while the aggregator bumps `received`, so each
/// counter gets its own cache line.
#[derive(Debug, Default)]
pub struct ChannelStats {
    sent: CachePadded<AtomicU64>,
    received: CachePadded<AtomicU64>,
    disconnects: CachePadded<AtomicU64>,
}

impl ChannelStats {
    /// Messages accepted by the channel
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Messages handed to the receiver
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Receives that failed because every sender was gone
    pub fn disconnects(&self) -> u64 {
        self.disconnects.load(Ordering::Relaxed)
    }
}

/// Sender half of a channel
pub struct Sender<T> {
    inner: flume::Sender<T>,
    stats: Arc<ChannelStats>,
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<T> Sender<T> {
    /// Send a message, blocking while the channel is full
    pub fn send(&self, msg: T) -> Result<()> {
        self.inner.send(msg)?;
        self.stats.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Get channel statistics
    pub fn stats(&self) -> Arc<ChannelStats> {
        Arc::clone(&self.stats)
    }
}

/// Receiver half of a channel
pub struct Receiver<T> {
    inner: flume::Receiver<T>,
    stats: Arc<ChannelStats>,
}

impl<T> Receiver<T> {
    /// Receive a message, blocking until one arrives
    ///
    /// Fails once every sender is dropped and the buffer is drained.
    pub fn recv(&self) -> Result<T> {
        match self.inner.recv() {
            Ok(msg) => {
                self.stats.received.fetch_add(1, Ordering::Relaxed);
                Ok(msg)
            }
            Err(e) => {
                self.stats.disconnects.fetch_add(1, Ordering::Relaxed);
                Err(Error::from(e))
            }
        }
    }

    /// Get channel statistics
    pub fn stats(&self) -> Arc<ChannelStats> {
        Arc::clone(&self.stats)
    }
}

/// Channel factory
pub struct Channel;

impl Channel {
    /// Create a bounded multi-producer, single-consumer channel
    pub fn mpsc<T>(capacity: usize) -> (Sender<T>, Receiver<T>) {
        let stats = Arc::new(ChannelStats::default());
        let (tx, rx) = flume::bounded(capacity);

        (
            Sender {
                inner: tx,
                stats: Arc::clone(&stats),
            },
            Receiver { inner: rx, stats },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::CACHE_LINE_SIZE;
    use std::thread;

    #[test]
    fn test_mpsc_channel() {
        let (tx, rx) = Channel::mpsc::<i64>(10);

        tx.send(42).unwrap();
        tx.send(43).unwrap();

        assert_eq!(rx.recv().unwrap(), 42);
        assert_eq!(rx.recv().unwrap(), 43);

        assert_eq!(tx.stats().sent(), 2);
        assert_eq!(rx.stats().received(), 2);
    }

    #[test]
    fn test_many_producers() {
        let (tx, rx) = Channel::mpsc::<i64>(8);

        thread::scope(|s| {
            for i in 0..8 {
                let tx = tx.clone();
                s.spawn(move || tx.send(i).unwrap());
            }
        });

        let mut values: Vec<i64> = (0..8).map(|_| rx.recv().unwrap()).collect();
        values.sort_unstable();
        assert_eq!(values, (0..8).collect::<Vec<_>>());
        assert_eq!(rx.stats().received(), 8);
    }

    #[test]
    fn test_recv_after_disconnect() {
        let (tx, rx) = Channel::mpsc::<i64>(1);

        tx.send(1).unwrap();
        drop(tx);

        assert_eq!(rx.recv().unwrap(), 1);
        assert!(matches!(rx.recv(), Err(Error::ReceiveError(_))));
        assert_eq!(rx.stats().disconnects(), 1);
    }

    #[test]
    fn test_send_without_receiver() {
        let (tx, rx) = Channel::mpsc::<i64>(1);
        drop(rx);

        assert!(matches!(tx.send(7), Err(Error::SendError(_))));
        assert_eq!(tx.stats().sent(), 0);
    }

    #[test]
    fn test_counters_on_separate_lines() {
        let stats = ChannelStats::default();
        let sent = &*stats.sent as *const AtomicU64 as usize;
        let received = &*stats.received as *const AtomicU64 as usize;
        assert!(received.abs_diff(sent) >= CACHE_LINE_SIZE);
    }
}
