use cellq_core::Result;
use std::future::Future;

/// Something that can open fresh connections to the broker
pub trait Connector: Send + Sync {
    type Connection: QueueConnection;

    fn connect(&self) -> impl Future<Output = Result<Self::Connection>> + Send;
}

/// A single broker connection; unusable once `is_open` reports false
pub trait QueueConnection: Send {
    fn is_open(&self) -> bool;

    /// Take the oldest message from the queue without waiting for one
    fn pop(&mut self, queue: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Append a message to the queue
    fn push(&mut self, queue: &str, body: &[u8]) -> impl Future<Output = Result<()>> + Send;
}
