use cellq_core::Result;
use std::future::Future;

/// A flat key to bytes object store
pub trait Storage: Send + Sync {
    /// Read a whole object; a missing key is `CellqError::ObjectNotFound`
    fn get<'a>(&'a self, key: &'a str) -> impl Future<Output = Result<Vec<u8>>> + Send + 'a;

    /// Write a whole object, replacing any previous one
    fn put<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: &'a str,
    ) -> impl Future<Output = Result<()>> + Send + 'a;
}
