use crate::{Connector, QueueConnection};
use cellq_core::{CellqError, Result};
use tracing::{info, warn};

/// Owns the one broker connection of a worker and rebuilds it when it goes stale.
///
/// Connections are never shared across reconnects: a closed connection is
/// dropped before a replacement is opened.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    connection: Option<C::Connection>,
    reconnects: usize,
}

impl<C: Connector> ConnectionManager<C> {
    /// Open the initial connection; failing here is fatal to the worker
    pub async fn connect(connector: C) -> Result<Self> {
        let connection = connector.connect().await?;
        info!("Connected to broker");
        Ok(Self {
            connector,
            connection: Some(connection),
            reconnects: 0,
        })
    }

    /// How many times the connection has been rebuilt
    pub fn reconnects(&self) -> usize {
        self.reconnects
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Whether there is a connection that still reports open
    pub fn is_live(&self) -> bool {
        self.connection.as_ref().is_some_and(|conn| conn.is_open())
    }

    /// Get a live connection, reconnecting first if the current one closed
    pub async fn ensure_connection(&mut self) -> Result<&mut C::Connection> {
        self.reconnect_if_closed().await?;
        self.connection.as_mut().ok_or(CellqError::NotConnected)
    }

    /// Take the next message from the queue, if any
    pub async fn dequeue(&mut self, queue: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_connection().await?.pop(queue).await
    }

    /// Publish a message, rebuilding the connection at most once
    pub async fn publish(&mut self, queue: &str, body: &[u8]) -> Result<()> {
        let reconnected = self.reconnect_if_closed().await?;
        let conn = self.connection.as_mut().ok_or(CellqError::NotConnected)?;
        let pushed = conn.push(queue, body).await;

        match pushed {
            Ok(()) => Ok(()),
            Err(err) if !reconnected && err.is_connection_fault() => {
                warn!(queue = %queue, error = %err, "Publish hit a broken connection, retrying once");
                self.reconnect().await?;
                let conn = self.connection.as_mut().ok_or(CellqError::NotConnected)?;
                conn.push(queue, body).await
            }
            Err(err) => Err(err),
        }
    }

    async fn reconnect_if_closed(&mut self) -> Result<bool> {
        if self.is_live() {
            return Ok(false);
        }
        self.reconnect().await?;
        Ok(true)
    }

    async fn reconnect(&mut self) -> Result<()> {
        self.connection = None;
        warn!(reconnects = %self.reconnects, "Broker connection closed, reconnecting");
        let connection = self.connector.connect().await?;
        self.connection = Some(connection);
        self.reconnects += 1;
        info!(reconnects = %self.reconnects, "Reconnected to broker");
        Ok(())
    }
}
