//! Redis lists as the broker: producers `RPUSH`, the worker `LPOP`s.

use crate::{Connector, QueueConnection};
use cellq_core::settings::BrokerSettings;
use cellq_core::{CellqError, Result};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client as RedisClient};

/// Opens connections to the Redis server holding the queues
#[derive(Clone)]
pub struct RedisConnector {
    redis_client: RedisClient,
}

impl RedisConnector {
    /// Create a new connector with the specified Redis URL
    pub fn new(redis_url: &str) -> Result<Self> {
        let redis_client = RedisClient::open(redis_url)?;
        Ok(Self { redis_client })
    }

    /// Create a connector from broker settings without encoding credentials into a URL
    pub fn from_settings(settings: &BrokerSettings) -> Result<Self> {
        let info = redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(settings.host.clone(), settings.port),
            redis: redis::RedisConnectionInfo {
                username: Some(settings.username.clone()),
                password: Some(settings.password.clone()),
                ..Default::default()
            },
        };
        let redis_client = RedisClient::open(info)?;
        Ok(Self { redis_client })
    }
}

impl Connector for RedisConnector {
    type Connection = RedisConnection;

    async fn connect(&self) -> Result<RedisConnection> {
        let conn = self
            .redis_client
            .get_multiplexed_async_connection()
            .await?;
        Ok(RedisConnection { conn, open: true })
    }
}

/// A Redis connection that remembers whether it has seen a connection fault
pub struct RedisConnection {
    conn: MultiplexedConnection,
    open: bool,
}

impl RedisConnection {
    fn observe<T>(&mut self, result: redis::RedisResult<T>) -> Result<T> {
        result.map_err(|err| {
            let err = CellqError::Redis(err);
            if err.is_connection_fault() {
                self.open = false;
            }
            err
        })
    }
}

impl QueueConnection for RedisConnection {
    fn is_open(&self) -> bool {
        self.open
    }

    async fn pop(&mut self, queue: &str) -> Result<Option<Vec<u8>>> {
        let popped = self.conn.lpop::<_, Option<Vec<u8>>>(queue, None).await;
        self.observe(popped)
    }

    async fn push(&mut self, queue: &str, body: &[u8]) -> Result<()> {
        let pushed = self.conn.rpush::<_, _, ()>(queue, body).await;
        self.observe(pushed)
    }
}
