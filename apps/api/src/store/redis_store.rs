use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use tracing::info;

use crate::errors::AppError;
use crate::store::SessionStore;

/// Redis-backed store. Opens a multiplexed connection per call.
pub struct RedisStore {
    client: RedisClient,
}

impl RedisStore {
    pub fn open(redis_url: &str) -> Result<Self, AppError> {
        let client = RedisClient::open(redis_url)?;
        info!("Redis session store initialized");
        Ok(Self { client })
    }
}

#[async_trait]
impl SessionStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}
