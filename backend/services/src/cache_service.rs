use anyhow::{Result, anyhow};
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

enum Backend {
    Disabled,
    Redis(redis::Client),
    #[cfg(any(test, feature = "test-util"))]
    Memory(memory::MemoryStore),
}

/// Process-local stand-in for Redis with the same TTL semantics.
#[cfg(any(test, feature = "test-util"))]
mod memory {
    use anyhow::{Result, anyhow};
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};
    use std::time::{Duration, Instant};

    struct Entry {
        value: String,
        expires_at: Option<Instant>,
    }

    impl Entry {
        fn is_live(&self, now: Instant) -> bool {
            self.expires_at.is_none_or(|deadline| deadline > now)
        }
    }

    #[derive(Default)]
    pub struct MemoryStore {
        entries: Mutex<HashMap<String, Entry>>,
    }

    impl MemoryStore {
        fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>> {
            self.entries.lock().map_err(|_| anyhow!("in-memory cache lock poisoned"))
        }

        pub fn get(&self, key: &str) -> Result<Option<String>> {
            let mut map = self.lock()?;
            let now = Instant::now();
            let live = map
                .get(key)
                .map(|entry| entry.is_live(now).then(|| entry.value.clone()));
            match live {
                Some(Some(value)) => Ok(Some(value)),
                Some(None) => {
                    map.remove(key);
                    Ok(None)
                }
                None => Ok(None),
            }
        }

        pub fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
            self.lock()?.insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    expires_at: ttl.map(|d| Instant::now() + d),
                },
            );
            Ok(())
        }

        pub fn remove(&self, key: &str) -> Result<()> {
            self.lock()?.remove(key);
            Ok(())
        }
    }
}

/// Key/value cache used for list caching and the `/cache/{key}` endpoints.
///
/// Backed by Redis when a URL is configured; without one, reads miss and
/// writes are dropped.
pub struct CacheService {
    backend: Backend,
}

impl CacheService {
    pub fn new(redis_url: Option<String>) -> Result<Self> {
        let backend = match redis_url {
            Some(url) if !url.trim().is_empty() => Backend::Redis(redis::Client::open(url)?),
            _ => Backend::Disabled,
        };

        Ok(Self { backend })
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(memory::MemoryStore::default()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.backend, Backend::Disabled)
    }

    async fn connection(client: &redis::Client) -> Result<MultiplexedConnection> {
        match tokio::time::timeout(CONNECT_TIMEOUT, client.get_multiplexed_async_connection()).await {
            Ok(conn) => Ok(conn?),
            Err(_) => Err(anyhow!(
                "Redis connection timed out after {}ms",
                CONNECT_TIMEOUT.as_millis()
            )),
        }
    }

    pub async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        match &self.backend {
            Backend::Disabled => Ok(None),
            Backend::Redis(client) => {
                let mut conn = Self::connection(client).await?;
                let value: Option<String> = conn.get(key).await?;
                Ok(value)
            }
            #[cfg(any(test, feature = "test-util"))]
            Backend::Memory(store) => store.get(key),
        }
    }

    pub async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        match &self.backend {
            Backend::Disabled => Ok(()),
            Backend::Redis(client) => {
                let mut conn = Self::connection(client).await?;
                if let Some(ttl_duration) = ttl {
                    let _: () = conn.set_ex(key, value, ttl_duration.as_secs().max(1)).await?;
                } else {
                    let _: () = conn.set(key, value).await?;
                }
                Ok(())
            }
            #[cfg(any(test, feature = "test-util"))]
            Backend::Memory(store) => store.set(key, value, ttl),
        }
    }

    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.get_raw(key).await? {
            Some(v) => {
                let deserialized: T = serde_json::from_str(&v)?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    pub async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()>
    where
        T: Serialize,
    {
        let serialized = serde_json::to_string(value)?;
        self.set_raw(key, &serialized, ttl).await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        match &self.backend {
            Backend::Disabled => Ok(()),
            Backend::Redis(client) => {
                let mut conn = Self::connection(client).await?;
                let _: () = conn.del(key).await?;
                Ok(())
            }
            #[cfg(any(test, feature = "test-util"))]
            Backend::Memory(store) => store.remove(key),
        }
    }

    /// Round-trip `PING`; the in-memory backend always answers.
    pub async fn ping(&self) -> Result<()> {
        match &self.backend {
            Backend::Disabled => Err(anyhow!("cache is not configured")),
            Backend::Redis(client) => {
                let mut conn = Self::connection(client).await?;
                let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
                if reply.eq_ignore_ascii_case("PONG") {
                    Ok(())
                } else {
                    Err(anyhow!("unexpected PING reply: {}", reply))
                }
            }
            #[cfg(any(test, feature = "test-util"))]
            Backend::Memory(_) => Ok(()),
        }
    }
}
