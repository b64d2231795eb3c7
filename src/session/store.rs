use crate::core::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Запись сессии на стороне сервера
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Пустой идентификатор при `save` заменяется новым uuid
    pub session_id: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    /// Истечение по бездействию, unix timestamp
    pub expire_timeout: i64,
    /// Абсолютное истечение, unix timestamp
    pub expire_max: i64,
}

impl SessionRecord {
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        matches!((&self.name, &self.password), (Some(name), Some(password)) if !name.is_empty() && !password.is_empty())
    }
}

/// Хранилище серверных сессий
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Сохраняет запись и возвращает её идентификатор
    async fn save(&self, record: SessionRecord) -> Result<String>;

    async fn load(&self, session_id: &str) -> Result<Option<SessionRecord>>;

    async fn flush(&self, session_id: &str) -> Result<()>;

    /// Продлевает таймаут бездействия, не выходя за `expire_max`; возвращает новый таймаут
    async fn touch(&self, session_id: &str, timeout: i64) -> Result<Option<i64>>;

    /// Удаляет записи, у которых истёк абсолютный срок; возвращает их число
    async fn purge_expired(&self) -> Result<usize>;
}

/// Сессии в памяти процесса
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, SessionRecord>>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, mut record: SessionRecord) -> Result<String> {
        let session_id = match record.session_id.take().filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => Uuid::new_v4().to_string(),
        };
        record.session_id = Some(session_id.clone());

        self.sessions.lock().await.insert(session_id.clone(), record);
        Ok(session_id)
    }

    async fn load(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let now = Utc::now().timestamp();
        let mut sessions = self.sessions.lock().await;
        if sessions.get(session_id).is_some_and(|record| record.expire_max <= now) {
            sessions.remove(session_id);
            return Ok(None);
        }
        Ok(sessions.get(session_id).cloned())
    }

    async fn flush(&self, session_id: &str) -> Result<()> {
        self.sessions.lock().await.remove(session_id);
        Ok(())
    }

    async fn touch(&self, session_id: &str, timeout: i64) -> Result<Option<i64>> {
        let mut sessions = self.sessions.lock().await;
        Ok(sessions.get_mut(session_id).map(|record| {
            record.expire_timeout = timeout.min(record.expire_max);
            record.expire_timeout
        }))
    }

    async fn purge_expired(&self) -> Result<usize> {
        let now = Utc::now().timestamp();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, record| record.expire_max > now);
        Ok(before - sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timeout: i64, max: i64) -> SessionRecord {
        SessionRecord {
            session_id: None,
            name: Some("jdoe".to_string()),
            password: Some("secret".to_string()),
            expire_timeout: timeout,
            expire_max: max,
        }
    }

    #[tokio::test]
    async fn test_save_generates_uuid() {
        let store = MemorySessionStore::new();
        let now = Utc::now().timestamp();
        let id = store.save(record(now + 60, now + 120)).await.unwrap();
        assert!(Uuid::parse_str(&id).is_ok());

        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded.session_id.as_deref(), Some(id.as_str()));
        assert!(loaded.has_credentials());
    }

    #[tokio::test]
    async fn test_flush_and_missing() {
        let store = MemorySessionStore::new();
        let now = Utc::now().timestamp();
        let id = store.save(record(now + 60, now + 120)).await.unwrap();
        store.flush(&id).await.unwrap();
        assert!(store.load(&id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_touch_capped_by_max() {
        let store = MemorySessionStore::new();
        let now = Utc::now().timestamp();
        let id = store.save(record(now + 60, now + 100)).await.unwrap();

        assert_eq!(store.touch(&id, now + 90).await.unwrap(), Some(now + 90));
        assert_eq!(store.touch(&id, now + 500).await.unwrap(), Some(now + 100));
        assert_eq!(store.touch("missing", now).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_absolute_expiry() {
        let store = MemorySessionStore::new();
        let now = Utc::now().timestamp();
        let stale = store.save(record(now - 10, now - 1)).await.unwrap();
        store.save(record(now + 60, now + 120)).await.unwrap();

        assert!(store.load(&stale).await.unwrap().is_none());
        store.save(record(now - 10, now - 1)).await.unwrap();
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert_eq!(store.len().await, 1);
    }
}
