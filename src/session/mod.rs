// Server-side sessions keyed by the id carried in the session cookie
pub mod store;

use crate::core::settings::SessionSettings;
use crate::core::{Result, SiteError, User};
use crate::http::SessionCookie;
use chrono::Utc;
use tracing::debug;

pub use store::{MemorySessionStore, SessionRecord, SessionStore};

/// Что сделать с cookie сессии в ответе
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CookieAction {
    #[default]
    Keep,
    Set,
    Expire,
}

/// Сессия текущего запроса
#[derive(Debug, Clone, Default)]
pub struct Session {
    session_id: Option<String>,
    name: Option<String>,
    password: Option<String>,
    timeout: Option<i64>,
    max: Option<i64>,
    logged_in: bool,
    expired: bool,
    user_current: Option<User>,
    cookie: Option<SessionCookie>,
    cookie_action: CookieAction,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Восстанавливает сессию по значению cookie
    ///
    /// `NoSession`, если cookie нет; при неверной cookie или неизвестной
    /// сессии cookie помечается на удаление. Истёкший таймаут не ошибка:
    /// сессия остаётся невошедшей с `is_expired() == true`.
    pub async fn do_restore(
        &mut self,
        cookie_value: Option<&str>,
        store: &dyn SessionStore,
        settings: &SessionSettings,
    ) -> Result<()> {
        let Some(raw) = cookie_value else {
            return Err(SiteError::NoSession);
        };

        let cookie = match SessionCookie::decode(raw) {
            Ok(cookie) => cookie,
            Err(e) => {
                self.expire_cookie();
                return Err(e);
            }
        };

        let record = match store.load(&cookie.session_id).await? {
            Some(record) if record.has_credentials() => record,
            _ => {
                self.expire_cookie();
                return Err(SiteError::SessionInvalid(format!("unknown session '{}'", cookie.session_id)));
            }
        };

        let now = Utc::now().timestamp();
        self.session_id = Some(cookie.session_id.clone());
        if record.expire_timeout <= now {
            debug!(session = %cookie.session_id, "session timed out");
            store.flush(&cookie.session_id).await?;
            self.logged_in = false;
            self.expired = true;
            self.timeout = Some(record.expire_timeout);
            self.expire_cookie();
            return Ok(());
        }

        self.name = record.name;
        self.password = record.password;
        self.max = Some(record.expire_max);
        self.logged_in = true;

        let timeout = store
            .touch(&cookie.session_id, now + settings.expire)
            .await?
            .unwrap_or(record.expire_timeout);
        self.timeout = Some(timeout);

        if timeout > cookie.expire {
            self.cookie = Some(SessionCookie::new(cookie.session_id, timeout));
            self.cookie_action = CookieAction::Set;
        } else {
            self.cookie = Some(cookie);
        }
        Ok(())
    }

    /// Создаёт серверную сессию после успешного входа
    pub async fn do_login(
        &mut self,
        store: &dyn SessionStore,
        name: &str,
        password: &str,
        settings: &SessionSettings,
    ) -> Result<String> {
        let now = Utc::now().timestamp();
        let record = SessionRecord {
            session_id: None,
            name: Some(name.to_string()),
            password: Some(password.to_string()),
            expire_timeout: now + settings.expire,
            expire_max: now + settings.max,
        };
        let timeout = record.expire_timeout;
        let max = record.expire_max;
        let session_id = store.save(record).await?;

        self.session_id = Some(session_id.clone());
        self.name = Some(name.to_string());
        self.password = Some(password.to_string());
        self.timeout = Some(timeout);
        self.max = Some(max);
        self.logged_in = true;
        self.expired = false;
        self.cookie = Some(SessionCookie::new(session_id.clone(), timeout));
        self.cookie_action = CookieAction::Set;
        Ok(session_id)
    }

    /// Удаляет серверную сессию и помечает cookie на удаление
    pub async fn do_logout(&mut self, store: &dyn SessionStore) -> Result<()> {
        if let Some(session_id) = &self.session_id {
            store.flush(session_id).await?;
        }
        let expired = self.expired;
        *self = Self::default();
        self.expired = expired;
        self.expire_cookie();
        Ok(())
    }

    fn expire_cookie(&mut self) {
        self.cookie = None;
        self.cookie_action = CookieAction::Expire;
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Имя и пароль вошедшего пользователя
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if !self.logged_in {
            return None;
        }
        Some((self.name.as_deref()?, self.password.as_deref()?))
    }

    #[must_use]
    pub const fn timeout(&self) -> Option<i64> {
        self.timeout
    }

    #[must_use]
    pub const fn max(&self) -> Option<i64> {
        self.max
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.expired
    }

    #[must_use]
    pub const fn user_current(&self) -> Option<&User> {
        self.user_current.as_ref()
    }

    pub fn set_user_current(&mut self, user: Option<User>) {
        self.user_current = user;
    }

    #[must_use]
    pub const fn cookie(&self) -> Option<&SessionCookie> {
        self.cookie.as_ref()
    }

    #[must_use]
    pub const fn cookie_action(&self) -> CookieAction {
        self.cookie_action
    }
}
