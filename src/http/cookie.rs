use crate::core::settings::{CookieSettings, SameSite};
use crate::core::{Result, SiteError};
use cookie::time::OffsetDateTime;
use cookie::{Cookie, Expiration};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Содержимое cookie сессии: идентификатор и срок действия
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub session_id: String,
    /// Unix timestamp
    pub expire: i64,
}

#[derive(Serialize)]
struct Payload<'a> {
    session_id: &'a str,
    expire: i64,
}

#[derive(Deserialize)]
struct SignedPayload {
    session_id: String,
    expire: i64,
    checksum: String,
}

#[derive(Serialize)]
struct SignedPayloadRef<'a> {
    session_id: &'a str,
    expire: i64,
    checksum: &'a str,
}

impl SessionCookie {
    #[must_use]
    pub fn new(session_id: impl Into<String>, expire: i64) -> Self {
        Self { session_id: session_id.into(), expire }
    }

    fn checksum(&self) -> Result<String> {
        let json = serde_json::to_string(&Payload { session_id: &self.session_id, expire: self.expire })?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// URL-кодированный JSON с контрольной суммой
    pub fn encode(&self) -> Result<String> {
        let checksum = self.checksum()?;
        let json = serde_json::to_string(&SignedPayloadRef {
            session_id: &self.session_id,
            expire: self.expire,
            checksum: &checksum,
        })?;
        Ok(urlencoding::encode(&json).into_owned())
    }

    /// Проверяет контрольную сумму и непустой идентификатор
    pub fn decode(raw: &str) -> Result<Self> {
        let json = urlencoding::decode(raw)
            .map_err(|_| SiteError::InvalidFormat("cookie".to_string(), "utf-8".to_string()))?;
        let signed: SignedPayload = serde_json::from_str(&json)?;

        let cookie = Self { session_id: signed.session_id, expire: signed.expire };
        if cookie.session_id.is_empty() {
            return Err(SiteError::SessionInvalid("empty session id".to_string()));
        }
        if cookie.checksum()? != signed.checksum.to_ascii_lowercase() {
            return Err(SiteError::SessionInvalid("checksum mismatch".to_string()));
        }
        Ok(cookie)
    }

    /// Cookie для заголовка `Set-Cookie`
    pub fn to_cookie(&self, settings: &CookieSettings) -> Result<Cookie<'static>> {
        let expires = OffsetDateTime::from_unix_timestamp(self.expire)
            .map_err(|_| SiteError::InvalidArgument("expire".to_string()))?;
        let mut cookie = base_cookie(settings, self.encode()?);
        cookie.set_expires(Expiration::DateTime(expires));
        Ok(cookie)
    }
}

/// Cookie, которая удаляет сессию у клиента
#[must_use]
pub fn expired_cookie(settings: &CookieSettings) -> Cookie<'static> {
    let mut cookie = base_cookie(settings, String::new());
    cookie.make_removal();
    cookie
}

fn base_cookie(settings: &CookieSettings, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(settings.name.clone(), value);
    cookie.set_path(settings.path.clone());
    if !settings.host_only {
        cookie.set_domain(settings.domain.clone());
    }
    cookie.set_http_only(settings.http_only);
    cookie.set_secure(settings.secure);
    cookie.set_same_site(match settings.same_site {
        SameSite::Strict => cookie::SameSite::Strict,
        SameSite::Lax => cookie::SameSite::Lax,
        SameSite::None => cookie::SameSite::None,
    });
    cookie
}

/// Находит значение cookie сессии в заголовке `Cookie`
#[must_use]
pub fn find_cookie(header: Option<&str>, name: &str) -> Option<String> {
    Cookie::split_parse(header?)
        .filter_map(std::result::Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let cookie = SessionCookie::new("5b0e1f8c-2a43-4bde-9f1e-0c7a52d0b2a1", 1_700_000_000);
        let encoded = cookie.encode().unwrap();
        assert!(!encoded.contains('"'));
        assert_eq!(SessionCookie::decode(&encoded).unwrap(), cookie);
    }

    #[test]
    fn test_tampered_cookie_rejected() {
        let encoded = SessionCookie::new("abc", 100).encode().unwrap();
        let tampered = encoded.replace("100", "999");
        assert!(matches!(SessionCookie::decode(&tampered), Err(SiteError::SessionInvalid(_))));
        assert!(SessionCookie::decode("not json").is_err());
    }

    #[test]
    fn test_empty_session_id_rejected() {
        let encoded = SessionCookie::new("", 100).encode().unwrap();
        assert!(matches!(SessionCookie::decode(&encoded), Err(SiteError::SessionInvalid(_))));
    }

    #[test]
    fn test_set_cookie_attributes() {
        let settings = CookieSettings::default();
        let cookie = SessionCookie::new("abc", 1_700_000_000).to_cookie(&settings).unwrap();
        let header = cookie.to_string();
        assert!(header.starts_with("standard-session="));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Secure"));
        assert!(header.contains("SameSite=Strict"));
        assert!(!header.contains("Domain="));
        assert!(!header.contains("HttpOnly"));

        let removal = expired_cookie(&settings).to_string();
        assert!(removal.contains("Max-Age=0"));
    }

    #[test]
    fn test_find_cookie() {
        let header = Some("theme=dark; standard-session=abc%22; other=1");
        assert_eq!(find_cookie(header, "standard-session").as_deref(), Some("abc%22"));
        assert_eq!(find_cookie(header, "missing"), None);
        assert_eq!(find_cookie(None, "standard-session"), None);
    }
}
