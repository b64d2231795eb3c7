use super::error::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Настройки подключения к PostgreSQL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Таймаут подключения в секундах
    pub timeout: u64,
    pub ssl_mode: String,
    /// Общая учётная запись для анонимных посетителей
    pub user_public: String,
    pub user_public_password: Option<String>,
    /// Подключаться ли публичной учётной записью, когда нет сессии
    pub user_public_default: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5432,
            name: "standard".to_string(),
            timeout: 4,
            ssl_mode: "disable".to_string(),
            user_public: "u_standard_public".to_string(),
            user_public_password: None,
            user_public_default: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// Параметры cookie сессии
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieSettings {
    pub name: String,
    pub path: String,
    pub domain: String,
    pub http_only: bool,
    pub host_only: bool,
    pub same_site: SameSite,
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: "standard-session".to_string(),
            path: "/".to_string(),
            domain: "localhost".to_string(),
            http_only: false,
            host_only: true,
            same_site: SameSite::Strict,
            secure: true,
        }
    }
}

/// Время жизни сессии в секундах
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Таймаут бездействия
    pub expire: i64,
    /// Максимальная длительность сессии
    pub max: i64,
    /// Период очистки истёкших сессий
    pub purge_interval: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { expire: 1200, max: 7200, purge_interval: 300 }
    }
}

/// Базовый адрес сайта для канонических ссылок и редиректов
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseSettings {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
}

impl Default for BaseSettings {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            host: "localhost".to_string(),
            port: None,
            path: "/".to_string(),
        }
    }
}

impl BaseSettings {
    /// `scheme://host[:port]base_path`, всегда с завершающим `/`
    #[must_use]
    pub fn url(&self) -> String {
        let mut url = format!("{}://{}", self.scheme, self.host);
        if let Some(port) = self.port {
            url.push_str(&format!(":{port}"));
        }
        if !self.path.starts_with('/') {
            url.push('/');
        }
        url.push_str(&self.path);
        if !url.ends_with('/') {
            url.push('/');
        }
        url
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub listen: String,
    /// Доверять `X-Forwarded-Proto` от обратного прокси
    pub trust_forwarded_proto: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            trust_forwarded_proto: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub cookie: CookieSettings,
    pub session: SessionSettings,
    pub base: BaseSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings with priority: ENV > config file > defaults
    ///
    /// Environment keys look like `PGSITE_DATABASE__HOST`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("PGSITE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?.try_deserialize::<Self>()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.database.port, 5432);
        assert_eq!(settings.database.timeout, 4);
        assert!(settings.database.user_public_default);
        assert_eq!(settings.cookie.same_site, SameSite::Strict);
        assert!(settings.cookie.secure);
        assert_eq!(settings.session.expire, 1200);
        assert_eq!(settings.session.max, 7200);
        assert_eq!(settings.session.purge_interval, 300);
        assert_eq!(settings.base.url(), "https://localhost/");
    }

    #[test]
    fn test_base_url_with_port_and_path() {
        let base = BaseSettings {
            scheme: "https".to_string(),
            host: "example.org".to_string(),
            port: Some(8443),
            path: "/site".to_string(),
        };
        assert_eq!(base.url(), "https://example.org:8443/site/");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[database]\nhost = \"db.internal\"\nname = \"site\"\n\n[cookie]\nsame_site = \"lax\"\n\n[session]\nexpire = 60"
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.database.host, "db.internal");
        assert_eq!(settings.database.name, "site");
        assert_eq!(settings.database.port, 5432);
        assert_eq!(settings.cookie.same_site, SameSite::Lax);
        assert_eq!(settings.session.expire, 60);
        assert_eq!(settings.session.max, 7200);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Settings::load(Some(Path::new("/nonexistent/pgsite.toml")));
        assert!(result.is_err());
    }
}
