use super::text::{TextId, text};
use crate::core::{Language, Result, Settings};
use crate::database::Database;
use crate::http::Request;
use crate::markup::{Crumb, Document, Tag};
use crate::session::{Session, SessionStore};
use async_trait::async_trait;
use axum::http::{HeaderName, StatusCode};

/// Идентификатор обработчика пути
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathId {
    Index,
    Login,
    Logout,
    UserDashboard,
    UserView,
    UserSettings,
    UserSession,
    ManagementDashboard,
    AdministerDashboard,
    SubmitFormId,
}

/// Результат обработчика до рендеринга
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Markup(Document),
    Ajax(serde_json::Value),
    File { content_type: String, bytes: Vec<u8> },
    Redirect { location: String },
}

/// Выполненный обработчик: вывод, код ответа и дополнительные заголовки
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub output: Output,
    pub status: StatusCode,
    pub headers: Vec<(HeaderName, String)>,
}

impl Executed {
    #[must_use]
    pub const fn new(output: Output) -> Self {
        Self { output, status: StatusCode::OK, headers: Vec::new() }
    }

    #[must_use]
    pub const fn markup(document: Document) -> Self {
        Self::new(Output::Markup(document))
    }

    #[must_use]
    pub const fn ajax(value: serde_json::Value) -> Self {
        Self::new(Output::Ajax(value))
    }

    #[must_use]
    pub fn redirect(location: impl Into<String>, status: StatusCode) -> Self {
        Self::new(Output::Redirect { location: location.into() }).with_status(status)
    }

    #[must_use]
    pub const fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

/// Всё, что нужно обработчику для одного запроса
pub struct Context<'a> {
    pub request: &'a Request,
    pub database: &'a mut dyn Database,
    pub session: &'a mut Session,
    pub store: &'a dyn SessionStore,
    pub settings: &'a Settings,
    pub language: Language,
    /// Нормализованный путь без базового префикса, корень пустой
    pub path: String,
    /// Сегменты, совпавшие с `%`
    pub arguments: Vec<String>,
}

impl Context<'_> {
    #[must_use]
    pub const fn text(&self, id: TextId) -> &'static str {
        text(self.language, id)
    }

    /// Абсолютный адрес пути сайта
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base.url(), path.trim_start_matches('/'))
    }

    /// Первый пункт цепочки для всех страниц
    #[must_use]
    pub fn home_crumb(&self) -> Crumb {
        Crumb::new(self.text(TextId::Home), Some(self.url("")))
    }

    /// Страница с канонической ссылкой на текущий путь
    #[must_use]
    pub fn document(&self, title: impl Into<String>, breadcrumbs: Vec<Crumb>, content: Vec<Tag>) -> Document {
        Document {
            title: title.into(),
            canonical: self.url(&self.path),
            breadcrumbs,
            content,
        }
    }

    /// Имя вошедшего пользователя для текстов
    #[must_use]
    pub fn user_label(&self) -> String {
        self.session
            .user_current()
            .map(crate::core::User::display_name)
            .or_else(|| self.session.name().map(str::to_string))
            .unwrap_or_default()
    }
}

/// Обработчик одного зарегистрированного пути
#[async_trait]
pub trait PathHandler: Send + Sync {
    fn id(&self) -> PathId;

    async fn execute(&self, ctx: &mut Context<'_>) -> Result<Executed>;
}
