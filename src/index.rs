// Request lifecycle: one Index value per request, steps run in order
use crate::core::{ErrorCode, Language, Settings};
use crate::database::{ConnectionString, Database, log_user_activity};
use crate::http::cookie::{expired_cookie, find_cookie};
use crate::http::{Request, Response};
use crate::markup::render_document;
use crate::paths::text::{TextId, text};
use crate::paths::{Context, Executed, Output, Paths, do_process_path};
use crate::session::{CookieAction, Session, SessionStore};
use axum::http::{StatusCode, header};
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
const CONTENT_TYPE_JSON: &str = "application/json";

/// Контроллер одного запроса
pub struct Index<'a> {
    settings: &'a Settings,
    paths: &'a Paths,
    store: &'a dyn SessionStore,
    database: Box<dyn Database>,
    request: Request,
    language: Language,
    session: Session,
    status: StatusCode,
    executed: Option<Executed>,
    body: Vec<u8>,
    content_type: Option<String>,
    response: Response,
}

impl<'a> Index<'a> {
    #[must_use]
    pub fn new(
        settings: &'a Settings,
        paths: &'a Paths,
        store: &'a dyn SessionStore,
        database: Box<dyn Database>,
        request: Request,
    ) -> Self {
        Self {
            settings,
            paths,
            store,
            database,
            request,
            language: Language::default(),
            session: Session::new(),
            status: StatusCode::OK,
            executed: None,
            body: Vec::new(),
            content_type: None,
            response: Response::new(StatusCode::OK),
        }
    }

    /// Полный цикл обработки запроса
    pub async fn do_execute(mut self) -> Response {
        self.do_setup();
        self.do_receive();
        self.do_sessions().await;
        self.do_process().await;
        self.do_render();
        self.do_build_response();
        let response = self.do_send_response();
        self.do_breakdown().await;
        response
    }

    fn do_setup(&mut self) {
        self.status = StatusCode::OK;
        self.executed = None;
        self.body.clear();
        self.content_type = None;
    }

    fn do_receive(&mut self) {
        self.language = Language::negotiate(self.request.header(&header::ACCEPT_LANGUAGE));
        self.status = StatusCode::OK;
        debug!(
            method = %self.request.method(),
            path = %self.request.path(),
            language = self.language.code(),
            "request received"
        );
    }

    async fn do_sessions(&mut self) {
        let value = find_cookie(self.request.header(&header::COOKIE), &self.settings.cookie.name);
        match self.session.do_restore(value.as_deref(), self.store, &self.settings.session).await {
            Ok(()) if self.session.is_expired() => debug!("session expired"),
            Ok(()) => debug!(user = self.session.name().unwrap_or_default(), "session restored"),
            Err(e) if e.code() == ErrorCode::NoSession => {}
            Err(e) => warn!(code = e.code().as_u16(), "Failed to restore session: {}", e),
        }
    }

    /// Соединение с правами сессии или публичной учётной записи
    async fn do_connect(&mut self) {
        let database = &self.settings.database;
        let connection = match self.session.credentials() {
            Some((name, password)) => ConnectionString::new(database, name, Some(password)),
            None if database.user_public_default => ConnectionString::public(database),
            None => {
                debug!("public account disabled, not connecting");
                return;
            }
        };

        if let Err(e) = self.database.connect(&connection).await {
            warn!(user = %connection.user, code = e.code().as_u16(), "Failed to connect: {}", e);
            if !self.session.is_logged_in() {
                return;
            }

            // Сохранённые учётные данные больше не подходят
            if let Err(e) = self.session.do_logout(self.store).await {
                warn!("Failed to flush the session: {}", e);
            }
            if database.user_public_default {
                if let Err(e) = self.database.connect(&ConnectionString::public(database)).await {
                    warn!("Failed to connect as the public user: {}", e);
                }
            }
            return;
        }

        if self.session.is_logged_in() {
            match self.database.load_user_current().await {
                Ok(user) => self.session.set_user_current(user),
                Err(e) => warn!("Failed to load the current user: {}", e),
            }
        }
    }

    async fn do_process(&mut self) {
        self.do_connect().await;

        let mut ctx = Context {
            request: &self.request,
            database: self.database.as_mut(),
            session: &mut self.session,
            store: self.store,
            settings: self.settings,
            language: self.language,
            path: String::new(),
            arguments: Vec::new(),
        };
        let executed = do_process_path(self.paths, &mut ctx).await;
        self.status = executed.status;

        if self.database.is_connected() {
            let headers: Map<String, Value> = executed
                .headers
                .iter()
                .map(|(name, value)| (name.as_str().to_string(), Value::String(value.clone())))
                .collect();
            if let Err(e) =
                log_user_activity(self.database.as_mut(), &self.request, &Value::Object(headers), self.status.as_u16())
                    .await
            {
                warn!("Failed to log user activity: {}", e);
            }
        }

        if let Some(user) = self.database.connected_user() {
            debug!(user, "disconnecting");
        }
        if let Err(e) = self.database.disconnect().await {
            warn!("Failed to disconnect: {}", e);
        }
        self.executed = Some(executed);
    }

    fn do_render(&mut self) {
        let Some(executed) = &self.executed else {
            return;
        };

        match &executed.output {
            Output::Markup(document) => {
                let site_name = text(self.language, TextId::SiteName);
                self.body = render_document(document, self.language, site_name).into_bytes();
                self.content_type = Some(CONTENT_TYPE_HTML.to_string());
            }
            Output::Ajax(value) => match serde_json::to_vec(value) {
                Ok(bytes) => {
                    self.body = bytes;
                    self.content_type = Some(CONTENT_TYPE_JSON.to_string());
                }
                Err(e) => {
                    error!("Failed to serialize ajax output: {}", e);
                    self.status = StatusCode::INTERNAL_SERVER_ERROR;
                }
            },
            Output::File { content_type, bytes } => {
                self.body.clone_from(bytes);
                self.content_type = Some(content_type.clone());
            }
            Output::Redirect { .. } => {}
        }
    }

    fn do_build_response(&mut self) {
        let mut response = Response::new(self.status);
        response.set_header(header::VARY, "Accept-Language");
        response.set_header(header::PRAGMA, "no-cache");
        response.set_header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate");
        response.set_header(header::CONTENT_LANGUAGE, self.language.code());

        if let Some(content_type) = &self.content_type {
            response.set_header(header::CONTENT_TYPE, content_type);
        }

        if let Some(executed) = &self.executed {
            if let Output::Redirect { location } = &executed.output {
                response.set_header(header::LOCATION, location);
            }
            for (name, value) in &executed.headers {
                response.set_header(name.clone(), value);
            }
        }

        match self.session.cookie_action() {
            CookieAction::Set => {
                if let Some(cookie) = self.session.cookie() {
                    match cookie.to_cookie(&self.settings.cookie) {
                        Ok(cookie) => response.append_header(header::SET_COOKIE, &cookie.to_string()),
                        Err(e) => warn!("Failed to encode session cookie: {}", e),
                    }
                }
            }
            CookieAction::Expire => {
                response.append_header(header::SET_COOKIE, &expired_cookie(&self.settings.cookie).to_string());
            }
            CookieAction::Keep => {}
        }

        response.set_body(std::mem::take(&mut self.body));
        self.response = response;
    }

    fn do_send_response(&mut self) -> Response {
        debug!(code = self.status.as_u16(), path = %self.request.path(), "response ready");
        std::mem::replace(&mut self.response, Response::new(StatusCode::OK))
    }

    async fn do_breakdown(&mut self) {
        if self.database.is_connected() {
            if let Err(e) = self.database.disconnect().await {
                warn!("Failed to disconnect: {}", e);
            }
        }
    }
}
