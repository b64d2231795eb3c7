// Full Index runs against an in-memory database and the in-process session store
use async_trait::async_trait;
use axum::http::{Method, StatusCode, header};
use pgsite::core::{Result, Role, Settings, SiteError, User};
use pgsite::database::{ConnectionString, Database, Row};
use pgsite::query::PlaceholderValue;
use pgsite::{Index, MemorySessionStore, Paths, Request, Response};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const PUBLIC: &str = "u_standard_public";

struct FakeDatabase {
    accounts: HashMap<String, Option<String>>,
    users: Vec<User>,
    connected: Option<String>,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Database for FakeDatabase {
    async fn connect(&mut self, connection: &ConnectionString) -> Result<()> {
        match self.accounts.get(&connection.user) {
            Some(password) if *password == connection.password => {
                self.connected = Some(connection.user.clone());
                Ok(())
            }
            _ => Err(SiteError::ConnectionFailure {
                user: connection.user.clone(),
                reason: "password authentication failed".to_string(),
            }),
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.connected = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.is_some()
    }

    fn connected_user(&self) -> Option<&str> {
        self.connected.as_deref()
    }

    async fn query(&mut self, sql: &str, _binds: Vec<PlaceholderValue>) -> Result<Vec<Row>> {
        let Some(user) = &self.connected else {
            return Err(SiteError::NoConnection);
        };
        self.log.lock().unwrap().push(format!("{user}: {sql}"));
        Ok(Vec::new())
    }

    async fn load_user_current(&mut self) -> Result<Option<User>> {
        let Some(name) = &self.connected else {
            return Err(SiteError::NoConnection);
        };
        Ok(self.users.iter().find(|user| &user.name_machine == name).cloned())
    }

    async fn load_user(&mut self, id: i64) -> Result<Option<User>> {
        if self.connected.is_none() {
            return Err(SiteError::NoConnection);
        }
        Ok(self.users.iter().find(|user| user.id == id).cloned())
    }
}

struct Site {
    settings: Settings,
    paths: Paths,
    store: MemorySessionStore,
    log: Arc<Mutex<Vec<String>>>,
}

impl Site {
    fn new() -> Self {
        Self {
            settings: Settings::default(),
            paths: Paths::standard(),
            store: MemorySessionStore::new(),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn database(&self) -> Box<dyn Database> {
        let mut jane = User::new(1001, "jdoe").with_roles(&[Role::User]);
        jane.name_human.first = Some("Jane".to_string());
        jane.name_human.last = Some("Doe".to_string());
        let boss = User::new(1002, "boss").with_roles(&[Role::User, Role::Manager]);

        let accounts = HashMap::from([
            (PUBLIC.to_string(), None),
            ("jdoe".to_string(), Some("secret".to_string())),
            ("boss".to_string(), Some("hunter2".to_string())),
        ]);
        Box::new(FakeDatabase { accounts, users: vec![jane, boss], connected: None, log: Arc::clone(&self.log) })
    }

    async fn run(&self, request: Request) -> Response {
        Index::new(&self.settings, &self.paths, &self.store, self.database(), request).do_execute().await
    }

    async fn login(&self, user: &str, password: &str) -> Response {
        let request = request(Method::POST, "/u/login")
            .with_form(&[("form_id", "login_form"), ("login_form-user_name", user), ("login_form-password", password)]);
        self.run(request).await
    }

    fn logged(&self, needle: &str) -> bool {
        self.log.lock().unwrap().iter().any(|entry| entry.contains(needle))
    }
}

fn request(method: Method, target: &str) -> Request {
    Request::new(method, target).with_https(true)
}

/// `name=value` из первого `Set-Cookie` ответа
fn session_cookie(response: &Response) -> String {
    let raw = response.header(&header::SET_COOKIE).expect("set-cookie");
    let cookie = cookie::Cookie::parse(raw.to_string()).unwrap();
    format!("{}={}", cookie.name(), cookie.value())
}

#[tokio::test]
async fn test_login_cookie_round_trip() {
    let site = Site::new();

    let response = site.login("jdoe", "secret").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(&header::LOCATION), Some("https://localhost/u/dashboard"));
    assert!(site.logged("jdoe: insert into v_log_users_self_insert"));

    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("standard-session="));

    let response = site.run(request(Method::GET, "/u/dashboard").with_header(header::COOKIE, &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.body_text();
    assert!(body.contains("You are currently logged in as: Jane Doe."));
    assert!(!body.contains("m/dashboard"));
    assert!(site.logged("jdoe: insert into v_log_user_activity_self_insert"));
}

#[tokio::test]
async fn test_post_login_while_logged_in() {
    let site = Site::new();
    let cookie = session_cookie(&site.login("jdoe", "secret").await);

    let response = site
        .run(
            request(Method::POST, "/u/login")
                .with_header(header::COOKIE, &cookie)
                .with_form(&[("login_form-user_name", "jdoe"), ("login_form-password", "secret")]),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = response.body_text();
    assert!(body.contains("You are already logged in."));
    assert!(!body.contains("id=\"login_form\""));
}

#[tokio::test]
async fn test_login_failures() {
    let site = Site::new();

    let response = site.login("jdoe", "wrong").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = response.body_text();
    assert!(body.contains("id=\"login_form\""));
    assert!(body.contains("incorrect user name or password"));
    assert!(response.header(&header::SET_COOKIE).is_none());
    assert!(site.logged(&format!("{PUBLIC}: insert into v_log_users_self_insert")));

    let response = site.login("", "").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = response.body_text();
    assert!(body.contains("No valid username has been supplied."));
    assert!(body.contains("No password has been supplied."));

    let response = site.login(PUBLIC, "anything").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.body_text().contains("No valid username has been supplied."));
}

#[tokio::test]
async fn test_public_account_disabled() {
    let mut site = Site::new();
    site.settings.database.user_public_default = false;

    let response = site.run(request(Method::GET, "/u/login")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body_text().contains("id=\"login_form\""));
    assert!(!site.logged(PUBLIC));

    let response = site.login("jdoe", "wrong").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(!site.logged(PUBLIC));

    let response = site.login("jdoe", "secret").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(site.logged("jdoe: insert into v_log_users_self_insert"));
    assert!(!site.logged(PUBLIC));
}

#[tokio::test]
async fn test_method_not_allowed() {
    let site = Site::new();

    let response = site.run(request(Method::PUT, "/")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = site.run(request(Method::DELETE, "/u/login")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.body_text().contains("Bad Method"));
}

#[tokio::test]
async fn test_options_lists_methods() {
    let site = Site::new();
    let response = site.run(request(Method::OPTIONS, "/u/login")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.header(&header::ALLOW), Some("GET, POST, HEAD, OPTIONS"));
    assert!(response.body().is_empty());
}

#[tokio::test]
async fn test_plain_http_is_not_found() {
    let site = Site::new();
    let response = site.run(Request::new(Method::GET, "/u/login")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unsanitized_path_redirects() {
    let site = Site::new();
    let response = site.run(request(Method::GET, "//u//login/")).await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.header(&header::LOCATION), Some("https://localhost/u/login"));
}

#[tokio::test]
async fn test_logged_out_access() {
    let site = Site::new();

    for path in ["/", "/u/dashboard", "/m/dashboard", "/a/dashboard/x"] {
        let response = site.run(request(Method::GET, path)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{path}");
        assert!(response.body_text().contains("id=\"login_form\""), "{path}");
    }

    let response = site.run(request(Method::GET, "/u/logout")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = site.run(request(Method::GET, "/u/login")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body_text().contains("name=\"login_form-password\""));

    let response = site.run(request(Method::GET, "/missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_view_arguments() {
    let site = Site::new();
    let cookie = session_cookie(&site.login("jdoe", "secret").await);
    let get = |path: &str| request(Method::GET, path).with_header(header::COOKIE, &cookie);

    let response = site.run(get("/u/view")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body_text().contains("View User: Jane Doe"));

    let response = site.run(get("/u/view/1002")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body_text().contains("View User: boss"));

    for path in ["/u/view/999", "/u/view/abc", "/u/view/1001/print", "/u/view/4242", "/u/settings/12"] {
        let response = site.run(get(path)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    }

    let response = site.run(get("/u/settings")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body_text().contains("name=\"user_settings-name_machine\""));
}

#[tokio::test]
async fn test_management_requires_role() {
    let site = Site::new();

    let cookie = session_cookie(&site.login("jdoe", "secret").await);
    let response = site.run(request(Method::GET, "/m/dashboard").with_header(header::COOKIE, &cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.body_text().contains("Access Denied"));

    let cookie = session_cookie(&site.login("boss", "hunter2").await);
    let response = site.run(request(Method::GET, "/m/dashboard").with_header(header::COOKIE, &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body_text().contains("Management Dashboard"));

    let response = site.run(request(Method::GET, "/a/dashboard").with_header(header::COOKIE, &cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let site = Site::new();
    let cookie = session_cookie(&site.login("jdoe", "secret").await);

    let response = site.run(request(Method::GET, "/u/logout").with_header(header::COOKIE, &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body_text().contains("You have been logged out of the system."));
    assert!(response.header(&header::SET_COOKIE).is_some_and(|value| value.contains("Max-Age=0")));
    assert!(site.logged("jdoe: insert into v_log_users_self_insert"));

    let response = site.run(request(Method::GET, "/u/dashboard").with_header(header::COOKIE, &cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(site.store.is_empty().await);
}

#[tokio::test]
async fn test_session_timeout() {
    let mut site = Site::new();
    site.settings.session.expire = 0;

    let cookie = session_cookie(&site.login("jdoe", "secret").await);
    let response = site.run(request(Method::GET, "/u/dashboard").with_header(header::COOKIE, &cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.header(&header::SET_COOKIE).is_some_and(|value| value.contains("Max-Age=0")));
}

#[tokio::test]
async fn test_session_and_form_id_ajax() {
    let site = Site::new();
    let cookie = session_cookie(&site.login("jdoe", "secret").await);

    let response = site.run(request(Method::GET, "/u/session").with_header(header::COOKIE, &cookie)).await;
    assert_eq!(response.header(&header::CONTENT_TYPE), Some("application/json"));
    let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(json["logged_in"], true);
    assert_eq!(json["user"], "jdoe");

    let response = site.run(request(Method::GET, "/s/form_id")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = site.run(request(Method::OPTIONS, "/s/form_id")).await;
    assert_eq!(response.header(&header::ALLOW), Some("POST, OPTIONS"));

    let response = site.run(request(Method::POST, "/s/form_id")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(json["form_id"].as_str().map(str::len), Some(36));
}

#[tokio::test]
async fn test_response_headers_and_language() {
    let site = Site::new();
    let response = site
        .run(request(Method::GET, "/u/login").with_header(header::ACCEPT_LANGUAGE, "fr;q=0.9, ja;q=0.8, en;q=0.5"))
        .await;

    assert_eq!(response.header(&header::CONTENT_LANGUAGE), Some("ja"));
    assert_eq!(response.header(&header::VARY), Some("Accept-Language"));
    assert_eq!(response.header(&header::PRAGMA), Some("no-cache"));
    assert_eq!(response.header(&header::CACHE_CONTROL), Some("no-cache, no-store, must-revalidate"));
    assert_eq!(response.header(&header::CONTENT_TYPE), Some("text/html; charset=utf-8"));

    let body = response.body_text();
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains("<html lang=\"ja\">"));
    assert!(body.contains("システムへのログイン"));
    assert!(body.contains("<link rel=\"canonical\" href=\"https://localhost/u/login\">"));
}
