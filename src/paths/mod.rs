// Path table, access control and handler dispatch
pub mod handler;
pub mod internal;
pub mod management;
pub mod submit;
pub mod text;
pub mod user;

pub use handler::{Context, Executed, Output, PathHandler, PathId};
pub use text::TextId;

use crate::core::ErrorCode;
use axum::http::{Method, StatusCode};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, error};

pub const DEFAULT_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::HEAD, Method::OPTIONS];

/// Односимвольные группы путей
pub const GROUPS: [char; 9] = ['a', 'c', 'd', 'f', 'm', 's', 't', 'u', 'x'];
/// Группы, доступные только вошедшим пользователям
pub const GROUPS_PRIVATE: [char; 3] = ['a', 'm', 'u'];
pub const GROUP_DEFAULT: char = '0';

const WILDCARD: &str = "%";
const WILDCARD_DEPTH: usize = 3;

/// Перенаправление вместо обработчика
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
    pub code: StatusCode,
    /// Цель относительно базового адреса сайта
    pub partial: bool,
}

impl Redirect {
    #[must_use]
    pub fn new(target: impl Into<String>, partial: bool) -> Self {
        Self { target: target.into(), code: StatusCode::MOVED_PERMANENTLY, partial }
    }

    #[must_use]
    pub const fn with_code(mut self, code: StatusCode) -> Self {
        self.code = code;
        self
    }
}

#[derive(Clone)]
pub struct PathEntry {
    pub handler: Option<Arc<dyn PathHandler>>,
    pub methods: Vec<Method>,
    pub redirect: Option<Redirect>,
}

impl PathEntry {
    fn is_routable(&self) -> bool {
        self.handler.is_some() || self.redirect.is_some()
    }
}

#[derive(Clone, Default)]
struct PathNode {
    entry: Option<PathEntry>,
    children: BTreeMap<String, PathNode>,
}

/// Найденный путь и значения сегментов `%`
pub struct PathMatch<'a> {
    pub group: char,
    pub entry: &'a PathEntry,
    pub arguments: Vec<String>,
}

/// Таблица путей по группам
#[derive(Clone, Default)]
pub struct Paths {
    groups: HashMap<char, PathNode>,
}

/// Группа пути и его сегменты
fn split_path(path: &str) -> (char, Vec<&str>) {
    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    let group = segments
        .first()
        .and_then(|first| {
            let mut chars = first.chars();
            match (chars.next(), chars.next()) {
                (Some(group), None) if GROUPS.contains(&group) => Some(group),
                _ => None,
            }
        })
        .unwrap_or(GROUP_DEFAULT);
    (group, segments)
}

fn find_in<'a>(node: &'a PathNode, segments: &[&str], arguments: &mut Vec<String>) -> Option<&'a PathEntry> {
    let Some((first, rest)) = segments.split_first() else {
        return node.entry.as_ref().filter(|entry| entry.is_routable());
    };

    if let Some(found) = node.children.get(*first).and_then(|child| find_in(child, rest, arguments)) {
        return Some(found);
    }

    let child = node.children.get(WILDCARD)?;
    arguments.push((*first).to_string());
    let found = find_in(child, rest, arguments);
    if found.is_none() {
        arguments.pop();
    }
    found
}

/// Убирает повторные, начальные и конечные `/`; корень пустая строка
#[must_use]
pub fn sanitize_path(path: &str) -> String {
    path.split('/').filter(|segment| !segment.is_empty()).collect::<Vec<_>>().join("/")
}

impl Paths {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Стандартные пути сайта
    #[must_use]
    pub fn standard() -> Self {
        let mut paths = Self::new();
        paths.set_path("", Arc::new(internal::Index), &DEFAULT_METHODS);
        paths.set_path("u/login", Arc::new(user::UserLogin), &DEFAULT_METHODS);
        paths.set_path("u/logout", Arc::new(user::UserLogout), &DEFAULT_METHODS);

        paths.set_path_wildcard("u/dashboard", Arc::new(user::UserDashboard), &DEFAULT_METHODS);
        paths.set_path_wildcard("u/view", Arc::new(user::UserView), &DEFAULT_METHODS);
        paths.set_path_wildcard("u/settings", Arc::new(user::UserSettings), &DEFAULT_METHODS);
        paths.set_path_wildcard("u/session", Arc::new(user::UserSession), &DEFAULT_METHODS);
        paths.set_path_wildcard("m/dashboard", Arc::new(management::ManagementDashboard), &DEFAULT_METHODS);
        paths.set_path_wildcard("a/dashboard", Arc::new(management::AdministerDashboard), &DEFAULT_METHODS);
        paths.set_path_wildcard("s/form_id", Arc::new(submit::SubmitFormId), &[Method::POST, Method::OPTIONS]);
        paths
    }

    pub fn set_path(&mut self, path: &str, handler: Arc<dyn PathHandler>, methods: &[Method]) {
        self.insert(path, PathEntry { handler: Some(handler), methods: methods.to_vec(), redirect: None });
    }

    /// Путь и его варианты с `%` на каждом уровне до `WILDCARD_DEPTH`
    pub fn set_path_wildcard(&mut self, path: &str, handler: Arc<dyn PathHandler>, methods: &[Method]) {
        let mut current = sanitize_path(path);
        self.set_path(&current, Arc::clone(&handler), methods);
        for _ in 0..WILDCARD_DEPTH {
            current.push('/');
            current.push_str(WILDCARD);
            self.set_path(&current, Arc::clone(&handler), methods);
        }
    }

    pub fn set_redirect(&mut self, path: &str, redirect: Redirect) {
        self.insert(path, PathEntry { handler: None, methods: DEFAULT_METHODS.to_vec(), redirect: Some(redirect) });
    }

    fn insert(&mut self, path: &str, entry: PathEntry) {
        let (group, segments) = split_path(path);
        let mut node = self.groups.entry(group).or_default();
        for segment in segments {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.entry = Some(entry);
    }

    /// Поиск пути: точный сегмент важнее `%`, совпасть должна вся глубина
    #[must_use]
    pub fn find_path(&self, path: &str) -> Option<PathMatch<'_>> {
        let (group, segments) = split_path(path);
        let root = self.groups.get(&group)?;
        let mut arguments = Vec::new();
        let entry = find_in(root, &segments, &mut arguments)?;
        Some(PathMatch { group, entry, arguments })
    }
}

/// Путь запроса относительно базового пути сайта
fn relative_path<'p>(raw: &'p str, base: &str) -> Option<&'p str> {
    let base = base.trim_end_matches('/');
    let rest = raw.strip_prefix(base)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

fn redirect_target(ctx: &Context<'_>, redirect: &Redirect) -> String {
    if redirect.partial { ctx.url(&redirect.target) } else { redirect.target.clone() }
}

/// Выбор и выполнение обработчика для пути запроса
pub async fn do_process_path(paths: &Paths, ctx: &mut Context<'_>) -> Executed {
    if !ctx.request.is_https() {
        return internal::not_found(ctx);
    }

    let Some(relative) = relative_path(ctx.request.path(), &ctx.settings.base.path) else {
        return internal::not_found(ctx);
    };
    let sanitized = sanitize_path(relative);
    let canonical = if sanitized.is_empty() { String::new() } else { format!("/{sanitized}") };
    ctx.path = sanitized;
    if relative != canonical && !(canonical.is_empty() && relative == "/") {
        return Executed::redirect(ctx.url(&ctx.path), StatusCode::MOVED_PERMANENTLY);
    }

    let Some(found) = paths.find_path(&ctx.path) else {
        debug!(path = %ctx.path, "no path registered");
        return internal::not_found(ctx);
    };
    ctx.arguments.clone_from(&found.arguments);
    let entry = found.entry;

    if !entry.methods.contains(ctx.request.method()) {
        return internal::bad_method(ctx);
    }
    if ctx.request.method() == Method::OPTIONS {
        return internal::options(&entry.methods);
    }

    if let Some(redirect) = &entry.redirect {
        return Executed::redirect(redirect_target(ctx, redirect), redirect.code);
    }
    let Some(handler) = &entry.handler else {
        return internal::not_found(ctx);
    };

    if !ctx.session.is_logged_in() {
        let restricted = ctx.path.is_empty() || GROUPS_PRIVATE.contains(&found.group);
        match handler.id() {
            PathId::Login => {}
            PathId::Logout => return internal::not_found(ctx),
            _ if restricted => {
                return Executed::markup(user::login_form(ctx, &[])).with_status(StatusCode::FORBIDDEN);
            }
            _ => {}
        }
    }

    match handler.execute(ctx).await {
        Ok(executed) => executed,
        Err(e) => match e.code() {
            ErrorCode::NotFoundPath | ErrorCode::InvalidArgument => internal::not_found(ctx),
            ErrorCode::AccessDenied => internal::access_denied(ctx),
            _ => {
                error!(path = %ctx.path, "Handler failed: {}", e);
                internal::server_error(ctx)
            }
        },
    }
}
