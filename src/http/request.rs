use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, header};
use std::collections::HashMap;
use std::net::SocketAddr;

/// Входящий HTTP-запрос в виде, удобном для маршрутизатора и обработчиков
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    /// Путь без строки запроса, как пришёл от клиента
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    form: HashMap<String, String>,
    https: bool,
    client: Option<SocketAddr>,
}

impl Request {
    /// Создаёт запрос из метода и цели вида `/path?query`
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        let path = if path.is_empty() { "/".to_string() } else { path.to_string() };

        Self {
            method,
            path,
            query,
            headers: HeaderMap::new(),
            form: HashMap::new(),
            https: false,
            client: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.append(name, value);
        }
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub const fn with_https(mut self, https: bool) -> Self {
        self.https = https;
        self
    }

    #[must_use]
    pub const fn with_client(mut self, client: Option<SocketAddr>) -> Self {
        self.client = client;
        self
    }

    /// Разбирает тело `application/x-www-form-urlencoded`
    #[must_use]
    pub fn with_form_body(mut self, body: &str) -> Self {
        self.form = parse_form(body);
        self
    }

    #[must_use]
    pub fn with_form(mut self, fields: &[(&str, &str)]) -> Self {
        self.form = fields.iter().map(|(name, value)| ((*name).to_string(), (*value).to_string())).collect();
        self
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    #[must_use]
    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }

    #[must_use]
    pub const fn is_https(&self) -> bool {
        self.https
    }

    #[must_use]
    pub const fn client(&self) -> Option<SocketAddr> {
        self.client
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.header(&header::USER_AGENT).unwrap_or_default()
    }

    /// Заголовки запроса для журнала активности
    #[must_use]
    pub fn headers_json(&self) -> serde_json::Value {
        let map = self
            .headers
            .iter()
            .filter(|(name, _)| *name != header::COOKIE && *name != header::AUTHORIZATION)
            .map(|(name, value)| {
                let value = value.to_str().unwrap_or_default().to_string();
                (name.as_str().to_string(), serde_json::Value::String(value))
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

fn parse_form(body: &str) -> HashMap<String, String> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(name), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or(spaced.clone(), |decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_split() {
        let request = Request::new(Method::GET, "/u/view/1001?x=1");
        assert_eq!(request.path(), "/u/view/1001");
        assert_eq!(request.query(), Some("x=1"));

        let root = Request::new(Method::GET, "");
        assert_eq!(root.path(), "/");
        assert_eq!(root.query(), None);
    }

    #[test]
    fn test_form_body_decoding() {
        let request = Request::new(Method::POST, "/u/login")
            .with_form_body("login_form-user_name=j+doe&login_form-password=p%26ss&empty");
        assert_eq!(request.form_value("login_form-user_name"), Some("j doe"));
        assert_eq!(request.form_value("login_form-password"), Some("p&ss"));
        assert_eq!(request.form_value("empty"), Some(""));
        assert_eq!(request.form_value("missing"), None);
    }

    #[test]
    fn test_headers_json_hides_credentials() {
        let request = Request::new(Method::GET, "/")
            .with_header(header::COOKIE, "standard-session=abc")
            .with_header(header::ACCEPT_LANGUAGE, "ja");
        let json = request.headers_json();
        assert_eq!(json["accept-language"], "ja");
        assert!(json.get("cookie").is_none());
    }
}
