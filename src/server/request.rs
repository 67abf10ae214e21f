use crate::ids::RequestId;
use crate::storage::Session;
use http::Method;
use std::collections::HashMap;
use tracing::debug;

/// An incoming HTTP request as seen by controllers.
///
/// Header names are stored lower-cased. The request uri is the path only;
/// the query string is split off into [`query_param`](Self::query_param).
#[derive(Debug, Clone)]
pub struct Request {
    request_id: RequestId,
    method: Method,
    request_uri: String,
    query: HashMap<String, String>,
    form: HashMap<String, String>,
    cookies: HashMap<String, String>,
    headers: HashMap<String, String>,
    peer_addr: Option<String>,
    session: Session,
}

/// Parse the `cookie` header: `;`-separated `name=value` pairs.
#[must_use]
pub fn parse_cookies(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            if name.is_empty() {
                return None;
            }
            let value = parts.next().unwrap_or("").trim();
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Decode an `application/x-www-form-urlencoded` string (query or body).
///
/// Repeated names keep the last value.
#[must_use]
pub fn parse_urlencoded(input: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(input.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

impl Request {
    /// Build a request from a method and a raw target such as `/a/b?x=1`.
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, parse_urlencoded(query)),
            None => (target, HashMap::new()),
        };
        Self {
            request_id: RequestId::new(),
            method,
            request_uri: path.to_string(),
            query,
            form: HashMap::new(),
            cookies: HashMap::new(),
            headers: HashMap::new(),
            peer_addr: None,
            session: Session::new(),
        }
    }

    #[must_use]
    pub fn get(target: &str) -> Self {
        Self::new(Method::GET, target)
    }

    #[must_use]
    pub fn post(target: &str) -> Self {
        Self::new(Method::POST, target)
    }

    /// Add a header. `cookie` headers also populate the cookie map and a
    /// valid `x-request-id` replaces the generated id.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "cookie" => self.cookies.extend(parse_cookies(value)),
            "x-request-id" => self.request_id = RequestId::from_header_or_new(Some(value)),
            _ => {}
        }
        self.headers.insert(name, value.to_string());
        self
    }

    #[must_use]
    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }

    /// Attach an urlencoded body as form parameters.
    #[must_use]
    pub fn with_form_body(mut self, body: &str) -> Self {
        self.form.extend(parse_urlencoded(body));
        debug!(request_id = %self.request_id, form_fields = self.form.len(), "Form body parsed");
        self
    }

    #[must_use]
    pub fn with_form_param(mut self, name: &str, value: &str) -> Self {
        self.form.insert(name.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.peer_addr = Some(addr.into());
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path part of the request target, without the query string.
    #[must_use]
    pub fn request_uri(&self) -> &str {
        &self.request_uri
    }

    pub fn set_request_uri(&mut self, uri: impl Into<String>) {
        self.request_uri = uri.into();
    }

    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn query_param_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.query_param(name).unwrap_or(default)
    }

    #[must_use]
    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query
    }

    #[must_use]
    pub fn post_param(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn post_param_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.post_param(name).unwrap_or(default)
    }

    #[must_use]
    pub fn post_params(&self) -> &HashMap<String, String> {
        &self.form
    }

    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.cookies
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    #[must_use]
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    #[must_use]
    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    #[must_use]
    pub fn is_put(&self) -> bool {
        self.method == Method::PUT
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.method == Method::DELETE
    }

    /// Client address: `x-forwarded-for`, then `client-ip`, then the peer.
    #[must_use]
    pub fn remote_address(&self) -> Option<&str> {
        ["x-forwarded-for", "client-ip"]
            .iter()
            .filter_map(|name| self.header(name))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .or(self.peer_addr.as_deref())
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }
}
