use http::StatusCode;
use serde::Serialize;

pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML_UTF8: &str = "text/html; charset=utf-8";
pub const APPLICATION_JSON_UTF8: &str = "application/json; charset=utf-8";

/// Outgoing HTTP response.
///
/// Headers keep insertion order. Setting a header whose name already exists
/// (compared case-insensitively) replaces the value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    content: Option<String>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            content: None,
        }
    }
}

/// Message to use for an error body; an empty message counts as absent.
fn message_or(message: Option<&str>, default: &str) -> String {
    match message {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => default.to_string(),
    }
}

impl Response {
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// 200 with optional content and no content type.
    #[must_use]
    pub fn ok(content: Option<String>) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    /// 200 `text/html; charset=utf-8`.
    #[must_use]
    pub fn html(content: impl Into<String>) -> Self {
        Self::ok(Some(content.into())).with_header("Content-Type", TEXT_HTML_UTF8)
    }

    /// 301 with a `Location` header.
    #[must_use]
    pub fn redirect(url: &str) -> Self {
        Self::new(StatusCode::MOVED_PERMANENTLY).with_header("Location", url)
    }

    fn plain_error(status: StatusCode, message: Option<&str>, default: &str) -> Self {
        Self::new(status)
            .with_header("Content-Type", TEXT_PLAIN_UTF8)
            .with_content(message_or(message, default))
    }

    /// 404, body defaults to `File not found.`
    #[must_use]
    pub fn not_found(message: Option<&str>) -> Self {
        Self::plain_error(StatusCode::NOT_FOUND, message, "File not found.")
    }

    /// 400, body defaults to `Bad request.`
    #[must_use]
    pub fn bad_request(message: Option<&str>) -> Self {
        Self::plain_error(StatusCode::BAD_REQUEST, message, "Bad request.")
    }

    /// 401, body defaults to `Unauthorized.`
    #[must_use]
    pub fn unauthorized(message: Option<&str>) -> Self {
        Self::plain_error(StatusCode::UNAUTHORIZED, message, "Unauthorized.")
    }

    /// 500, body defaults to `Internal server error.`
    #[must_use]
    pub fn internal_error(message: Option<&str>) -> Self {
        Self::plain_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            "Internal server error.",
        )
    }

    /// 200 with `value` pretty printed using four-space indentation.
    ///
    /// # Errors
    ///
    /// Fails when `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        // serde_json only ever writes valid UTF-8
        let body = String::from_utf8_lossy(&buf).into_owned();
        Ok(Self::ok(Some(body)).with_header("Content-Type", APPLICATION_JSON_UTF8))
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn set_content(&mut self, content: Option<String>) {
        self.content = content;
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    #[must_use]
    pub fn into_content(self) -> Option<String> {
        self.content
    }
}
