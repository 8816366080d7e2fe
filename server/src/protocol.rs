//! Minimal HTTP/1.1 request parsing and response encoding.
//!
//! Only what the router needs: the request line, headers, and a body sized
//! by `Content-Length`. Every response closes the connection.

use http::{Method, StatusCode};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Request bodies above this size are rejected.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const MAX_HEADERS: usize = 100;

/// Longest accepted request or header line, terminator included.
pub const MAX_LINE_BYTES: usize = 8 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed request: {0}")]
    Malformed(String),

    #[error("Connection closed before a request was received")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Path without the query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Request {
    pub fn new(method: Method, path: &str, body: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Non-empty path segments, e.g. `/agent/3/` -> `["agent", "3"]`.
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    pub fn json(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/json",
            body,
        }
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or(""),
            self.content_type,
            self.body.len(),
        );
        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }

    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes()).await?;
        writer.flush().await
    }
}

/// Read one request from `reader`.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if read_line_capped(reader, &mut line).await? == 0 {
        return Err(HttpError::Closed);
    }

    let mut parts = line.split_whitespace();
    let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(HttpError::Malformed(format!("bad request line '{}'", line.trim_end())));
    };
    if !version.starts_with("HTTP/") {
        return Err(HttpError::Malformed(format!("bad protocol '{version}'")));
    }
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|_| HttpError::Malformed(format!("bad method '{method}'")))?;
    let path = target.split('?').next().unwrap_or(target).to_string();

    let mut headers = Vec::new();
    loop {
        let mut header = String::new();
        if read_line_capped(reader, &mut header).await? == 0 {
            return Err(HttpError::Malformed("unexpected end of headers".to_string()));
        }
        let header = header.trim_end_matches(['\r', '\n']);
        if header.is_empty() {
            break;
        }
        if headers.len() >= MAX_HEADERS {
            return Err(HttpError::Malformed("too many headers".to_string()));
        }
        let Some((name, value)) = header.split_once(':') else {
            return Err(HttpError::Malformed(format!("bad header '{header}'")));
        };
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    let mut request = Request {
        method,
        path,
        headers,
        body: String::new(),
    };

    let length = match request.header("content-length") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| HttpError::Malformed(format!("bad Content-Length '{value}'")))?,
        None => 0,
    };
    if length > MAX_BODY_BYTES {
        return Err(HttpError::Malformed(format!("body of {length} bytes is too large")));
    }
    if length > 0 {
        let mut body = vec![0u8; length];
        reader.read_exact(&mut body).await?;
        request.body = String::from_utf8(body)
            .map_err(|_| HttpError::Malformed("body is not UTF-8".to_string()))?;
    }

    Ok(request)
}

/// `read_line` that gives up after [`MAX_LINE_BYTES`].
async fn read_line_capped<R>(reader: &mut R, line: &mut String) -> Result<usize, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let read = (&mut *reader)
        .take(MAX_LINE_BYTES as u64 + 1)
        .read_line(line)
        .await?;
    if line.len() > MAX_LINE_BYTES {
        return Err(HttpError::Malformed(format!(
            "line longer than {MAX_LINE_BYTES} bytes"
        )));
    }
    Ok(read)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn parse(raw: &str) -> Result<Request, HttpError> {
        let mut reader = raw.as_bytes();
        read_request(&mut reader).await
    }

    #[tokio::test]
    async fn test_parse_get_without_body() {
        let request = parse("GET /agent/3?verbose=1 HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/agent/3");
        assert_eq!(request.header("host"), Some("localhost"));
        assert_eq!(request.segments(), vec!["agent", "3"]);
        assert!(request.body.is_empty());
    }

    #[tokio::test]
    async fn test_parse_post_with_body() {
        let body = r#"{"name":"Sova"}"#;
        let raw = format!(
            "POST /agent HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        );
        let request = parse(&raw).await.unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, body);
    }

    #[tokio::test]
    async fn test_bare_newlines_accepted() {
        let request = parse("DELETE /map/1 HTTP/1.0\n\n").await.unwrap();
        assert_eq!(request.method, Method::DELETE);
    }

    #[tokio::test]
    async fn test_malformed_requests() {
        assert!(matches!(parse("").await, Err(HttpError::Closed)));
        assert!(matches!(parse("GET\r\n\r\n").await, Err(HttpError::Malformed(_))));
        assert!(matches!(
            parse("GET / FTP/1.0\r\n\r\n").await,
            Err(HttpError::Malformed(_))
        ));
        assert!(matches!(
            parse("GET / HTTP/1.1\r\nbroken header\r\n\r\n").await,
            Err(HttpError::Malformed(_))
        ));
        assert!(matches!(
            parse("POST / HTTP/1.1\r\nContent-Length: abc\r\n\r\n").await,
            Err(HttpError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_overlong_lines_rejected() {
        let long = "a".repeat(MAX_LINE_BYTES + 10);

        let header = format!("GET / HTTP/1.1\r\nX-Long: {long}\r\n\r\n");
        assert!(matches!(parse(&header).await, Err(HttpError::Malformed(_))));

        let request_line = format!("GET /{long} HTTP/1.1\r\n\r\n");
        assert!(matches!(parse(&request_line).await, Err(HttpError::Malformed(_))));

        let near_limit = "b".repeat(MAX_LINE_BYTES - 100);
        let ok = format!("GET / HTTP/1.1\r\nX-Big: {near_limit}\r\n\r\n");
        assert_eq!(parse(&ok).await.unwrap().header("x-big"), Some(near_limit.as_str()));
    }

    #[tokio::test]
    async fn test_truncated_body_is_io_error() {
        let result = parse("POST /agent HTTP/1.1\r\nContent-Length: 10\r\n\r\n{}").await;
        assert!(matches!(result, Err(HttpError::Io(_))));
    }

    #[test]
    fn test_segments_skip_empty() {
        let request = Request::new(Method::GET, "//player//7/agent/", "");
        assert_eq!(request.segments(), vec!["player", "7", "agent"]);
    }

    #[test]
    fn test_response_encoding() {
        let response = Response::json(r#"{"id":1}"#.to_string());
        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n"));
        assert!(text.contains("Content-Length: 8\r\n"));
        assert!(text.ends_with("\r\n\r\n{\"id\":1}"));
    }

    #[test]
    fn test_not_found_encoding() {
        let response = Response::text(StatusCode::NOT_FOUND, "Agent 9 not found");
        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("Content-Type: text/plain"));
    }
}
