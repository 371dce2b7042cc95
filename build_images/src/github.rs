use std::{fmt, time::Duration};

use log::debug;

use crate::config::{Repository, GITHUB_API_URL, USER_AGENT};

/// Partial implementation of an entry returned by the list repository tags endpoint.
/// See https://docs.github.com/en/rest/repos/repos#list-repository-tags.
#[derive(Debug, serde::Deserialize)]
pub struct TagRecord {
    pub name: String,
}

/// Body of a GitHub error response, e.g. when the unauthenticated rate limit is exceeded.
#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

/// Provides the raw tag names of a repository, in the order the host returns them.
pub trait TagSource {
    fn list_tags(&self, repository: &Repository) -> Result<Vec<TagRecord>, FetchError>;
}

pub struct GitHub {
    client: reqwest::blocking::Client,
    api_url: String,
}

impl GitHub {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_api_url(GITHUB_API_URL)
    }

    pub fn with_api_url(api_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            // The fetch waits for GitHub as long as it takes, like the build and push steps.
            .timeout(Option::<Duration>::None)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }
}

impl TagSource for GitHub {
    fn list_tags(&self, repository: &Repository) -> Result<Vec<TagRecord>, FetchError> {
        let url = repository.tags_url(&self.api_url);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .map_err(FetchError::Request)?;

        let status = response.status();
        let body = response.text().map_err(FetchError::Request)?;

        decode_response(status, &body)
    }
}

/// Maps a response of the list tags endpoint to its tag records. A non-success status is an error
/// carrying GitHub's `message`, if the body has one.
pub fn decode_response(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<Vec<TagRecord>, FetchError> {
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            message: serde_json::from_str::<ErrorBody>(body)
                .ok()
                .map(|body| body.message),
        });
    }

    decode_tags(body)
}

pub fn decode_tags(body: &str) -> Result<Vec<TagRecord>, FetchError> {
    serde_json::from_str(body).map_err(FetchError::Decode)
}

#[derive(Debug)]
pub enum FetchError {
    Client(reqwest::Error),
    Request(reqwest::Error),
    Status {
        status: u16,
        message: Option<String>,
    },
    Decode(serde_json::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to fetch tags: ")?;
        match self {
            FetchError::Client(error) => write!(f, "unable to create the http client: {error}"),
            FetchError::Request(error) => write!(f, "{error}"),
            FetchError::Status { status, message } => {
                write!(f, "server responded with status `{status}`")?;
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            FetchError::Decode(error) => {
                write!(f, "response is not a list of tags: {error}")
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Client(error) | FetchError::Request(error) => Some(error),
            FetchError::Status { .. } => None,
            FetchError::Decode(error) => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread::JoinHandle,
    };

    use super::*;

    #[test]
    fn test_decode_tags() {
        let body = r#"[
            {
                "name": "v4.2.3",
                "zipball_url": "https://api.github.com/repos/paulirish/pwmetrics/zipball/v4.2.3",
                "tarball_url": "https://api.github.com/repos/paulirish/pwmetrics/tarball/v4.2.3",
                "commit": { "sha": "c5b3d4b0c1a0bbd2b3f0e8a4c9e6c6b1d2a3f4e5", "url": "" },
                "node_id": "MDM6UmVmNDY5MjUyOTM6djQuMi4z"
            },
            { "name": "v4.2.2" }
        ]"#;
        let names = decode_tags(body)
            .unwrap()
            .into_iter()
            .map(|tag| tag.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["v4.2.3", "v4.2.2"]);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_tags("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_non_list() {
        let error = decode_tags(r#"{"message": "Not Found"}"#).unwrap_err();
        assert!(matches!(error, FetchError::Decode(_)));
        assert!(decode_tags("<html></html>").is_err());
        assert!(decode_tags(r#"[{"title": "v1.0.0"}]"#).is_err());
    }

    #[test]
    fn test_decode_response_success() {
        let tags = decode_response(reqwest::StatusCode::OK, r#"[{"name": "v1.0.0"}]"#).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "v1.0.0");
    }

    #[test]
    fn test_decode_response_rate_limited() {
        let body = r#"{
            "message": "API rate limit exceeded for 127.0.0.1.",
            "documentation_url": "https://docs.github.com/rest/overview/resources-in-the-rest-api#rate-limiting"
        }"#;
        let error = decode_response(reqwest::StatusCode::FORBIDDEN, body).unwrap_err();
        match error {
            FetchError::Status { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(
                    message.as_deref(),
                    Some("API rate limit exceeded for 127.0.0.1.")
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_response_without_message() {
        let body = "<html><body><h1>502 Bad Gateway</h1></body></html>";
        let error = decode_response(reqwest::StatusCode::BAD_GATEWAY, body).unwrap_err();
        assert!(matches!(
            error,
            FetchError::Status {
                status: 502,
                message: None
            }
        ));
    }

    #[test]
    fn test_decode_response_error_status_with_tag_list() {
        let error = decode_response(reqwest::StatusCode::NOT_FOUND, r#"[{"name": "v1.0.0"}]"#)
            .unwrap_err();
        assert!(matches!(error, FetchError::Status { status: 404, .. }));
    }

    /// Serves one canned HTTP response on a local port and returns the request head it received.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let api_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut buffer = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = stream.read(&mut buffer).unwrap();
                if read == 0 {
                    break;
                }
                head.extend_from_slice(&buffer[..read]);
            }
            write!(
                stream,
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n{body}",
                len = body.len()
            )
            .unwrap();
            String::from_utf8(head).unwrap()
        });
        (api_url, handle)
    }

    #[test]
    fn test_list_tags_over_http() {
        let (api_url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"name": "v4.2.3"}, {"name": "v4.2.2"}]"#,
        );
        let github = GitHub::with_api_url(api_url).unwrap();

        let tags = github
            .list_tags(&Repository::new("paulirish", "pwmetrics"))
            .unwrap();

        let names = tags.into_iter().map(|tag| tag.name).collect::<Vec<_>>();
        assert_eq!(names, ["v4.2.3", "v4.2.2"]);

        let request = server.join().unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /repos/paulirish/pwmetrics/tags?per_page=100 http/1.1"));
        assert!(request.contains(&format!("user-agent: {}", USER_AGENT.to_ascii_lowercase())));
        assert!(request.contains("accept: application/vnd.github+json"));
    }

    #[test]
    fn test_list_tags_over_http_error_status() {
        let (api_url, server) = serve_once(
            "HTTP/1.1 403 Forbidden",
            r#"{"message": "API rate limit exceeded"}"#,
        );
        let github = GitHub::with_api_url(api_url).unwrap();

        let error = github
            .list_tags(&Repository::new("paulirish", "pwmetrics"))
            .unwrap_err();
        server.join().unwrap();

        assert_eq!(
            error.to_string(),
            "failed to fetch tags: server responded with status `403`: API rate limit exceeded"
        );
    }

    #[test]
    fn test_status_message() {
        let error = FetchError::Status {
            status: 403,
            message: Some("API rate limit exceeded".to_owned()),
        };
        assert_eq!(
            error.to_string(),
            "failed to fetch tags: server responded with status `403`: API rate limit exceeded"
        );
        let error = FetchError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(
            error.to_string(),
            "failed to fetch tags: server responded with status `502`"
        );
    }
}
