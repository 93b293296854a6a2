// ABOUTME: HTTP transport to the OESS control API using hyper's HTTP/1 client.
// ABOUTME: The Transport trait is the seam tests use to script NRM responses.

use super::error::{NrmError, Result};
use super::session::Credentials;
use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{StatusCode, Uri};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

/// Authenticated request/response channel to the NRM.
///
/// Implementations issue a GET for `path_and_query` (relative to the control
/// URL) and return the raw response body of a successful reply.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path_and_query: &str) -> Result<Bytes>;
}

/// Plain HTTP/1.1 transport with Basic authentication on every request.
///
/// One connection per request; OESS CGI scripts close the connection after
/// each reply anyway.
pub struct HttpTransport {
    host: String,
    port: u16,
    base_path: String,
    authorization: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_path", &self.base_path)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(url: &str, credentials: &Credentials) -> Result<Self> {
        let invalid = |reason: &str| NrmError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let uri: Uri = url.parse().map_err(|_| invalid("not a valid URI"))?;
        match uri.scheme_str() {
            Some("http") => {}
            Some("https") => {
                return Err(invalid(
                    "https is not supported, point the adapter at a local TLS-terminating proxy",
                ));
            }
            _ => return Err(invalid("scheme must be http")),
        }
        let host = uri.host().ok_or_else(|| invalid("missing host"))?.to_string();
        let port = uri.port_u16().unwrap_or(80);

        let mut base_path = uri.path().to_string();
        if !base_path.ends_with('/') {
            base_path.push('/');
        }

        let token = base64::engine::general_purpose::STANDARD.encode(format!(
            "{}:{}",
            credentials.username(),
            credentials.password()
        ));

        Ok(Self {
            host,
            port,
            base_path,
            authorization: format!("Basic {}", token),
        })
    }

    fn host_header(&self) -> String {
        if self.port == 80 {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path_and_query: &str) -> Result<Bytes> {
        let stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| NrmError::Connection {
                host: self.host_header(),
                reason: e.to_string(),
            })?;

        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| NrmError::Request(format!("HTTP handshake failed: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("NRM connection error: {}", e);
            }
        });

        let uri = format!("{}{}", self.base_path, path_and_query);
        let req = hyper::Request::builder()
            .method("GET")
            .uri(&uri)
            .header("Host", self.host_header())
            .header("Authorization", &self.authorization)
            .header("Accept", "application/json")
            .body(Empty::<Bytes>::new())
            .map_err(|e| NrmError::Request(format!("failed to build request: {}", e)))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| NrmError::Request(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| NrmError::Request(format!("failed to read response: {}", e)))?
            .to_bytes();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(NrmError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            return Err(NrmError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("nsi", "secret")
    }

    #[test]
    fn base_path_gets_trailing_slash() {
        let t = HttpTransport::new("http://oess.example.net:8080/oess", &creds()).unwrap();
        assert_eq!(t.base_path, "/oess/");
        assert_eq!(t.host_header(), "oess.example.net:8080");
    }

    #[test]
    fn default_port_is_80() {
        let t = HttpTransport::new("http://oess.example.net/", &creds()).unwrap();
        assert_eq!(t.port, 80);
        assert_eq!(t.host_header(), "oess.example.net");
    }

    #[test]
    fn https_is_rejected() {
        let err = HttpTransport::new("https://oess.example.net/", &creds()).unwrap_err();
        assert!(matches!(err, NrmError::InvalidUrl { .. }));
    }

    #[test]
    fn basic_authorization_header() {
        let t = HttpTransport::new("http://oess.example.net/", &creds()).unwrap();
        // base64("nsi:secret")
        assert_eq!(t.authorization, "Basic bnNpOnNlY3JldA==");
    }

    #[test]
    fn debug_hides_authorization() {
        let t = HttpTransport::new("http://oess.example.net/", &creds()).unwrap();
        assert!(!format!("{:?}", t).contains("bnNp"));
    }
}
