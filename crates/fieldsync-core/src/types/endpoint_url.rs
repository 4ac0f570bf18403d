//! Sync endpoint URL type.

use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// Where pending records are uploaded.
///
/// Either a backend (`https://`, or `http://` on loopback for local testing)
/// or an outbox directory (`file://`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EndpointUrl(Url);

impl EndpointUrl {
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let reject = |reason: &str| -> Error {
            InvalidInputError::EndpointUrl {
                value: s.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        let url = Url::parse(s).map_err(|e| reject(&e.to_string()))?;

        match url.scheme() {
            "file" if matches!(url.path(), "" | "/") => {
                return Err(reject("file:// URL must name a directory"));
            }
            "file" => {}
            "https" if url.host_str().is_some() => {}
            "http" if is_loopback(&url) => {}
            "http" => return Err(reject("plain HTTP is only allowed for loopback hosts")),
            _ => return Err(reject("expected an https:// or file:// URL")),
        }

        Ok(Self(url))
    }

    /// Join an API path onto the base, keeping any base path prefix.
    pub fn api_url(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    /// True for an outbox directory.
    pub fn is_local(&self) -> bool {
        self.0.scheme() == "file"
    }

    pub fn is_network(&self) -> bool {
        matches!(self.0.scheme(), "http" | "https")
    }

    /// Outbox directory, for `file://` endpoints.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.is_local() {
            self.0.to_file_path().ok()
        } else {
            None
        }
    }
}

fn is_loopback(url: &Url) -> bool {
    matches!(
        url.host_str(),
        Some("localhost" | "127.0.0.1" | "[::1]")
    )
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
