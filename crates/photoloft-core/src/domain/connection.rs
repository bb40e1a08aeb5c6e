//! Parameters required to reach a photo library instance.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ApiError;

/// Holds everything needed to connect to a library instance, independent of
/// any authenticated session.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Instance root URL. Never contains userinfo credentials; those are
    /// extracted into [`ConnectionParams::http_auth`] at construction time.
    root_url: Url,

    /// Alias (name) of an installed client certificate to use for mTLS.
    /// Carried as data only; TLS setup happens in the transport.
    pub client_certificate_alias: Option<String>,

    /// Ready `Authorization` header value required by the HTTP server in
    /// front of the library. Not the library credentials.
    pub http_auth: Option<String>,
}

impl ConnectionParams {
    /// Creates connection params from a root URL.
    ///
    /// Rejects URLs that cannot carry path segments (`mailto:` and friends)
    /// or use a non-HTTP scheme.
    pub fn new(
        root_url: Url,
        client_certificate_alias: Option<String>,
        http_auth: Option<String>,
    ) -> Result<Self, ApiError> {
        if root_url.cannot_be_a_base() {
            return Err(ApiError::invariant(format!(
                "root URL cannot be a base: {root_url}"
            )));
        }
        if root_url.scheme() != "http" && root_url.scheme() != "https" {
            return Err(ApiError::invariant(format!(
                "unsupported root URL scheme: {}",
                root_url.scheme()
            )));
        }

        Ok(Self {
            root_url,
            client_certificate_alias,
            http_auth,
        })
    }

    /// Returns the instance root URL.
    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    /// API root URL (not including the version), with a trailing slash.
    pub fn api_url(&self) -> Url {
        self.child_url("api")
    }

    /// Library web client root URL, with a trailing slash.
    pub fn web_library_url(&self) -> Url {
        self.child_url("library")
    }

    fn child_url(&self, segment: &str) -> Url {
        let mut url = self.root_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            // Force a trailing slash so further joins append instead of replace.
            segments.pop_if_empty().push(segment).push("");
        }
        url
    }
}

impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("root_url", &self.root_url.as_str())
            .field("client_certificate_alias", &self.client_certificate_alias)
            .field("http_auth", &self.http_auth.as_ref().map(|_| "XXXXXX"))
            .finish()
    }
}
