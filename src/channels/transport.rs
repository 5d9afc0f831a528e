//! Opening components of non-local datasets.

use reqwest::blocking::Client;
use std::io::{self, Read, Write};
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

/// Opens byte streams for identifiers that are not local files.
///
/// Implementations must be shareable across threads; a set may be used
/// from many threads at once (one of them holding the group lock).
pub trait RemoteTransport: Send + Sync {
    /// Open `identifier` for sequential reading.
    fn open_read(&self, identifier: &str) -> io::Result<Box<dyn Read + Send>>;

    /// Open `identifier` for sequential writing.
    fn open_write(&self, identifier: &str) -> io::Result<Box<dyn Write + Send>>;
}

/// Default transport: HTTP(S) GET for reads. Writes are unsupported.
///
/// The client is built on first use and reused for every later open.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    timeout: Duration,
    client: OnceLock<Client>,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> io::Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(io::Error::other)?;
        Ok(self.client.get_or_init(|| client))
    }
}

impl RemoteTransport for HttpTransport {
    fn open_read(&self, identifier: &str) -> io::Result<Box<dyn Read + Send>> {
        let url = Url::parse(identifier)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("no transport for scheme '{}'", url.scheme()),
            ));
        }

        let response = self
            .client()?
            .get(url).send().map_err(io::Error::other)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{}' not found", identifier),
            ));
        }
        if !status.is_success() {
            return Err(io::Error::other(format!(
                "GET '{}' returned {}",
                identifier, status
            )));
        }

        Ok(Box::new(response))
    }

    fn open_write(&self, identifier: &str) -> io::Result<Box<dyn Write + Send>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("cannot write to remote resource '{}'", identifier),
        ))
    }
}
