//! HTTP access to the Open States API and its bulk archives.

use std::io::Write;

use reqwest::blocking::Client;
use url::Url;

use crate::error::Result;

pub mod sessions;
pub mod zips;

pub use sessions::{Download, LegislativeSession, SessionResolver};
pub use zips::{archive_filename, ArchiveCache};

/// Blocking transport used by [`SessionResolver`] and [`ArchiveCache`].
pub trait Fetch {
    /// GET `url` and return the body as text.
    fn get_text(&self, url: &Url) -> Result<String>;

    /// GET `url` and copy the body into `dest`, returning the byte count.
    fn download(&self, url: &Url, dest: &mut dyn Write) -> Result<u64>;
}

/// [`Fetch`] over a `reqwest` blocking client. Non-success statuses are errors.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Client without reqwest's default 30s total timeout, so whole-session
    /// archives can take as long as the transfer needs.
    pub fn new() -> Result<Self> {
        let client = Client::builder().timeout(None).build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    fn get_text(&self, url: &Url) -> Result<String> {
        let text = self
            .client
            .get(url.clone())
            .send()?
            .error_for_status()?
            .text()?;
        Ok(text)
    }

    fn download(&self, url: &Url, dest: &mut dyn Write) -> Result<u64> {
        let mut resp = self.client.get(url.clone()).send()?.error_for_status()?;
        Ok(resp.copy_to(dest)?)
    }
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get_text(&self, url: &Url) -> Result<String> {
        (**self).get_text(url)
    }

    fn download(&self, url: &Url, dest: &mut dyn Write) -> Result<u64> {
        (**self).download(url, dest)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory [`Fetch`] that records every request.

    use super::Fetch;
    use crate::error::Result;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io::Write;
    use url::Url;

    #[derive(Default)]
    pub struct MockFetcher {
        texts: HashMap<String, String>,
        bodies: HashMap<String, Vec<u8>>,
        pub calls: RefCell<Vec<String>>,
    }

    impl MockFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Serve `body` for any URL whose path equals `path`.
        pub fn with_text(mut self, path: &str, body: &str) -> Self {
            self.texts.insert(path.to_string(), body.to_string());
            self
        }

        pub fn with_body(mut self, path: &str, body: Vec<u8>) -> Self {
            self.bodies.insert(path.to_string(), body);
            self
        }

        pub fn calls_to(&self, path: &str) -> usize {
            self.calls.borrow().iter().filter(|p| *p == path).count()
        }
    }

    impl Fetch for MockFetcher {
        fn get_text(&self, url: &Url) -> Result<String> {
            self.calls.borrow_mut().push(url.path().to_string());
            let body = self.texts.get(url.path()).unwrap_or_else(|| panic!("unmocked GET {url}"));
            Ok(body.clone())
        }

        fn download(&self, url: &Url, dest: &mut dyn Write) -> Result<u64> {
            self.calls.borrow_mut().push(url.path().to_string());
            let body = self.bodies.get(url.path()).unwrap_or_else(|| panic!("unmocked GET {url}"));
            dest.write_all(body)?;
            Ok(body.len() as u64)
        }
    }
}
