use super::client::{HttpClient, RawResponse};
use crate::error::FetchError;

/// [`HttpClient`] backed by reqwest's blocking client and its default timeout.
pub struct BasicClient(reqwest::blocking::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::blocking::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for BasicClient {
    fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        let resp = self.0.get(url).send()?;
        let status = resp.status().as_u16();
        if status != 200 {
            // The body of an error page is of no use to us.
            return Ok(RawResponse {
                status,
                body: String::new(),
            });
        }
        Ok(RawResponse {
            status,
            body: resp.text()?,
        })
    }
}
