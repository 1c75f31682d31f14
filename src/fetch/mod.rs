mod basic;
mod client;

pub use basic::BasicClient;
pub use client::{HttpClient, RawResponse};

use tracing::debug;

use crate::error::FetchError;

/// Downloads the feed body. Anything but a 200 response is an error.
#[tracing::instrument(level = "debug", skip(client))]
pub fn fetch_feed<C: HttpClient>(client: &C, url: &str) -> Result<String, FetchError> {
    let resp = client.get(url)?;
    if resp.status != 200 {
        return Err(FetchError::Status {
            status: resp.status,
        });
    }

    debug!(bytes = resp.body.len(), "Feed body received");
    Ok(resp.body)
}
