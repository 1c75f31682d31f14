use crate::error::FetchError;

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Something that can perform a blocking GET. Lets tests serve canned feeds.
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<RawResponse, FetchError>;
}
