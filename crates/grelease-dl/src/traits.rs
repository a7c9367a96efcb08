use crate::{error::FetchError, http_client::HttpResponse};

pub trait Asset {
    fn id(&self) -> u64;
    fn name(&self) -> &str;
    fn size(&self) -> u64;
    fn url(&self) -> &str;
}

pub trait Release {
    type Asset: Asset;

    fn id(&self) -> u64;
    fn name(&self) -> &str;
    fn tag(&self) -> &str;
    fn is_draft(&self) -> bool;
    fn is_prerelease(&self) -> bool;
    fn assets(&self) -> &[Self::Asset];
}

/// A blocking HTTP capability: one GET, one response.
///
/// Implementations must bound every call with a timeout and must return
/// non-success statuses as a response rather than an error.
pub trait Transport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError>;
}
