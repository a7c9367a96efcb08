pub mod error;
pub mod github;
pub mod http_client;
pub mod pagination;
pub mod platform;
pub mod repository;
pub mod sync;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_utils;
