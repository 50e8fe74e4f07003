pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::error::TransportError;

/// Transport indirection: obtains the raw document behind an address.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, address: &str) -> Result<Vec<u8>, TransportError>;
}
