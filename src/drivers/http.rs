//! HTTP inventory driver
//!
//! Queries the tracker's `/get_box_info/<barcode>` endpoint. Failures are
//! reported to the caller, which logs and swallows them; there is no retry.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::config::InventoryConfig;
use crate::drivers::{BoxInfo, InventoryDriver};

pub struct HttpInventoryDriver {
    base_url: Url,
    client: Client,
}

impl HttpInventoryDriver {
    pub fn new(config: &InventoryConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid inventory base URL: {}", config.base_url))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { base_url, client })
    }

    /// Build the lookup URL with the barcode percent-encoded as a path
    /// segment.
    fn lookup_url(&self, barcode: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Inventory base URL cannot hold path segments"))?
            .pop_if_empty()
            .push("get_box_info")
            .push(barcode);
        Ok(url)
    }
}

#[async_trait]
impl InventoryDriver for HttpInventoryDriver {
    fn name(&self) -> &str {
        "inventory-http"
    }

    async fn init(&self) -> Result<()> {
        info!("🔌 Inventory lookup endpoint: {}", self.base_url);
        Ok(())
    }

    async fn lookup(&self, barcode: &str) -> Result<BoxInfo> {
        let url = self.lookup_url(barcode)?;
        debug!("Looking up barcode {} via {}", barcode, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Lookup request failed for barcode {}", barcode))?
            .error_for_status()
            .context("Lookup endpoint returned an error status")?;

        let info: BoxInfo = response
            .json()
            .await
            .context("Failed to parse lookup response")?;

        Ok(info)
    }

    async fn shutdown(&self) -> Result<()> {
        debug!("HTTP inventory driver shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_driver(base_url: &str) -> HttpInventoryDriver {
        HttpInventoryDriver::new(&InventoryConfig {
            base_url: base_url.to_string(),
            timeout_ms: 2000,
            driver: "http".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_lookup_url_encodes_barcode() {
        let driver = make_driver("http://localhost:5000");
        let url = driver.lookup_url("ABC 123/4").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/get_box_info/ABC%20123%2F4"
        );
    }

    #[test]
    fn test_lookup_url_tolerates_trailing_slash() {
        let driver = make_driver("http://localhost:5000/");
        let url = driver.lookup_url("ABC-123").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/get_box_info/ABC-123");
    }

    #[tokio::test]
    async fn test_lookup_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/get_box_info/WIDGET-001")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "found": true,
                    "box_id": "WIDGET_LOT7_3",
                    "hardware_type": "Widget",
                    "lot_number": "LOT7",
                    "remaining_quantity": 7
                }"#,
            )
            .create_async()
            .await;

        let driver = make_driver(&server.url());
        let info = driver.lookup("WIDGET-001").await.unwrap();

        mock.assert_async().await;
        assert!(info.found);
        assert_eq!(info.remaining_quantity, Some(7));
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/get_box_info/NOPE-999")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"found": false}"#)
            .create_async()
            .await;

        let driver = make_driver(&server.url());
        let info = driver.lookup("NOPE-999").await.unwrap();
        assert!(!info.found);
        assert_eq!(info.remaining_quantity, None);
    }

    #[tokio::test]
    async fn test_lookup_server_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/get_box_info/BOOM-500")
            .with_status(500)
            .create_async()
            .await;

        let driver = make_driver(&server.url());
        assert!(driver.lookup("BOOM-500").await.is_err());
    }

    #[tokio::test]
    async fn test_lookup_garbage_body_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/get_box_info/BAD-JSON")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let driver = make_driver(&server.url());
        assert!(driver.lookup("BAD-JSON").await.is_err());
    }
}
