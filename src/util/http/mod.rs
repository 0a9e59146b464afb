use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use reqwest::{Client, Method, Response};

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

/// 報價站點會擋下非瀏覽器的請求
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Returns the reqwest client singleton instance or creates one if it doesn't exist.
///
/// Timeouts are left at the transport defaults.
fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        // 已安裝過 provider 時會回傳 Err，忽略即可
        let _ = rustls::crypto::ring::default_provider().install_default();

        Client::builder()
            // ===== 壓縮 =====
            .brotli(true)
            .gzip(true)
            .zstd(true)
            // ===== Headers =====
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

/// Performs an HTTP GET request and returns the response as text.
///
/// # Arguments
///
/// * `url`: The URL to send the GET request to.
///
/// # Returns
///
/// * `Result<String>`: The response text, or an error if the request fails or the body cannot be read.
pub async fn get(url: &str) -> Result<String> {
    send(Method::GET, url)
        .await?
        .text()
        .await
        .map_err(|e| anyhow!("Error reading response text: {}", e))
}

/// Sends a single HTTP request. Failures are returned to the caller as-is, without retrying.
async fn send(method: Method, url: &str) -> Result<Response> {
    get_client()?
        .request(method, url)
        .send()
        .await
        .map_err(|why| anyhow!("Failed to send request to {}: {}", url, why))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn test_get() {
        let url = "https://query1.finance.yahoo.com/v8/finance/chart/%5EGSPC?interval=1d&range=5d";
        match get(url).await {
            Ok(text) => assert!(text.contains("chart")),
            Err(why) => panic!("Failed to get because {:?}", why),
        }
    }

    #[test]
    fn test_client_is_singleton() {
        let first = get_client().unwrap() as *const Client;
        let second = get_client().unwrap() as *const Client;
        assert_eq!(first, second);
    }
}
