use async_trait::async_trait;
use thiserror::Error;

use crate::declare::Quote;

/// 雅虎財經
pub mod yahoo;

/// 單一代號抓取報價時可能發生的錯誤
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// 無法連線至報價站點，或讀取回應內容時中斷
    #[error("Network error for {symbol}: {reason}")]
    Network { symbol: String, reason: String },
    /// 回應不是預期的 chart/result 結構，或 JSON 無法解析
    #[error("Invalid response for {symbol}: {reason}")]
    InvalidResponse { symbol: String, reason: String },
}

impl FetchError {
    pub fn network(symbol: &str, reason: impl ToString) -> Self {
        FetchError::Network {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_response(symbol: &str, reason: impl ToString) -> Self {
        FetchError::InvalidResponse {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// 報價來源，一次呼叫只送出一個請求
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self, symbol: &str) -> Result<Quote, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message() {
        let why = FetchError::invalid_response("^GSPC", "chart.result is missing");
        assert_eq!(
            why.to_string(),
            "Invalid response for ^GSPC: chart.result is missing"
        );

        let why = FetchError::network("^DJI", "connection refused");
        assert_eq!(why.to_string(), "Network error for ^DJI: connection refused");
    }
}
