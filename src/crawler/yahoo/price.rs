use async_trait::async_trait;

use crate::{
    crawler::{
        yahoo::{chart, Yahoo, HOST},
        FetchError, QuoteSource,
    },
    declare::Quote,
    util,
};

/// 組出 chart API 網址，請求 5 日區間的日線
fn chart_url(symbol: &str) -> String {
    format!(
        "https://{host}/v8/finance/chart/{symbol}?interval=1d&range=5d",
        host = HOST,
        symbol = urlencoding::encode(symbol)
    )
}

#[async_trait]
impl QuoteSource for Yahoo {
    async fn fetch(&self, symbol: &str) -> Result<Quote, FetchError> {
        let url = chart_url(symbol);
        let text = util::http::get(&url)
            .await
            .map_err(|why| FetchError::network(symbol, why))?;

        chart::parse(symbol, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_url_encodes_symbol() {
        assert_eq!(
            chart_url("^GSPC"),
            "https://query1.finance.yahoo.com/v8/finance/chart/%5EGSPC?interval=1d&range=5d"
        );
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch() {
        match Yahoo::new().fetch("^GSPC").await {
            Ok(quote) => {
                dbg!(&quote);
                assert_eq!(quote.symbol, "^GSPC");
            }
            Err(why) => panic!("Failed to fetch because {:?}", why),
        }
    }
}
