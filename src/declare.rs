use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::util::datetime::TimeContext;

/// 追蹤的指數代號與顯示名稱
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SymbolSpec {
    pub symbol: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

impl SymbolSpec {
    pub fn new(symbol: &str, display_name: &str) -> Self {
        SymbolSpec {
            symbol: symbol.to_string(),
            display_name: display_name.to_string(),
        }
    }

    /// 預設追蹤的美股主要指數
    pub fn major_indices() -> Vec<SymbolSpec> {
        vec![
            SymbolSpec::new("^GSPC", "S&P 500"),
            SymbolSpec::new("^DJI", "Dow Jones Industrial Average"),
            SymbolSpec::new("^IXIC", "NASDAQ Composite"),
            SymbolSpec::new("^RUT", "Russell 2000"),
            SymbolSpec::new("^VIX", "CBOE Volatility Index (VIX)"),
        ]
    }
}

/// 單一指數經正規化後的報價
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub price: Decimal,
    /// 無法取得昨收時為 0
    pub previous_close: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub market_state: String,
    pub exchange_name: String,
    pub currency: String,
}

impl Quote {
    pub fn is_rising(&self) -> bool {
        self.change >= Decimal::ZERO
    }
}

/// 報價與其設定中的顯示名稱
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuote {
    pub name: String,
    pub quote: Quote,
}

/// 單一代號抓取失敗的紀錄，不會中斷整批作業
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub display_name: String,
    pub symbol: String,
    pub message: String,
}

pub type Outcome = Result<IndexQuote, FetchFailure>;

/// 一次執行的結果，依設定順序保存每個代號的 outcome
#[derive(Debug, Clone)]
pub struct RunResult {
    pub time: TimeContext,
    pub outcomes: Vec<Outcome>,
}

impl RunResult {
    pub fn new(time: TimeContext) -> Self {
        RunResult {
            time,
            outcomes: Vec::new(),
        }
    }

    pub fn successes(&self) -> impl Iterator<Item = &IndexQuote> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FetchFailure> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(Result::is_err)
    }

    /// 行程結束碼：任一代號失敗即為 1
    pub fn exit_code(&self) -> u8 {
        u8::from(self.has_failures())
    }
}
