use std::str::FromStr;

use rust_decimal::{prelude::FromPrimitive, Decimal};
use rust_decimal_macros::dec;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

use crate::{crawler::FetchError, declare::Quote};

const DEFAULT_MARKET_STATE: &str = "UNKNOWN";
const DEFAULT_CURRENCY: &str = "USD";

/// Yahoo Finance v8 chart API response.
///
/// 只有 chart/result/meta 的結構與 `regularMarketPrice` 是必要的，
/// 其餘欄位型別不符時一律當作沒有值。
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Option<Chart>,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: Option<Value>,
    pub description: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: Option<Meta>,
    #[serde(default, deserialize_with = "lenient")]
    pub indicators: Option<Indicators>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub symbol: Option<Value>,
    pub regular_market_price: Option<RawNumber>,
    pub previous_close: Option<RawNumber>,
    pub chart_previous_close: Option<RawNumber>,
    pub market_state: Option<Value>,
    pub exchange_name: Option<Value>,
    pub currency: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Indicators {
    #[serde(default, deserialize_with = "lenient")]
    pub quote: Option<Vec<QuoteSeries>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteSeries {
    /// 收盤序列，元素可能是 null 或非數字
    #[serde(default, deserialize_with = "lenient")]
    pub close: Option<Vec<RawNumber>>,
}

/// 欄位型別不符時回傳 None，不讓整份回應解析失敗
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// meta 內的數值欄位，站點偶爾會回傳非數字的內容
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Other(Value),
}

impl RawNumber {
    /// 欄位是否有值；0 與空字串視為沒有值
    fn is_set(&self) -> bool {
        match self {
            RawNumber::Number(n) => *n != 0.0,
            RawNumber::Other(Value::String(s)) => !s.is_empty(),
            RawNumber::Other(Value::Bool(b)) => *b,
            RawNumber::Other(Value::Null) => false,
            RawNumber::Other(_) => true,
        }
    }

    fn is_null(&self) -> bool {
        matches!(self, RawNumber::Other(Value::Null))
    }

    /// 數字字串(例︰"100")也視為數值
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawNumber::Number(n) => Decimal::from_f64(*n),
            RawNumber::Other(Value::String(s)) => Decimal::from_str(s.trim()).ok(),
            RawNumber::Other(_) => None,
        }
    }
}

/// 解析 chart API 的回應內容並正規化為 `Quote`
pub fn parse(symbol: &str, text: &str) -> Result<Quote, FetchError> {
    let response = serde_json::from_str::<ChartResponse>(text)
        .map_err(|why| FetchError::invalid_response(symbol, format!("Parse error: {}", why)))?;

    normalize(symbol, response)
}

/// 將 chart 回應轉為 `Quote`
///
/// 缺少 `chart.result` 一律視為無效回應，即使其餘欄位足以組出報價。
pub fn normalize(symbol: &str, response: ChartResponse) -> Result<Quote, FetchError> {
    let chart = response
        .chart
        .ok_or_else(|| FetchError::invalid_response(symbol, "chart is missing"))?;

    let result = match chart.result.and_then(|r| r.into_iter().next()) {
        Some(result) => result,
        None => {
            let reason = match chart.error {
                Some(e) => format!(
                    "{}: {}",
                    text_or(e.code, ""),
                    text_or(e.description, "")
                ),
                None => "chart.result is missing".to_string(),
            };
            return Err(FetchError::invalid_response(symbol, reason));
        }
    };

    let meta = result
        .meta
        .ok_or_else(|| FetchError::invalid_response(symbol, "chart.result[0].meta is missing"))?;

    let price = meta
        .regular_market_price
        .as_ref()
        .and_then(RawNumber::to_decimal)
        .ok_or_else(|| FetchError::invalid_response(symbol, "regularMarketPrice is missing"))?;

    let previous_close = resolve_previous_close(&meta, result.indicators.as_ref())
        .and_then(|n| n.to_decimal())
        .unwrap_or(Decimal::ZERO);

    let (change, change_percent) = change_of(price, previous_close);

    Ok(Quote {
        symbol: text_or(meta.symbol, symbol),
        price,
        previous_close,
        change,
        change_percent,
        market_state: text_or(meta.market_state, DEFAULT_MARKET_STATE),
        exchange_name: text_or(meta.exchange_name, ""),
        currency: text_or(meta.currency, DEFAULT_CURRENCY),
    })
}

/// 昨收價的備援順序︰previousClose → chartPreviousClose → 收盤序列往回找
pub fn resolve_previous_close(meta: &Meta, indicators: Option<&Indicators>) -> Option<RawNumber> {
    meta.previous_close
        .iter()
        .chain(meta.chart_previous_close.iter())
        .find(|n| n.is_set())
        .cloned()
        .or_else(|| {
            indicators
                .and_then(|i| i.quote.as_deref())
                .and_then(|q| q.first())
                .and_then(|q| q.close.as_deref())
                .and_then(scan_previous_close)
        })
}

/// 從倒數第二筆開始往前找第一個非 null 的收盤價
///
/// 非數字的元素同樣會結束搜尋，之後換算為 0。
pub fn scan_previous_close(closes: &[RawNumber]) -> Option<RawNumber> {
    if closes.len() < 2 {
        return None;
    }

    closes[..closes.len() - 1]
        .iter()
        .rev()
        .find(|c| !c.is_null())
        .cloned()
}

/// 漲跌 = 現價 - 昨收；漲幅 = 漲跌 / 昨收 * 100
///
/// 昨收為 0 或任一步溢位時兩者皆為 0。
fn change_of(price: Decimal, previous_close: Decimal) -> (Decimal, Decimal) {
    if previous_close.is_zero() {
        return (Decimal::ZERO, Decimal::ZERO);
    }

    price
        .checked_sub(previous_close)
        .and_then(|change| {
            change
                .checked_div(previous_close)
                .and_then(|ratio| ratio.checked_mul(dec!(100)))
                .map(|percent| (change, percent))
        })
        .unwrap_or((Decimal::ZERO, Decimal::ZERO))
}

/// 取文字欄位；null、false、0 與空字串都改用預設值，其餘型別轉為文字
fn text_or(value: Option<Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(v @ (Value::Array(_) | Value::Object(_))) => v.to_string(),
        _ => default.to_string(),
    }
}
