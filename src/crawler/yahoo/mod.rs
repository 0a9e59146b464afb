//! # Yahoo 財經採集模組
//!
//! 從 Yahoo 財經的 v8 chart API 取得指數報價。
//!
//! ## 支援的功能
//!
//! - **報價 (`price`)**：對單一代號送出一次 GET，取回最近 5 個交易日的日線資料。
//! - **回應解析 (`chart`)**：將 chart 回應正規化為 `Quote`，處理昨收價缺漏的備援順序。
//!
//! ## 站點資訊
//!
//! - 來源域名：`query1.finance.yahoo.com`
//! - 抓取技術：HTTP GET 搭配 JSON 解析。

/// chart 回應的資料結構與正規化
pub mod chart;
/// 報價採集子模組
pub mod price;

/// Yahoo 財經 API 的主機域名
const HOST: &str = "query1.finance.yahoo.com";

/// Yahoo 財經採集器
///
/// 此結構體作為 `QuoteSource` Trait 的實作載體。
#[derive(Debug, Default, Clone, Copy)]
pub struct Yahoo {}

impl Yahoo {
    pub fn new() -> Self {
        Yahoo {}
    }
}
