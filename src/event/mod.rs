/// 每日指數報表
pub mod market_report;
