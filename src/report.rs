use std::fmt::Write;

use crate::{
    declare::RunResult,
    util::{
        datetime::REPORT_TIMEZONE_LABEL,
        text::{format_number, format_signed},
    },
};

const DATA_SOURCE: &str = "Yahoo Finance";

/// 將一次執行的結果繪製成 Markdown 報表
///
/// 成功的代號依設定順序列在表格中，失敗的代號依發生順序列在最後的 Errors 區塊。
pub fn render(result: &RunResult) -> String {
    let time = &result.time;
    let mut md = String::with_capacity(2048);

    let _ = writeln!(&mut md, "# Daily Market Report\n");
    let _ = writeln!(
        &mut md,
        "**Generated:** {} ({})  ",
        time.display, REPORT_TIMEZONE_LABEL
    );
    let _ = writeln!(&mut md, "**UTC Time:** {}\n", time.utc_iso());

    if time.is_weekend {
        let _ = writeln!(
            &mut md,
            "> ⚠️ **Weekend Notice:** Markets are closed. Data shown is from last trading day.\n"
        );
    }

    let _ = writeln!(&mut md, "## Major Indices\n");
    let _ = writeln!(&mut md, "| Index | Price | Change | % Change | Status |");
    let _ = writeln!(&mut md, "|-------|------:|-------:|---------:|--------|");

    for iq in result.successes() {
        let quote = &iq.quote;
        let status = if quote.is_rising() { "🟢" } else { "🔴" };
        let _ = writeln!(
            &mut md,
            "| {name} | {price} | {change} | {percent}% | {status} {state} |",
            name = iq.name,
            price = format_number(quote.price),
            change = format_signed(quote.change, quote.change),
            percent = format_signed(quote.change_percent, quote.change),
            status = status,
            state = quote.market_state
        );
    }

    let mut failures = result.failures().peekable();
    if failures.peek().is_some() {
        let _ = writeln!(&mut md, "\n## Errors\n");
        for failure in failures {
            let _ = writeln!(
                &mut md,
                "- **{}** ({}): {}",
                failure.display_name, failure.symbol, failure.message
            );
        }
    }

    let _ = writeln!(&mut md, "\n---\n");
    let _ = writeln!(&mut md, "*Data source: {}*  ", DATA_SOURCE);
    let _ = writeln!(
        &mut md,
        "*This report is automatically generated at 5:00 AM {} daily.*",
        REPORT_TIMEZONE_LABEL
    );

    md
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::{
        declare::{FetchFailure, IndexQuote, Quote},
        util::datetime::TimeContext,
    };

    use super::*;

    const WEEKEND_NOTICE: &str = "**Weekend Notice:**";

    fn index_quote(name: &str, symbol: &str, price: Decimal, change: Decimal, percent: Decimal) -> IndexQuote {
        IndexQuote {
            name: name.to_string(),
            quote: Quote {
                symbol: symbol.to_string(),
                price,
                previous_close: price - change,
                change,
                change_percent: percent,
                market_state: "CLOSED".to_string(),
                exchange_name: "SNP".to_string(),
                currency: "USD".to_string(),
            },
        }
    }

    fn failure(name: &str, symbol: &str, message: &str) -> FetchFailure {
        FetchFailure {
            display_name: name.to_string(),
            symbol: symbol.to_string(),
            message: message.to_string(),
        }
    }

    fn weekday() -> TimeContext {
        TimeContext::resolve(Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap())
    }

    fn weekend() -> TimeContext {
        TimeContext::resolve(Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_render_weekday_report() {
        let mut result = RunResult::new(weekday());
        result.outcomes.push(Ok(index_quote(
            "S&P 500",
            "^GSPC",
            dec!(4512.34),
            dec!(12.34),
            dec!(0.2742),
        )));
        result.outcomes.push(Ok(index_quote(
            "Dow Jones Industrial Average",
            "^DJI",
            dec!(35000.5),
            dec!(-150.25),
            dec!(-0.4275),
        )));

        let md = render(&result);
        let expected = concat!(
            "# Daily Market Report\n",
            "\n",
            "**Generated:** Friday, October 16, 2026 at 05:00:00 AM (Pacific Time)  \n",
            "**UTC Time:** 2026-10-16T12:00:00.000Z\n",
            "\n",
            "## Major Indices\n",
            "\n",
            "| Index | Price | Change | % Change | Status |\n",
            "|-------|------:|-------:|---------:|--------|\n",
            "| S&P 500 | 4,512.34 | +12.34 | +0.27% | 🟢 CLOSED |\n",
            "| Dow Jones Industrial Average | 35,000.50 | -150.25 | -0.43% | 🔴 CLOSED |\n",
            "\n",
            "---\n",
            "\n",
            "*Data source: Yahoo Finance*  \n",
            "*This report is automatically generated at 5:00 AM Pacific Time daily.*\n",
        );
        assert_eq!(md, expected);
        assert!(!md.contains(WEEKEND_NOTICE));
    }

    #[test]
    fn test_render_weekend_notice_once() {
        let mut result = RunResult::new(weekend());
        result.outcomes.push(Ok(index_quote(
            "S&P 500",
            "^GSPC",
            dec!(4500),
            dec!(0),
            dec!(0),
        )));

        let md = render(&result);
        assert_eq!(md.matches(WEEKEND_NOTICE).count(), 1);
        assert!(md.contains("| S&P 500 | 4,500.00 | +0.00 | +0.00% | 🟢 CLOSED |"));
    }

    #[test]
    fn test_render_failures_section() {
        let mut result = RunResult::new(weekday());
        result
            .outcomes
            .push(Err(failure("S&P 500", "^GSPC", "Network error for ^GSPC: timeout")));
        result.outcomes.push(Ok(index_quote(
            "Russell 2000",
            "^RUT",
            dec!(2000),
            dec!(5),
            dec!(0.25),
        )));
        result.outcomes.push(Err(failure(
            "CBOE Volatility Index (VIX)",
            "^VIX",
            "Invalid response for ^VIX: chart.result is missing",
        )));

        let md = render(&result);
        let errors = md.split("## Errors").nth(1).expect("errors section");
        let gspc = errors.find("**S&P 500** (^GSPC)").unwrap();
        let vix = errors.find("**CBOE Volatility Index (VIX)** (^VIX)").unwrap();
        assert!(gspc < vix);
        assert!(md.contains(
            "- **CBOE Volatility Index (VIX)** (^VIX): Invalid response for ^VIX: chart.result is missing"
        ));
        assert!(!md.contains("| S&P 500 |"));
        assert!(md.contains("| Russell 2000 | 2,000.00 | +5.00 | +0.25% | 🟢 CLOSED |"));
    }

    #[test]
    fn test_render_without_failures_has_no_errors_section() {
        let result = RunResult::new(weekday());
        assert!(!render(&result).contains("## Errors"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut result = RunResult::new(weekend());
        result
            .outcomes
            .push(Err(failure("S&P 500", "^GSPC", "boom")));

        assert_eq!(render(&result), render(&result));
    }
}
