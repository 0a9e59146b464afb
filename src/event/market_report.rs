use anyhow::Result;

use crate::{
    config::App,
    crawler::{yahoo::Yahoo, QuoteSource},
    declare::{FetchFailure, IndexQuote, Outcome, RunResult, SymbolSpec},
    logging, report,
    storage::{self, FsReportWriter, ReportWriter, LATEST_FILE_NAME},
    util::{
        datetime::{TimeContext, REPORT_TIMEZONE_LABEL},
        text::{format_change, format_number},
    },
};

/// 依序抓取每個指數的報價，產生報表並寫出
pub struct MarketReport<S, W> {
    symbols: Vec<SymbolSpec>,
    source: S,
    writer: W,
}

impl<S, W> MarketReport<S, W>
where
    S: QuoteSource,
    W: ReportWriter,
{
    pub fn new(symbols: Vec<SymbolSpec>, source: S, writer: W) -> Self {
        MarketReport {
            symbols,
            source,
            writer,
        }
    }

    pub async fn execute(&self) -> Result<RunResult> {
        self.execute_at(TimeContext::now()).await
    }

    /// 以指定的時間快照執行一次
    ///
    /// 單一代號失敗只會記錄在結果中；寫檔失敗才會回傳 Err。
    pub async fn execute_at(&self, time: TimeContext) -> Result<RunResult> {
        for line in opening_lines(&time) {
            logging::info_file_async(line);
        }

        let mut result = RunResult::new(time);

        // 逐一等待，維持紀錄與結果的順序
        for spec in &self.symbols {
            let outcome = self.fetch_one(spec).await;
            result.outcomes.push(outcome);
        }

        let document = report::render(&result);

        let dated = self
            .writer
            .write(&storage::dated_file_name(&result.time.date_key), &document)?;
        logging::info_file_async(format!("Saved daily report to: {}", dated.display()));

        self.writer.write(LATEST_FILE_NAME, &document)?;
        logging::info_file_async(format!("Updated {}", LATEST_FILE_NAME));

        logging::info_file_async("=== Fetch Complete ===".to_string());
        logging::info_file_async(format!(
            "  Successful: {}/{}",
            result.successes().count(),
            self.symbols.len()
        ));
        logging::info_file_async(format!("  Errors: {}", result.failures().count()));

        Ok(result)
    }

    /// 執行一次並回傳行程結束碼：全部成功為 0，其餘為 1
    pub async fn run(&self) -> u8 {
        self.run_at(TimeContext::now()).await
    }

    async fn run_at(&self, time: TimeContext) -> u8 {
        match self.execute_at(time).await {
            Ok(result) => result.exit_code(),
            Err(why) => {
                logging::error_file_async(format!("FATAL ERROR: {:#}", why));
                1
            }
        }
    }

    async fn fetch_one(&self, spec: &SymbolSpec) -> Outcome {
        logging::info_file_async(format!(
            "Fetching {} ({})...",
            spec.display_name, spec.symbol
        ));

        match self.source.fetch(&spec.symbol).await {
            Ok(quote) => {
                logging::info_file_async(format!(
                    "  {}: {} {}",
                    spec.display_name,
                    format_number(quote.price),
                    format_change(quote.change, quote.change_percent)
                ));

                Ok(IndexQuote {
                    name: spec.display_name.clone(),
                    quote,
                })
            }
            Err(why) => {
                logging::error_file_async(format!(
                    "  ERROR fetching {}: {}",
                    spec.display_name, why
                ));

                Err(FetchFailure {
                    display_name: spec.display_name.clone(),
                    symbol: spec.symbol.clone(),
                    message: why.to_string(),
                })
            }
        }
    }
}

/// 開始抓取前的紀錄，週末多兩行休市提示
fn opening_lines(time: &TimeContext) -> Vec<String> {
    let mut lines = vec![
        "=== Starting Market Data Fetch ===".to_string(),
        format!("{}: {}", REPORT_TIMEZONE_LABEL, time.display),
    ];

    if time.is_weekend {
        lines.push(format!(
            "Today is {} - Markets are closed for the weekend",
            time.weekday_code
        ));
        lines.push("Fetching last available data...".to_string());
    }

    lines
}

fn reporter(settings: &App) -> MarketReport<Yahoo, FsReportWriter> {
    MarketReport::new(
        settings.report.symbols.clone(),
        Yahoo::new(),
        FsReportWriter::new(&settings.report.output_dir),
    )
}

/// 以設定值組出報表流程並執行一次
pub async fn execute(settings: &App) -> Result<RunResult> {
    reporter(settings).execute().await
}

/// 執行一次並回傳行程結束碼
pub async fn run(settings: &App) -> u8 {
    reporter(settings).run().await
}
