use std::{env, path::PathBuf};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{declare::SymbolSpec, logging};

const CONFIG_PATH: &str = "app.json";

const DEFAULT_OUTPUT_DIR: &str = "workspace/market-data";
const DEFAULT_LOG_FILE: &str = "fetch.log";
/// 每日太平洋時間 05:00
const DEFAULT_CRON: &str = "0 0 5 * * *";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub report: Report,
    #[serde(default)]
    pub schedule: Schedule,
}

const MARKET_REPORT_OUTPUT_DIR: &str = "MARKET_REPORT_OUTPUT_DIR";
const MARKET_REPORT_LOG_FILE: &str = "MARKET_REPORT_LOG_FILE";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Report {
    /// 報表輸出目錄，不存在時自動建立
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// 執行紀錄檔
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "SymbolSpec::major_indices")]
    pub symbols: Vec<SymbolSpec>,
}

impl Default for Report {
    fn default() -> Self {
        Report {
            output_dir: default_output_dir(),
            log_file: default_log_file(),
            symbols: SymbolSpec::major_indices(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_log_file() -> PathBuf {
    default_output_dir().join(DEFAULT_LOG_FILE)
}

const MARKET_REPORT_SCHEDULE_ENABLED: &str = "MARKET_REPORT_SCHEDULE_ENABLED";
const MARKET_REPORT_SCHEDULE_CRON: &str = "MARKET_REPORT_SCHEDULE_CRON";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Schedule {
    /// 關閉時只執行一次並以結束碼回報結果
    #[serde(default)]
    pub enabled: bool,
    /// 以報表時區解讀的 cron 表示式(含秒)
    #[serde(default = "default_cron")]
    pub cron: String,
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule {
            enabled: false,
            cron: default_cron(),
        }
    }
}

fn default_cron() -> String {
    DEFAULT_CRON.to_string()
}

pub static SETTINGS: Lazy<App> = Lazy::new(|| {
    App::get().unwrap_or_else(|why| {
        logging::error_console(format!(
            "I can't read the config context because {:?}",
            why
        ));
        App::default().override_with_env()
    })
});

impl App {
    fn get() -> Result<Self> {
        let config_path = config_path();
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::default().override_with_env())
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(dir) = env::var(MARKET_REPORT_OUTPUT_DIR) {
            self.report.output_dir = PathBuf::from(dir);
        }

        if let Ok(file) = env::var(MARKET_REPORT_LOG_FILE) {
            self.report.log_file = PathBuf::from(file);
        }

        if let Ok(enabled) = env::var(MARKET_REPORT_SCHEDULE_ENABLED) {
            match parse_flag(&enabled) {
                Some(flag) => self.schedule.enabled = flag,
                None => logging::error_console(format!(
                    "Ignoring {}={:?}, expected true/false, 1/0, yes/no or on/off",
                    MARKET_REPORT_SCHEDULE_ENABLED, enabled
                )),
            }
        }

        if let Ok(cron) = env::var(MARKET_REPORT_SCHEDULE_CRON) {
            self.schedule.cron = cron;
        }

        self
    }
}

/// 解析開關型的環境變數，無法辨識時回傳 None
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}
