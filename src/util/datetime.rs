use chrono::{DateTime, Datelike, SecondsFormat, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

/// 報表使用的固定時區
pub const REPORT_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

/// 報表上標示的時區名稱
pub const REPORT_TIMEZONE_LABEL: &str = "Pacific Time";

/// A trait representing the weekend concept.
pub trait Weekend {
    /// Returns `true` if the date is on a Saturday or Sunday, and `false` otherwise.
    fn is_weekend(&self) -> bool;
}

impl<T: TimeZone> Weekend for DateTime<T> {
    fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// 單次執行的時間快照，以固定時區表示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeContext {
    /// e.g. "Friday, October 16, 2026 at 05:00:00 AM"
    pub display: String,
    /// "Mon" ~ "Sun"
    pub weekday_code: String,
    /// YYYY-MM-DD，作為報表檔名
    pub date_key: String,
    pub is_weekend: bool,
    pub generated_at: DateTime<Utc>,
}

impl TimeContext {
    /// 以系統時鐘取得目前的時間快照
    pub fn now() -> Self {
        Self::resolve(Utc::now())
    }

    /// Resolves the given instant into the report timezone.
    pub fn resolve(instant: DateTime<Utc>) -> Self {
        let local = instant.with_timezone(&REPORT_TIMEZONE);

        TimeContext {
            display: local.format("%A, %B %-d, %Y at %I:%M:%S %p").to_string(),
            weekday_code: local.format("%a").to_string(),
            date_key: local.format("%Y-%m-%d").to_string(),
            is_weekend: local.is_weekend(),
            generated_at: instant,
        }
    }

    /// ISO-8601 UTC 時間，含毫秒
    pub fn utc_iso(&self) -> String {
        self.generated_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
