use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
    config::App,
    event::market_report,
    logging,
    util::datetime::REPORT_TIMEZONE,
};

/// 啟動排程，收到 Ctrl-C 後停止
///
/// 排程模式下每次執行的失敗只寫入紀錄，不影響行程的結束碼。
pub async fn start(settings: &'static App) -> Result<()> {
    let mut sched = JobScheduler::new().await?;
    sched.add(create_job(settings)?).await?;
    sched.start().await?;

    logging::info_file_async(format!(
        "Scheduler started, cron: {} ({})",
        settings.schedule.cron, REPORT_TIMEZONE
    ));
    logging::flush();

    tokio::signal::ctrl_c().await?;

    logging::info_file_async("Scheduler stopping".to_string());
    sched.shutdown().await?;

    Ok(())
}

fn create_job(settings: &'static App) -> Result<Job> {
    //                 sec  min   hour   day of month   month   day of week
    // 預設 "0 0 5 * * *"，以報表時區解讀
    Ok(Job::new_async_tz(
        settings.schedule.cron.as_str(),
        REPORT_TIMEZONE,
        move |_uuid, _l| {
            Box::pin(async move {
                let code = market_report::run(settings).await;
                if code != 0 {
                    logging::error_file_async(format!(
                        "Scheduled report finished with exit status {}",
                        code
                    ));
                }
                logging::flush();
            })
        },
    )?)
}

#[cfg(test)]
mod tests {
    use once_cell::sync::Lazy;

    use super::*;

    static SETTINGS: Lazy<App> = Lazy::new(App::default);

    #[tokio::test]
    async fn test_create_job_with_default_cron() {
        assert!(create_job(&SETTINGS).is_ok());
    }

    #[tokio::test]
    async fn test_create_job_rejects_bad_cron() {
        static BAD: Lazy<App> = Lazy::new(|| {
            let mut app = App::default();
            app.schedule.cron = "not a cron".to_string();
            app
        });

        assert!(create_job(&BAD).is_err());
    }
}
