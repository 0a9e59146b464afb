use std::process::ExitCode;

#[cfg(all(target_os = "linux", target_env = "musl"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod config;
pub mod crawler;
pub mod declare;
pub mod event;
pub mod logging;
pub mod report;
pub mod scheduler;
pub mod storage;
pub mod util;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let settings: &'static config::App = &config::SETTINGS;

    if let Err(why) = logging::init(&settings.report.log_file) {
        logging::error_console(format!("FATAL ERROR: {:#}", why));
        return ExitCode::FAILURE;
    }

    if settings.schedule.enabled {
        let code = match scheduler::start(settings).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(why) => {
                logging::error_file_async(format!("FATAL ERROR: {:#}", why));
                ExitCode::FAILURE
            }
        };
        logging::flush();
        return code;
    }

    let code = event::market_report::run(settings).await;
    logging::flush();

    ExitCode::from(code)
}
