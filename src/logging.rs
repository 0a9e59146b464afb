use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use anyhow::{anyhow, Result};
use chrono::{SecondsFormat, Utc};
use concat_string::concat_string;
use crossbeam_channel::{bounded, unbounded, Sender};
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<Logger> = OnceCell::new();

/// 等待寫檔線程完成 flush 的上限
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

enum LogMessage {
    Line(String),
    Flush(Sender<()>),
}

/// 執行紀錄檔，只會附加內容不會覆寫
pub struct Logger {
    writer: Sender<LogMessage>,
    path: PathBuf,
}

impl Logger {
    /// 開啟(或建立)紀錄檔，並啟動專責寫檔的線程
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|why| anyhow!("Failed to create log directory {:?}: {}", dir, why))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|why| anyhow!("Failed to open log file {:?}: {}", path, why))?;
        let (tx, rx) = unbounded::<LogMessage>();

        // 寫入檔案的操作使用另一個線程處理
        thread::Builder::new()
            .name("run-log".to_string())
            .spawn(move || {
                let mut writer = BufWriter::new(file);
                let mut lines = String::with_capacity(4096);

                for received in &rx {
                    match received {
                        LogMessage::Line(line) => {
                            lines.push_str(&line);
                            lines.push('\n');

                            if rx.is_empty() || lines.len() >= 4096 {
                                write_lines(&mut writer, &mut lines);
                            }
                        }
                        LogMessage::Flush(ack) => {
                            write_lines(&mut writer, &mut lines);
                            let _ = ack.send(());
                        }
                    }
                }

                write_lines(&mut writer, &mut lines);
            })?;

        Ok(Logger {
            writer: tx,
            path: path.to_path_buf(),
        })
    }

    fn write(&self, line: String) {
        if let Err(why) = self.writer.send(LogMessage::Line(line)) {
            error_console(why.to_string());
        }
    }

    /// 阻塞至目前排隊中的紀錄都已寫入檔案
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = bounded::<()>(1);
        if self.writer.send(LogMessage::Flush(ack_tx)).is_err() {
            return;
        }

        if ack_rx.recv_timeout(FLUSH_TIMEOUT).is_err() {
            error_console(format!("Failed to flush log file {:?}", self.path));
        }
    }
}

fn write_lines(writer: &mut BufWriter<File>, lines: &mut String) {
    if lines.is_empty() {
        return;
    }

    if let Err(why) = writer.write_all(lines.as_bytes()) {
        error_console(format!(
            "Failed to write to log file. because:{:#?}\r\nmsg:{}",
            why, lines
        ));
    }

    if let Err(why) = writer.flush() {
        error_console(format!("Failed to flush log file. because:{:#?}", why));
    }

    lines.clear();
}

/// 為訊息加上 ISO-8601 時間戳記
fn stamp(msg: &str) -> String {
    concat_string!(
        "[",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "] ",
        msg
    )
}

/// 設定執行紀錄檔的位置，只能設定一次
pub fn init(path: &Path) -> Result<()> {
    let logger = Logger::open(path)?;
    LOGGER
        .set(logger)
        .map_err(|_| anyhow!("Logger has already been initialized"))
}

/// 寫入紀錄檔並同步輸出到 stdout
pub fn info_file_async(log: String) {
    let line = stamp(&log);
    println!("{}", line);

    if let Some(logger) = LOGGER.get() {
        logger.write(line);
    }
}

/// 寫入紀錄檔並同步輸出到 stderr
pub fn error_file_async(log: String) {
    let line = stamp(&log);
    eprintln!("{}", line);

    if let Some(logger) = LOGGER.get() {
        logger.write(line);
    }
}

pub fn flush() {
    if let Some(logger) = LOGGER.get() {
        logger.flush();
    }
}

pub fn info_console(log: String) {
    println!("{}", stamp(&log));
}

pub fn error_console(log: String) {
    eprintln!("{}", stamp(&log));
}
