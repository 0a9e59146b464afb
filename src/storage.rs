use std::{fs, path::PathBuf};

use anyhow::{anyhow, Result};

/// 永遠指向最新一份報表的檔名
pub const LATEST_FILE_NAME: &str = "latest.md";

/// 報表輸出的寫檔介面
pub trait ReportWriter: Send + Sync {
    /// Writes `document` under `file_name`, replacing any existing content.
    fn write(&self, file_name: &str, document: &str) -> Result<PathBuf>;
}

/// 寫到本機目錄，目錄不存在時自動建立
#[derive(Debug, Clone)]
pub struct FsReportWriter {
    dir: PathBuf,
}

impl FsReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FsReportWriter { dir: dir.into() }
    }
}

impl ReportWriter for FsReportWriter {
    fn write(&self, file_name: &str, document: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .map_err(|why| anyhow!("Failed to create output directory {:?}: {}", self.dir, why))?;

        let path = self.dir.join(file_name);
        fs::write(&path, document)
            .map_err(|why| anyhow!("Failed to write report {:?}: {}", path, why))?;

        Ok(path)
    }
}

/// 依日期命名的報表檔名，例︰2026-10-16.md
pub fn dated_file_name(date_key: &str) -> String {
    format!("{}.md", date_key)
}
