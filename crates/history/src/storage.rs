use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::{HistoryError, NavigationHistory};

/// 管理查詢歷史的持久化儲存。 / Provides persistence for a dictionary view's
/// lookup history.
///
/// Entries are written one per line, base64-encoded so that headwords with
/// whitespace or unusual characters survive the line-oriented format.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    history: NavigationHistory,
}

impl HistoryStore {
    /// 從指定路徑載入歷史；若檔案不存在則回傳空歷史。 / Loads the history from
    /// disk, returning an empty history when the file is missing.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                history: NavigationHistory::new(),
            });
        }

        let contents = fs::read_to_string(&path)?;
        let mut entries = Vec::new();
        for line in contents.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            entries.push(decode_entry(trimmed)?);
        }

        Ok(Self {
            path,
            history: NavigationHistory::with_entries(entries),
        })
    }

    /// 取得內部的查詢歷史。 / Returns the underlying history.
    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    /// 取得可變的查詢歷史，供純游標操作使用。 / Mutable access for cursor-only
    /// operations (`go_back`/`go_next`), which never require a write-back.
    pub fn history_mut(&mut self) -> &mut NavigationHistory {
        &mut self.history
    }

    /// 依造訪順序列舉項目。 / Iterator over recorded entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.history.iter()
    }

    /// 記錄一筆查詢並立即寫回檔案；重複項目不會觸發寫入。 / Records a lookup
    /// and persists it immediately; duplicate entries skip the write.
    pub fn append(&mut self, text: impl Into<String>) -> io::Result<bool> {
        let inserted = self.history.append(text).map_err(invalid_entry)?;
        if inserted {
            self.persist()?;
        }
        Ok(inserted)
    }

    /// 清空歷史並同步儲存。 / Clears the history and persists immediately.
    pub fn clear(&mut self) -> io::Result<()> {
        self.history.clear();
        self.persist()
    }

    fn persist(&self) -> io::Result<()> {
        let mut payload = String::new();
        for entry in self.history.iter() {
            payload.push_str(&encode_entry(entry));
            payload.push('\n');
        }
        write_atomic(&self.path, payload.as_bytes())
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn invalid_entry(err: HistoryError) -> io::Error {
    io::Error::new(ErrorKind::InvalidInput, err)
}

fn encode_entry(entry: &str) -> String {
    BASE64.encode(entry.as_bytes())
}

fn decode_entry(encoded: &str) -> io::Result<String> {
    let bytes = BASE64
        .decode(encoded.as_bytes())
        .map_err(|err| io::Error::new(ErrorKind::InvalidData, err))?;
    String::from_utf8(bytes).map_err(|err| io::Error::new(ErrorKind::InvalidData, err))
}
