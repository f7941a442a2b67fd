use thiserror::Error;

/// 查詢歷史的錯誤情況。 / Error conditions raised by the lookup history.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("history entry cannot be empty")]
    EmptyEntry,
}

/// 游標位置：停在某個項目上，或位於末端哨兵。 / Cursor position: on a stored
/// entry, or at the end sentinel.
///
/// The newest entry is always represented by the sentinel, never by an
/// `At` position, so `At(i)` only occurs with `i <= len - 2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cursor {
    End,
    At(usize),
}

/// 管理單一辭典檢視的查詢歷史。 / Tracks the lookup history of one dictionary
/// view, driving its back/forward affordances.
///
/// Entries are unique, non-empty identifiers kept in visit order. The three
/// state flags are recomputed after every mutation or cursor move; for an
/// empty history all three are `true`, and with the cursor at the sentinel
/// `is_beginning` is `false` even when only a single entry exists.
///
/// The structure carries no internal locking and is meant to be driven from
/// one UI thread; callers needing shared access must synchronize externally.
#[derive(Clone, Debug)]
pub struct NavigationHistory {
    entries: Vec<String>,
    cursor: Cursor,
    is_beginning: bool,
    is_end: bool,
    is_empty: bool,
}

impl NavigationHistory {
    /// 建立空的歷史。 / Creates an empty history.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: Cursor::End,
            is_beginning: true,
            is_end: true,
            is_empty: true,
        }
    }

    /// 依序列化資料還原歷史；空字串與重複項目會被略過。 / Reconstructs the
    /// history from persisted entries, silently skipping empty strings and
    /// duplicates. The cursor starts at the sentinel.
    pub fn with_entries(entries: Vec<String>) -> Self {
        let mut history = Self::new();
        for entry in entries {
            if entry.is_empty() || history.entries.contains(&entry) {
                continue;
            }
            history.entries.push(entry);
        }
        history.reset_state();
        history
    }

    /// 加入一筆查詢；若已存在則不變動並回傳 `Ok(false)`。 / Records a lookup
    /// at the tail and moves the cursor to the sentinel, returning
    /// `Ok(false)` without any change when the entry already exists.
    pub fn append(&mut self, text: impl Into<String>) -> Result<bool, HistoryError> {
        let text = text.into();
        if text.is_empty() {
            return Err(HistoryError::EmptyEntry);
        }
        if self.entries.contains(&text) {
            return Ok(false);
        }
        self.entries.push(text);
        self.cursor = Cursor::End;
        self.reset_state();
        Ok(true)
    }

    /// 往較舊的項目移動一步；無法再後退時回傳 `None` 且狀態不變。 / Moves one
    /// step toward older entries and returns the entry now under the cursor,
    /// or `None` (state unchanged) when there is nothing earlier. From the
    /// sentinel the first step lands on the entry before the newest one.
    pub fn go_back(&mut self) -> Option<&str> {
        let target = match self.cursor {
            Cursor::At(0) => return None,
            Cursor::At(index) => index - 1,
            Cursor::End => {
                if self.entries.len() < 2 {
                    return None;
                }
                self.entries.len() - 2
            }
        };
        self.cursor = Cursor::At(target);
        self.reset_state();
        Some(&self.entries[target])
    }

    /// 往較新的項目移動一步；踏上哨兵時不攜帶資料。 / Moves one step toward
    /// newer entries. Landing on the sentinel yields `None` because the
    /// sentinel carries no entry of its own; already at the sentinel, the
    /// call is a no-op returning `None`.
    pub fn go_next(&mut self) -> Option<&str> {
        let index = match self.cursor {
            Cursor::End => return None,
            Cursor::At(index) => index,
        };
        if index + 1 < self.entries.len() - 1 {
            self.cursor = Cursor::At(index + 1);
            self.reset_state();
            Some(&self.entries[index + 1])
        } else {
            self.cursor = Cursor::End;
            self.reset_state();
            None
        }
    }

    /// 游標下的項目；位於哨兵時為 `None`。 / Entry under the cursor, `None`
    /// while the cursor sits at the sentinel.
    pub fn current(&self) -> Option<&str> {
        match self.cursor {
            Cursor::End => None,
            Cursor::At(index) => self.entries.get(index).map(String::as_str),
        }
    }

    /// 依造訪順序列舉項目。 / Iterates entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// 目前的項目數。 / Current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否沒有任何項目。 / Whether the history holds no entries.
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    /// 游標是否已在最舊的項目上。 / Whether the cursor sits on the oldest
    /// entry (no further `go_back` is possible).
    pub fn is_beginning(&self) -> bool {
        self.is_beginning
    }

    /// 游標是否位於末端哨兵。 / Whether the cursor sits at the end sentinel
    /// (no further `go_next` is possible).
    pub fn is_end(&self) -> bool {
        self.is_end
    }

    /// 清空所有項目並重設游標。 / Clears every entry and resets the cursor to
    /// the sentinel.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = Cursor::End;
        self.reset_state();
    }

    /// 依目前的項目與游標重新計算三個狀態旗標。 / Recomputes the three state
    /// flags from the current entries and cursor without mutating either;
    /// exposed so consumers can force a refresh after externally-visible
    /// no-op operations.
    pub fn reset_state(&mut self) {
        self.is_empty = self.entries.is_empty();
        self.is_beginning = self.is_empty || self.cursor == Cursor::At(0);
        self.is_end = self.is_empty || self.cursor == Cursor::End;
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new()
    }
}
