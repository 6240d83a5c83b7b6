//! 照合で使う型定義
//!
//! - LexiconEntry: 辞書の1語（語句とカテゴリ）
//! - MatchResult: 照合結果の1行
//! - MatchMode: 部分一致 / 単語一致
//! - Progress: 照合の進捗

use serde::{Deserialize, Serialize};

/// 出力ファイルのデフォルト名
pub const DEFAULT_OUTPUT_FILE: &str = "MaRMAT_output.csv";

/// 出力CSVの列見出し（この順で書き出す）
pub const RESULT_HEADERS: [&str; 5] = [
    "Record ID",
    "Field Name",
    "Term",
    "Category",
    "Original Contents",
];

/// 辞書エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub term: String,
    pub category: String,
}

impl LexiconEntry {
    pub fn new(term: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            category: category.into(),
        }
    }
}

/// 照合結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "Record ID")]
    pub record_id: String,

    #[serde(rename = "Field Name")]
    pub field_name: String,

    #[serde(rename = "Term")]
    pub term: String,

    #[serde(rename = "Category")]
    pub category: String,

    /// セルの元テキスト（加工しない）
    #[serde(rename = "Original Contents")]
    pub original_contents: String,
}

/// 照合方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// 大文字小文字を無視した部分一致
    #[default]
    Substring,
    /// 単語境界つき一致（`\bterm\b`）
    WholeWord,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Substring => write!(f, "substring"),
            MatchMode::WholeWord => write!(f, "whole-word"),
        }
    }
}

/// 照合の進捗（セル×語句の検査回数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    /// 0-100 の進捗率
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.done.min(self.total) * 100) / self.total) as u8
    }
}
