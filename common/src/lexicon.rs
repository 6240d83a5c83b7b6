//! 辞書（Lexicon）モジュール
//!
//! Term / Category 列を持つ表から語句一覧を作る。
//! 見出しは大文字小文字を区別しない。

use crate::error::{Error, Result};
use crate::table::{Delimiter, Table};
use crate::types::LexiconEntry;
use std::collections::HashSet;
use std::path::Path;

pub const TERM_COLUMN: &str = "Term";
pub const CATEGORY_COLUMN: &str = "Category";

/// 辞書
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    pub fn new(entries: Vec<LexiconEntry>) -> Self {
        Self { entries }
    }

    /// ファイルから読み込み
    pub fn from_path(path: &Path) -> Result<Self> {
        let table = Table::from_path(path, None)?;
        let lexicon = Self::from_table(&table)?;
        tracing::info!(
            path = %path.display(),
            terms = lexicon.len(),
            categories = lexicon.categories().len(),
            "lexicon loaded"
        );
        Ok(lexicon)
    }

    /// CSV文字列から読み込み
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let table = Table::from_csv_str(content, Delimiter::Comma)?;
        Self::from_table(&table)
    }

    /// 表から作成（空の語句は除外）
    pub fn from_table(table: &Table) -> Result<Self> {
        let term_col = table
            .column_index(TERM_COLUMN)
            .ok_or_else(|| Error::MissingColumn(format!("lexicon needs a '{}' column", TERM_COLUMN)))?;
        let category_col = table.column_index(CATEGORY_COLUMN).ok_or_else(|| {
            Error::MissingColumn(format!("lexicon needs a '{}' column", CATEGORY_COLUMN))
        })?;

        let mut entries = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let term = table.cell(row, term_col).trim();
            if term.is_empty() {
                continue;
            }
            let category = table.cell(row, category_col).trim();
            entries.push(LexiconEntry::new(term, category));
        }

        let dropped = table.len() - entries.len();
        if dropped > 0 {
            tracing::debug!("dropped {} lexicon rows with a blank term", dropped);
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// カテゴリ一覧（初出順、重複なし）
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// カテゴリ別の語句数（初出順）
    pub fn category_counts(&self) -> Vec<(&str, usize)> {
        self.categories()
            .into_iter()
            .map(|c| (c, self.entries.iter().filter(|e| e.category == c).count()))
            .collect()
    }

    /// 選択カテゴリに属するエントリのみ（元の順序を保つ）
    pub fn filter<S: AsRef<str>>(&self, categories: &[S]) -> Vec<&LexiconEntry> {
        let wanted: HashSet<&str> = categories.iter().map(|c| c.as_ref().trim()).collect();
        self.entries
            .iter()
            .filter(|e| wanted.contains(e.category.as_str()))
            .collect()
    }
}
