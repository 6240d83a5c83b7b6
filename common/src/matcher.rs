//! 語句照合モジュール
//!
//! 選択列の各セルについて、選択カテゴリの語句が含まれるかを調べ、
//! 一致1件につき1行の MatchResult を出す。
//! 走査順は 行 → 列 → 語句（辞書の並び順）。

use crate::error::{Error, Result};
use crate::lexicon::Lexicon;
use crate::selection::Selection;
use crate::table::Table;
use crate::types::{LexiconEntry, MatchMode, MatchResult, Progress};
use regex::Regex;

/// 照合用にコンパイルした語句
#[derive(Debug)]
enum Pattern {
    /// 小文字化した語句
    Literal(String),
    Word(Regex),
}

impl Pattern {
    fn compile(term: &str, mode: MatchMode) -> Result<Self> {
        match mode {
            MatchMode::Substring => Ok(Pattern::Literal(term.to_lowercase())),
            MatchMode::WholeWord => {
                let source = format!(r"(?i)\b{}\b", regex::escape(term));
                Regex::new(&source)
                    .map(Pattern::Word)
                    .map_err(|e| Error::Config(format!("cannot compile term '{}': {}", term, e)))
            }
        }
    }

    /// `lowered` は `text` を小文字化したもの
    fn is_match(&self, text: &str, lowered: &str) -> bool {
        match self {
            Pattern::Literal(term) => lowered.contains(term.as_str()),
            Pattern::Word(re) => re.is_match(text),
        }
    }
}

/// カテゴリで絞り込んだ辞書を保持する照合器
#[derive(Debug)]
pub struct Matcher<'a> {
    entries: Vec<(&'a LexiconEntry, Pattern)>,
}

impl<'a> Matcher<'a> {
    pub fn new<S: AsRef<str>>(lexicon: &'a Lexicon, categories: &[S], mode: MatchMode) -> Result<Self> {
        let entries = lexicon
            .filter(categories)
            .into_iter()
            .map(|entry| Pattern::compile(&entry.term, mode).map(|p| (entry, p)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 1セル分の一致語句（空セルは常に一致なし）
    pub fn matches_in<'s>(&'s self, text: &'s str) -> impl Iterator<Item = &'a LexiconEntry> + 's {
        let lowered = if text.is_empty() {
            String::new()
        } else {
            text.to_lowercase()
        };
        self.entries
            .iter()
            .filter(move |(_, pattern)| !text.is_empty() && pattern.is_match(text, &lowered))
            .map(|(entry, _)| *entry)
    }
}

/// 照合を実行
pub fn find_matches(table: &Table, lexicon: &Lexicon, selection: &Selection) -> Result<Vec<MatchResult>> {
    find_matches_with_progress(table, lexicon, selection, |_| {})
}

/// 照合を実行（進捗コールバック付き）
///
/// コールバックはおおむね1%ごとと、最後に `done == total` で1回呼ばれる。
/// 対象列・カテゴリが空のときは警告を出して空の結果を返す。
pub fn find_matches_with_progress<F>(
    table: &Table,
    lexicon: &Lexicon,
    selection: &Selection,
    mut on_progress: F,
) -> Result<Vec<MatchResult>>
where
    F: FnMut(Progress),
{
    if selection.columns.is_empty() || selection.categories.is_empty() {
        tracing::warn!(
            columns = selection.columns.len(),
            categories = selection.categories.len(),
            "nothing selected, skipping matching"
        );
        on_progress(Progress { done: 0, total: 0 });
        return Ok(Vec::new());
    }

    let id_col = selection.identifier_index(table)?;
    let columns = selection.column_indices(table)?;
    let matcher = Matcher::new(lexicon, &selection.categories, selection.mode)?;
    if matcher.is_empty() {
        tracing::warn!("no lexicon terms in the selected categories");
    }

    let per_row = columns.len() * matcher.len();
    let total = table.len() * per_row;
    let step = (total / 100).max(1);
    let mut done = 0;
    let mut next_report = step;

    tracing::info!(
        rows = table.len(),
        columns = columns.len(),
        terms = matcher.len(),
        mode = %selection.mode,
        "searching {} cells",
        total
    );

    let mut results = Vec::new();
    for row in 0..table.len() {
        let record_id = table.cell(row, id_col);
        for &(col, field_name) in &columns {
            let text = table.cell(row, col);
            for entry in matcher.matches_in(text) {
                results.push(MatchResult {
                    record_id: record_id.to_string(),
                    field_name: field_name.to_string(),
                    term: entry.term.clone(),
                    category: entry.category.clone(),
                    original_contents: text.to_string(),
                });
            }
        }

        done += per_row;
        if done >= next_report && done < total {
            on_progress(Progress { done, total });
            next_report = (done / step + 1) * step;
        }
    }
    on_progress(Progress { done: total, total });

    tracing::info!(matches = results.len(), "matching finished");
    Ok(results)
}
