//! 表データ読み込みモジュール
//!
//! メタデータ・辞書ファイル（CSV/TSV/Excel）を丸ごとメモリに読み込む。
//! 列数が多すぎる行は警告を出して読み飛ばし、足りない行は空セルで補う。

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::Path;

/// プレビュー表示する最大行数
pub const PREVIEW_ROWS: usize = 1000;

/// 区切り文字
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Semicolon,
    Space,
    Pipe,
}

impl Delimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Semicolon => b';',
            Delimiter::Space => b' ',
            Delimiter::Pipe => b'|',
        }
    }

    /// 拡張子から推定（.tsv/.tab はタブ、それ以外はカンマ）
    pub fn from_path(path: &Path) -> Self {
        match extension_of(path).as_deref() {
            Some("tsv") | Some("tab") => Delimiter::Tab,
            _ => Delimiter::Comma,
        }
    }
}

impl std::str::FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "comma" | "," | "csv" => Ok(Delimiter::Comma),
            "tab" | "\\t" | "\t" | "tsv" => Ok(Delimiter::Tab),
            "semicolon" | ";" => Ok(Delimiter::Semicolon),
            "space" | " " => Ok(Delimiter::Space),
            "pipe" | "|" => Ok(Delimiter::Pipe),
            _ => Err(format!(
                "Unknown delimiter: {}. Use comma, tab, semicolon, space, or pipe",
                s
            )),
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Tab => write!(f, "tab"),
            Delimiter::Semicolon => write!(f, "semicolon"),
            Delimiter::Space => write!(f, "space"),
            Delimiter::Pipe => write!(f, "pipe"),
        }
    }
}

/// 見出し行＋データ行の表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    skipped_rows: usize,
}

impl Table {
    /// 見出しと行から作成（見出しは正規化、行は見出し数に揃える）
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(Error::InvalidTable("no header row".into()));
        }
        let headers = normalize_headers(headers);
        let width = headers.len();

        let mut table = Self {
            headers,
            rows: Vec::with_capacity(rows.len()),
            skipped_rows: 0,
        };
        for (index, row) in rows.into_iter().enumerate() {
            match fit_row(row, width) {
                Some(row) => table.rows.push(row),
                None => {
                    table.skipped_rows += 1;
                    tracing::warn!("Skipping row {}: more fields than headers", index + 2);
                }
            }
        }
        Ok(table)
    }

    /// ファイルから読み込み（区切り文字省略時は拡張子から推定）
    pub fn from_path(path: &Path, delimiter: Option<Delimiter>) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }

        #[cfg(feature = "excel")]
        if is_workbook(path) {
            return Self::from_workbook(path);
        }

        let bytes = std::fs::read(path)?;
        let content = decode_text(bytes);
        let delimiter = delimiter.unwrap_or_else(|| Delimiter::from_path(path));
        let table = Self::from_csv_str(&content, delimiter)?;

        tracing::info!(
            path = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            skipped = table.skipped_rows,
            "table loaded"
        );
        Ok(table)
    }

    /// CSV文字列から読み込み
    pub fn from_csv_str(content: &str, delimiter: Delimiter) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter.as_byte())
            .flexible(true)
            .has_headers(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(Error::InvalidTable("no header row".into()));
        }

        let mut rows = Vec::new();
        let mut broken = 0;
        for (index, record) in reader.records().enumerate() {
            match record {
                Ok(record) => rows.push(record.iter().map(|s| s.to_string()).collect()),
                Err(e) => {
                    broken += 1;
                    tracing::warn!("Skipping malformed row {}: {}", index + 2, e);
                }
            }
        }

        let mut table = Self::new(headers, rows)?;
        table.skipped_rows += broken;
        Ok(table)
    }

    /// Excel/ODSの先頭シートから読み込み
    #[cfg(feature = "excel")]
    fn from_workbook(path: &Path) -> Result<Self> {
        use calamine::{open_workbook_auto, Reader};

        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::InvalidTable(format!("{} has no worksheet", path.display())))??;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());
        let headers = rows
            .next()
            .ok_or_else(|| Error::InvalidTable(format!("{} is empty", path.display())))?;
        let table = Self::new(headers, rows.collect())?;

        tracing::info!(
            path = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            "workbook loaded"
        );
        Ok(table)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 読み飛ばした不正行の数
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// 列番号を取得（完全一致を優先し、なければ大文字小文字を無視）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers
            .iter()
            .position(|h| h == name)
            .or_else(|| {
                let lower = name.to_lowercase();
                self.headers.iter().position(|h| h.to_lowercase() == lower)
            })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// セル値（範囲外は空文字）
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// 先頭n行
    pub fn preview(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..self.rows.len().min(n)]
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

#[cfg(feature = "excel")]
fn is_workbook(path: &Path) -> bool {
    matches!(
        extension_of(path).as_deref(),
        Some("xlsx") | Some("xlsm") | Some("xls") | Some("ods")
    )
}

/// UTF-8として解釈し、失敗したらLatin-1として読む
pub fn decode_text(bytes: Vec<u8>) -> String {
    let mut text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("input is not UTF-8, decoding as Latin-1");
            e.into_bytes().iter().map(|&b| b as char).collect()
        }
    };
    if text.starts_with('\u{feff}') {
        text.remove(0);
    }
    text
}

/// 見出しの前後空白を除き、空欄・重複に名前を付ける
fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(index, header)| {
            let base = match header.trim() {
                "" => format!("Unnamed: {}", index),
                trimmed => trimmed.to_string(),
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            name
        })
        .collect()
}

/// 行を見出し数に揃える（末尾の空フィールドは切り捨て、実データがはみ出す行は None）
fn fit_row(mut row: Vec<String>, width: usize) -> Option<Vec<String>> {
    if row.len() > width {
        if row[width..].iter().any(|cell| !cell.trim().is_empty()) {
            return None;
        }
        row.truncate(width);
    }
    row.resize(width, String::new());
    Some(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_csv() {
        let table = Table::from_csv_str("ID,Title\n001,Eskimo artifact\n002,Map\n", Delimiter::Comma)
            .unwrap();
        assert_eq!(table.headers(), &["ID".to_string(), "Title".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 1), "Eskimo artifact");
        assert_eq!(table.skipped_rows(), 0);
    }

    #[test]
    fn test_parse_tab_delimited() {
        let table = Table::from_csv_str("ID\tTitle\n1\tA, B and C\n", Delimiter::Tab).unwrap();
        assert_eq!(table.cell(0, 1), "A, B and C");
    }

    #[test]
    fn test_parse_space_delimited() {
        let table =
            Table::from_csv_str("ID Title\n1 \"Eskimo artifact\"\n", Delimiter::Space).unwrap();
        assert_eq!(table.headers().len(), 2);
        assert_eq!(table.cell(0, 1), "Eskimo artifact");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = Table::from_csv_str("a,b,c\n1\n", Delimiter::Comma).unwrap();
        assert_eq!(table.rows()[0], vec!["1", "", ""]);
    }

    #[test]
    fn test_long_rows_are_skipped() {
        let table = Table::from_csv_str("a,b\n1,2,3\n4,5\n", Delimiter::Comma).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, 0), "4");
        assert_eq!(table.skipped_rows(), 1);
    }

    #[test]
    fn test_trailing_empty_fields_are_kept_row() {
        let table = Table::from_csv_str("a,b\n1,2,,\n", Delimiter::Comma).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0], vec!["1", "2"]);
    }

    #[test]
    fn test_headers_are_normalized() {
        let table = Table::from_csv_str(" ID ,Title,,Title\n1,2,3,4\n", Delimiter::Comma).unwrap();
        assert_eq!(
            table.headers(),
            &[
                "ID".to_string(),
                "Title".to_string(),
                "Unnamed: 2".to_string(),
                "Title.1".to_string()
            ]
        );
    }

    #[test]
    fn test_cell_text_is_not_trimmed() {
        let table = Table::from_csv_str("a\n\"  padded  \"\n", Delimiter::Comma).unwrap();
        assert_eq!(table.cell(0, 0), "  padded  ");
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let result = Table::from_csv_str("", Delimiter::Comma);
        assert!(matches!(result, Err(Error::InvalidTable(_))));
    }

    #[test]
    fn test_column_index_case_insensitive() {
        let table = Table::from_csv_str("Term,Category\n", Delimiter::Comma).unwrap();
        assert_eq!(table.column_index("Term"), Some(0));
        assert_eq!(table.column_index("category"), Some(1));
        assert_eq!(table.column_index("missing"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_preview_limits_rows() {
        let content: String = std::iter::once("n\n".to_string())
            .chain((0..20).map(|i| format!("{}\n", i)))
            .collect();
        let table = Table::from_csv_str(&content, Delimiter::Comma).unwrap();
        assert_eq!(table.preview(5).len(), 5);
        assert_eq!(table.preview(100).len(), 20);
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "café" をLatin-1で
        let text = decode_text(vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(text, "café");
    }

    #[test]
    fn test_decode_strips_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"ID\n");
        assert_eq!(decode_text(bytes), "ID\n");
    }

    #[test]
    fn test_delimiter_from_path() {
        assert_eq!(Delimiter::from_path(Path::new("a.tsv")), Delimiter::Tab);
        assert_eq!(Delimiter::from_path(Path::new("a.TSV")), Delimiter::Tab);
        assert_eq!(Delimiter::from_path(Path::new("a.csv")), Delimiter::Comma);
        assert_eq!(Delimiter::from_path(Path::new("a")), Delimiter::Comma);
    }

    #[test]
    fn test_delimiter_from_str() {
        assert_eq!("tab".parse::<Delimiter>(), Ok(Delimiter::Tab));
        assert_eq!(";".parse::<Delimiter>(), Ok(Delimiter::Semicolon));
        assert_eq!("Space".parse::<Delimiter>(), Ok(Delimiter::Space));
        assert!("space".parse::<Delimiter>().is_err());
    }
}
