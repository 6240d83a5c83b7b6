//! 照合結果の出力（CLIとデスクトップで共用）

pub mod csv_core;

#[cfg(feature = "excel")]
pub mod excel_core;

use crate::error::Result;
use crate::table::Delimiter;
use crate::types::{MatchResult, DEFAULT_OUTPUT_FILE};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub use csv_core::{read_results, results_from_table};

/// 出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultFormat {
    Csv,
    Tsv,
    #[cfg(feature = "excel")]
    Xlsx,
}

impl ResultFormat {
    /// 拡張子から判定（.csv 以外の区切りテキストはTSVで書く）
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("csv") => ResultFormat::Csv,
            #[cfg(feature = "excel")]
            Some("xlsx") => ResultFormat::Xlsx,
            _ => ResultFormat::Tsv,
        }
    }
}

impl std::fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultFormat::Csv => write!(f, "CSV"),
            ResultFormat::Tsv => write!(f, "TSV"),
            #[cfg(feature = "excel")]
            ResultFormat::Xlsx => write!(f, "Excel"),
        }
    }
}

/// ディレクトリならデフォルトファイル名を付ける
pub fn resolve_output_path(output: &Path) -> PathBuf {
    if output.is_dir() || output.as_os_str().is_empty() {
        output.join(DEFAULT_OUTPUT_FILE)
    } else {
        output.to_path_buf()
    }
}

/// 結果をファイルに保存し、使った形式を返す
pub fn save_results(results: &[MatchResult], path: &Path) -> Result<ResultFormat> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let format = ResultFormat::from_path(path);
    match format {
        ResultFormat::Csv | ResultFormat::Tsv => {
            let delimiter = if format == ResultFormat::Csv {
                Delimiter::Comma
            } else {
                Delimiter::Tab
            };
            let writer = BufWriter::new(File::create(path)?);
            csv_core::write_results(results, writer, delimiter)?;
        }
        #[cfg(feature = "excel")]
        ResultFormat::Xlsx => excel_core::save_results_xlsx(results, path)?,
    }

    tracing::info!(path = %path.display(), rows = results.len(), %format, "results saved");
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ResultFormat::from_path(Path::new("out.csv")), ResultFormat::Csv);
        assert_eq!(ResultFormat::from_path(Path::new("out.CSV")), ResultFormat::Csv);
        assert_eq!(ResultFormat::from_path(Path::new("out.tsv")), ResultFormat::Tsv);
        assert_eq!(ResultFormat::from_path(Path::new("out.txt")), ResultFormat::Tsv);
    }

    #[cfg(feature = "excel")]
    #[test]
    fn test_format_xlsx() {
        assert_eq!(ResultFormat::from_path(Path::new("out.xlsx")), ResultFormat::Xlsx);
    }

    #[test]
    fn test_resolve_output_path() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_output_path(dir.path()),
            dir.path().join("MaRMAT_output.csv")
        );
        let file = dir.path().join("mine.tsv");
        assert_eq!(resolve_output_path(&file), file);
    }
}
