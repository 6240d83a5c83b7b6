//! エラー型定義
//!
//! ここで定義するエラーはすべて回復可能で、UI側はメッセージを表示して
//! 現在の画面に留まる。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    #[error("Excel error: {0}")]
    Excel(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid table: {0}")]
    InvalidTable(String),

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Selection incomplete: {0}")]
    MissingSelection(String),

    #[error("Cannot {event} from the {screen} screen")]
    InvalidTransition { screen: String, event: String },

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// 選択不足（ユーザーの操作で直せるもの）かどうか
    pub fn is_selection_problem(&self) -> bool {
        matches!(self, Error::MissingSelection(_) | Error::MissingColumn(_))
    }
}

#[cfg(feature = "excel")]
impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        Error::Excel(e.to_string())
    }
}

#[cfg(feature = "excel")]
impl From<calamine::Error> for Error {
    fn from(e: calamine::Error) -> Self {
        Error::Excel(e.to_string())
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_missing_selection() {
        let error = Error::MissingSelection("no categories selected".to_string());
        assert_eq!(
            format!("{}", error),
            "Selection incomplete: no categories selected"
        );
    }

    #[test]
    fn test_error_display_transition() {
        let error = Error::InvalidTransition {
            screen: "Main".to_string(),
            event: "Finish".to_string(),
        };
        assert_eq!(format!("{}", error), "Cannot Finish from the Main screen");
    }

    #[test]
    fn test_error_from_csv() {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("a,b\nc\n".as_bytes());
        let err = reader
            .records()
            .find_map(|r| r.err())
            .expect("uneven rows should fail in strict mode");
        let error: Error = err.into();
        assert!(matches!(error, Error::Csv(_)));
    }

    #[test]
    fn test_selection_problem() {
        assert!(Error::MissingSelection("x".into()).is_selection_problem());
        assert!(Error::MissingColumn("Title".into()).is_selection_problem());
        assert!(!Error::FileNotFound("a.csv".into()).is_selection_problem());
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Config("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Config"));
        assert!(debug.contains("テスト"));
    }
}
