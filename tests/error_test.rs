//! エラーケーステスト
//!
//! 読み込み失敗・選択不足が回復可能なエラーとして返ることを検証

use marmat::error::MarmatError;
use marmat_common::{Error, Lexicon, Session, Table};
use std::path::Path;
use tempfile::tempdir;

/// 存在しないメタデータファイル
#[test]
fn test_load_nonexistent_metadata() {
    let result = Table::from_path(Path::new("/nonexistent/path/12345.csv"), None);
    assert!(matches!(result, Err(Error::FileNotFound(_))));
}

/// ディレクトリを渡した場合もファイルなしとして扱う
#[test]
fn test_load_directory_as_metadata() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = Table::from_path(dir.path(), None);
    assert!(matches!(result, Err(Error::FileNotFound(_))));
}

/// 空ファイル
#[test]
fn test_load_empty_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "").unwrap();

    let result = Table::from_path(&path, None);
    assert!(matches!(result, Err(Error::InvalidTable(_))));
}

/// Term/Category列のない辞書
#[test]
fn test_lexicon_without_required_columns() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("lexicon.csv");
    std::fs::write(&path, "Word,Group\nfoo,bar\n").unwrap();

    let result = Lexicon::from_path(&path);
    assert!(matches!(result, Err(Error::MissingColumn(_))));
}

/// 読み込み失敗後もセッションは前の状態のまま
#[test]
fn test_failed_load_keeps_previous_metadata() {
    let dir = tempdir().expect("Failed to create temp dir");
    let good = dir.path().join("good.csv");
    std::fs::write(&good, "ID,Title\n1,Map\n").unwrap();

    let mut session = Session::new();
    session.load_metadata(&good, None).unwrap();
    assert!(session.load_metadata(&dir.path().join("missing.csv"), None).is_err());

    let table = session.metadata().expect("previous table should remain");
    assert_eq!(table.len(), 1);
    assert_eq!(session.metadata_path(), Some(good.as_path()));
}

/// 選択不足はエラーではなく利用者向けメッセージ
#[test]
fn test_missing_selection_is_user_facing() {
    let mut session = Session::new();
    session.set_metadata(
        Table::from_csv_str("ID,Title\n1,Map\n", marmat_common::Delimiter::Comma).unwrap(),
        None,
    );
    session.set_lexicon(Lexicon::from_csv_str("Term,Category\nmap,Geo\n").unwrap(), None);

    let err = session.analyze().unwrap_err();
    assert!(err.is_selection_problem());
    assert!(err.to_string().contains("no metadata columns selected"));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = Error::FileNotFound("meta.csv".to_string());
    let err: MarmatError = common_err.into();

    assert!(matches!(err, MarmatError::Common(_)));
    assert_eq!(format!("{}", err), "File not found: meta.csv");
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: MarmatError = io_err.into();

    assert!(matches!(err, MarmatError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// MarmatErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        MarmatError::Config("not a directory".to_string()),
        MarmatError::Selection("unknown columns: Foo".to_string()),
        MarmatError::Common(Error::MissingSelection("no categories".to_string())),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}
