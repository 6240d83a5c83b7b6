//! 照合結果のCSV/TSV入出力

use crate::error::{Error, Result};
use crate::table::{Delimiter, Table};
use crate::types::{MatchResult, RESULT_HEADERS};
use std::io::Write;
use std::path::Path;

/// 見出し＋結果行を書き出す（結果0件でも見出しは書く）
pub fn write_results<W: Write>(results: &[MatchResult], writer: W, delimiter: Delimiter) -> Result<()> {
    let mut w = csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .from_writer(writer);

    w.write_record(RESULT_HEADERS)?;
    for result in results {
        w.write_record([
            &result.record_id,
            &result.field_name,
            &result.term,
            &result.category,
            &result.original_contents,
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// 出力済みのCSV/TSVを読み戻す
pub fn read_results(path: &Path) -> Result<Vec<MatchResult>> {
    let table = Table::from_path(path, None)?;
    results_from_table(&table)
}

/// 5列の見出しを持つ表を結果に変換
pub fn results_from_table(table: &Table) -> Result<Vec<MatchResult>> {
    let mut cols = [0usize; 5];
    for (slot, header) in cols.iter_mut().zip(RESULT_HEADERS) {
        *slot = table
            .column_index(header)
            .ok_or_else(|| Error::MissingColumn(format!("results file needs '{}'", header)))?;
    }

    Ok((0..table.len())
        .map(|row| MatchResult {
            record_id: table.cell(row, cols[0]).to_string(),
            field_name: table.cell(row, cols[1]).to_string(),
            term: table.cell(row, cols[2]).to_string(),
            category: table.cell(row, cols[3]).to_string(),
            original_contents: table.cell(row, cols[4]).to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<MatchResult> {
        vec![
            MatchResult {
                record_id: "001".into(),
                field_name: "Title".into(),
                term: "Eskimo".into(),
                category: "Race".into(),
                original_contents: "Eskimo artifact, \"carved\"\nsecond line".into(),
            },
            MatchResult {
                record_id: "002".into(),
                field_name: "Description".into(),
                term: "squaw".into(),
                category: "Gender".into(),
                original_contents: "portrait".into(),
            },
        ]
    }

    #[test]
    fn test_write_headers_even_when_empty() {
        let mut buf = Vec::new();
        write_results(&[], &mut buf, Delimiter::Comma).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Record ID,Field Name,Term,Category,Original Contents\n"
        );
    }

    #[test]
    fn test_written_csv_parses_back() {
        let mut buf = Vec::new();
        write_results(&sample(), &mut buf, Delimiter::Comma).unwrap();
        let table = Table::from_csv_str(&String::from_utf8(buf).unwrap(), Delimiter::Comma).unwrap();
        assert_eq!(table.headers().len(), 5);
        assert_eq!(results_from_table(&table).unwrap(), sample());
    }

    #[test]
    fn test_missing_result_column() {
        let table = Table::from_csv_str("Record ID,Term\n1,x\n", Delimiter::Comma).unwrap();
        assert!(matches!(results_from_table(&table), Err(Error::MissingColumn(_))));
    }
}
