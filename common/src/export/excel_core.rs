//! 照合結果のExcel出力
//!
//! 1シート（Matches）に見出し＋結果行を書き、見出し行を固定する。

use crate::error::Result;
use crate::types::{MatchResult, RESULT_HEADERS};
use rust_xlsxwriter::*;
use std::path::Path;

const SHEET_NAME: &str = "Matches";

/// 列幅（文字数）: Record ID, Field Name, Term, Category, Original Contents
const COLUMN_WIDTHS: [f64; 5] = [16.0, 18.0, 18.0, 16.0, 80.0];

/// 結果をファイルに保存
pub fn save_results_xlsx(results: &[MatchResult], path: &Path) -> Result<()> {
    let mut workbook = build_workbook(results)?;
    workbook.save(path)?;
    Ok(())
}

fn build_workbook(results: &[MatchResult]) -> Result<Workbook> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));
    let text_format = Format::new()
        .set_align(FormatAlign::Top)
        .set_text_wrap();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, (header, width)) in RESULT_HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, width)?;
        worksheet.write_string_with_format(0, col, *header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (index, result) in results.iter().enumerate() {
        let row = index as u32 + 1;
        let values = [
            &result.record_id,
            &result.field_name,
            &result.term,
            &result.category,
            &result.original_contents,
        ];
        for (col, value) in values.iter().enumerate() {
            worksheet.write_string_with_format(row, col as u16, value.as_str(), &text_format)?;
        }
    }

    if !results.is_empty() {
        worksheet.autofilter(0, 0, results.len() as u32, RESULT_HEADERS.len() as u16 - 1)?;
    }

    Ok(workbook)
}
