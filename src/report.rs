//! 実行結果の表示

use marmat_common::{Summary, Table};

/// 集計を表示用の行に整形
pub fn summary_lines(summary: &Summary) -> Vec<String> {
    let mut lines = vec![format!(
        "{} matches in {} records",
        summary.matches, summary.records
    )];
    if !summary.by_category.is_empty() {
        lines.push("  by category:".to_string());
        lines.extend(
            summary
                .by_category
                .iter()
                .map(|(name, n)| format!("    {:<24} {:>6}", display_name(name), n)),
        );
    }
    if !summary.by_field.is_empty() {
        lines.push("  by field:".to_string());
        lines.extend(
            summary
                .by_field
                .iter()
                .map(|(name, n)| format!("    {:<24} {:>6}", display_name(name), n)),
        );
    }
    lines
}

/// 列一覧とプレビューを整形（セルは幅に合わせて切り詰め）
pub fn preview_lines(table: &Table, rows: usize, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = table
        .headers()
        .iter()
        .enumerate()
        .map(|(i, h)| format!("  {:>3}  {}", i + 1, h))
        .collect();

    let preview = table.preview(rows);
    if !preview.is_empty() {
        lines.push(String::new());
        lines.push(table.headers().iter().map(|h| clip(h, width)).collect::<Vec<_>>().join(" | "));
        for row in preview {
            lines.push(row.iter().map(|c| clip(c, width)).collect::<Vec<_>>().join(" | "));
        }
    }
    lines
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "(blank)"
    } else {
        name
    }
}

fn clip(text: &str, width: usize) -> String {
    let flat: String = text.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();
    if flat.chars().count() <= width {
        format!("{:<width$}", flat, width = width)
    } else {
        let cut: String = flat.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marmat_common::Delimiter;

    #[test]
    fn test_summary_lines() {
        let summary = Summary {
            matches: 3,
            records: 2,
            by_category: vec![("Race".into(), 2), ("".into(), 1)],
            by_field: vec![("Title".into(), 3)],
        };
        let lines = summary_lines(&summary);
        assert_eq!(lines[0], "3 matches in 2 records");
        assert!(lines.iter().any(|l| l.contains("(blank)")));
        assert!(lines.iter().any(|l| l.contains("Title")));
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("abc", 5), "abc  ");
        assert_eq!(clip("abcdefgh", 5), "abcd…");
        assert_eq!(clip("a\nb", 3), "a b");
    }

    #[test]
    fn test_preview_lines() {
        let table = Table::from_csv_str("ID,Title\n1,Eskimo artifact\n2,Map\n", Delimiter::Comma).unwrap();
        let lines = preview_lines(&table, 1, 6);
        assert_eq!(lines[0], "    1  ID");
        assert_eq!(lines[1], "    2  Title");
        assert_eq!(lines.len(), 2 + 1 + 1 + 1);
        assert!(lines[4].starts_with("1     | Eskim…"));
    }
}
