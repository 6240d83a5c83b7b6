//! 照合対象の選択（ID列・対象列・カテゴリ）

use crate::error::{Error, Result};
use crate::lexicon::Lexicon;
use crate::table::Table;
use crate::types::MatchMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// ID列（None なら先頭列）
    pub identifier: Option<String>,
    /// 照合する列
    pub columns: Vec<String>,
    /// 照合するカテゴリ
    pub categories: Vec<String>,
    #[serde(default)]
    pub mode: MatchMode,
}

impl Selection {
    /// 前後空白を除いて設定（重複は先勝ち）
    pub fn set_columns<S: AsRef<str>>(&mut self, columns: &[S]) {
        self.columns.clear();
        for column in columns.iter().map(|c| c.as_ref().trim()) {
            if !self.has_column(column) {
                self.columns.push(column.to_string());
            }
        }
    }

    /// ID列を設定し、対象列からは外す
    pub fn set_identifier(&mut self, identifier: &str) {
        self.columns.retain(|c| c != identifier);
        self.identifier = Some(identifier.to_string());
    }

    pub fn set_categories<S: AsRef<str>>(&mut self, categories: &[S]) {
        self.categories = categories.iter().map(|c| c.as_ref().trim().to_string()).collect();
    }

    pub fn toggle_column(&mut self, column: &str) {
        toggle(&mut self.columns, column);
    }

    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.categories, category);
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// ID列の列番号を解決
    pub fn identifier_index(&self, table: &Table) -> Result<usize> {
        match &self.identifier {
            Some(name) => table
                .column_index(name)
                .ok_or_else(|| Error::MissingColumn(format!("identifier column '{}'", name))),
            None if table.headers().is_empty() => {
                Err(Error::MissingSelection("no identifier column selected".into()))
            }
            None => Ok(0),
        }
    }

    /// 対象列の列番号と表側の列名を解決（選択順、同じ列は1回だけ）
    pub fn column_indices<'t>(&self, table: &'t Table) -> Result<Vec<(usize, &'t str)>> {
        let mut resolved: Vec<(usize, &'t str)> = Vec::new();
        for name in &self.columns {
            let index = table
                .column_index(name)
                .ok_or_else(|| Error::MissingColumn(format!("metadata column '{}'", name)))?;
            if !resolved.iter().any(|(i, _)| *i == index) {
                resolved.push((index, table.headers()[index].as_str()));
            }
        }
        Ok(resolved)
    }

    /// 実行前チェック
    pub fn validate(&self, table: &Table, lexicon: &Lexicon) -> Result<()> {
        self.identifier_index(table)?;
        if self.columns.is_empty() {
            return Err(Error::MissingSelection("no metadata columns selected".into()));
        }
        if self.categories.is_empty() {
            return Err(Error::MissingSelection("no lexicon categories selected".into()));
        }
        self.column_indices(table)?;
        if lexicon.filter(&self.categories).is_empty() {
            return Err(Error::MissingSelection(
                "the selected categories contain no lexicon terms".into(),
            ));
        }
        Ok(())
    }
}

fn toggle(list: &mut Vec<String>, value: &str) {
    if let Some(pos) = list.iter().position(|v| v == value) {
        list.remove(pos);
    } else {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Delimiter;

    fn fixtures() -> (Table, Lexicon) {
        let table = Table::from_csv_str("ID,Title,Notes\n001,Eskimo artifact,\n", Delimiter::Comma)
            .unwrap();
        let lexicon = Lexicon::from_csv_str("Term,Category\nEskimo,Race\n").unwrap();
        (table, lexicon)
    }

    #[test]
    fn test_identifier_defaults_to_first_column() {
        let (table, _) = fixtures();
        assert_eq!(Selection::default().identifier_index(&table).unwrap(), 0);
    }

    #[test]
    fn test_unknown_identifier() {
        let (table, _) = fixtures();
        let selection = Selection {
            identifier: Some("Record".into()),
            ..Default::default()
        };
        assert!(matches!(
            selection.identifier_index(&table),
            Err(Error::MissingColumn(_))
        ));
    }

    #[test]
    fn test_validate_reports_missing_pieces() {
        let (table, lexicon) = fixtures();
        let mut selection = Selection::default();
        let err = selection.validate(&table, &lexicon).unwrap_err();
        assert!(err.to_string().contains("columns"));

        selection.set_columns(&[" Title "]);
        let err = selection.validate(&table, &lexicon).unwrap_err();
        assert!(err.to_string().contains("categories"));

        selection.set_categories(&["Gender"]);
        let err = selection.validate(&table, &lexicon).unwrap_err();
        assert!(err.to_string().contains("no lexicon terms"));

        selection.set_categories(&["Race"]);
        assert!(selection.validate(&table, &lexicon).is_ok());
    }

    #[test]
    fn test_validate_unknown_column() {
        let (table, lexicon) = fixtures();
        let mut selection = Selection::default();
        selection.set_columns(&["Subject"]);
        selection.set_categories(&["Race"]);
        assert!(matches!(
            selection.validate(&table, &lexicon),
            Err(Error::MissingColumn(_))
        ));
    }

    #[test]
    fn test_toggle() {
        let mut selection = Selection::default();
        selection.toggle_column("Title");
        selection.toggle_column("Notes");
        assert!(selection.has_column("Title"));
        selection.toggle_column("Title");
        assert!(!selection.has_column("Title"));
        assert_eq!(selection.columns, vec!["Notes"]);

        selection.toggle_category("Race");
        assert!(selection.has_category("Race"));
    }

    #[test]
    fn test_column_indices_use_table_names_once() {
        let (table, _) = fixtures();
        let mut selection = Selection::default();
        selection.columns = vec!["title".into(), "Notes".into(), "TITLE".into()];
        assert_eq!(
            selection.column_indices(&table).unwrap(),
            vec![(1, "Title"), (2, "Notes")]
        );
    }

    #[test]
    fn test_set_columns_drops_duplicates() {
        let mut selection = Selection::default();
        selection.set_columns(&["Title", " Title", "Notes"]);
        assert_eq!(selection.columns, vec!["Title", "Notes"]);
    }

    #[test]
    fn test_set_identifier_leaves_columns() {
        let mut selection = Selection::default();
        selection.set_columns(&["Title", "Notes"]);
        selection.set_identifier("Title");
        assert_eq!(selection.identifier.as_deref(), Some("Title"));
        assert_eq!(selection.columns, vec!["Notes"]);
    }
}
