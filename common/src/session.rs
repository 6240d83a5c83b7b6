//! 1回の作業セッション
//!
//! 読み込んだメタデータ・辞書・選択・直近の結果と現在の画面を持つ。
//! 画面遷移は必ず `dispatch` を通し、ガードに失敗したら画面は変わらない。

use crate::error::{Error, Result};
use crate::export;
use crate::lexicon::Lexicon;
use crate::matcher;
use crate::screen::{Event, Screen};
use crate::selection::Selection;
use crate::table::{Delimiter, Table};
use crate::types::{MatchResult, Progress};
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct Session {
    screen: Screen,
    metadata: Option<Table>,
    metadata_path: Option<PathBuf>,
    lexicon: Option<Lexicon>,
    lexicon_path: Option<PathBuf>,
    pub selection: Selection,
    results: Option<Vec<MatchResult>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn metadata(&self) -> Option<&Table> {
        self.metadata.as_ref()
    }

    pub fn metadata_path(&self) -> Option<&Path> {
        self.metadata_path.as_deref()
    }

    pub fn lexicon(&self) -> Option<&Lexicon> {
        self.lexicon.as_ref()
    }

    pub fn lexicon_path(&self) -> Option<&Path> {
        self.lexicon_path.as_deref()
    }

    pub fn results(&self) -> Option<&[MatchResult]> {
        self.results.as_deref()
    }

    /// イベントを処理して遷移先を返す
    pub fn dispatch(&mut self, event: Event) -> Result<Screen> {
        let next = self.screen.on(event).ok_or_else(|| Error::InvalidTransition {
            screen: self.screen.to_string(),
            event: format!("{:?}", event),
        })?;

        if event == Event::Next {
            self.check_can_leave()?;
        }
        if event == Event::Finish {
            self.results = None;
        }

        tracing::debug!(from = ?self.screen, to = ?next, ?event, "screen transition");
        self.screen = next;
        Ok(next)
    }

    fn check_can_leave(&self) -> Result<()> {
        match self.screen {
            Screen::LoadMetadata if self.metadata.is_none() => {
                Err(Error::MissingSelection("load a metadata file first".into()))
            }
            Screen::LoadLexicon if self.lexicon.is_none() => {
                Err(Error::MissingSelection("load a lexicon file first".into()))
            }
            Screen::DataSelection => {
                let (table, lexicon) = self.loaded()?;
                self.selection.validate(table, lexicon)
            }
            _ => Ok(()),
        }
    }

    fn loaded(&self) -> Result<(&Table, &Lexicon)> {
        let table = self
            .metadata
            .as_ref()
            .ok_or_else(|| Error::MissingSelection("no metadata loaded".into()))?;
        let lexicon = self
            .lexicon
            .as_ref()
            .ok_or_else(|| Error::MissingSelection("no lexicon loaded".into()))?;
        Ok((table, lexicon))
    }

    /// メタデータを読み込む（前回分と選択・結果は破棄）
    pub fn load_metadata(&mut self, path: &Path, delimiter: Option<Delimiter>) -> Result<&Table> {
        let table = Table::from_path(path, delimiter)?;
        Ok(self.set_metadata(table, Some(path.to_path_buf())))
    }

    pub fn set_metadata(&mut self, table: Table, path: Option<PathBuf>) -> &Table {
        self.selection.identifier = table.headers().first().cloned();
        self.selection.columns.clear();
        self.results = None;
        self.metadata_path = path;
        self.metadata.insert(table)
    }

    /// 辞書を読み込む（カテゴリ選択と結果は破棄）
    pub fn load_lexicon(&mut self, path: &Path) -> Result<&Lexicon> {
        let lexicon = Lexicon::from_path(path)?;
        Ok(self.set_lexicon(lexicon, Some(path.to_path_buf())))
    }

    pub fn set_lexicon(&mut self, lexicon: Lexicon, path: Option<PathBuf>) -> &Lexicon {
        self.selection.categories.clear();
        self.results = None;
        self.lexicon_path = path;
        self.lexicon.insert(lexicon)
    }

    /// 選択を検証して照合を実行し、結果を保持する
    pub fn analyze(&mut self) -> Result<&[MatchResult]> {
        self.analyze_with_progress(|_| {})
    }

    pub fn analyze_with_progress<F: FnMut(Progress)>(&mut self, on_progress: F) -> Result<&[MatchResult]> {
        let (table, lexicon) = self.loaded()?;
        self.selection.validate(table, lexicon)?;
        let results = matcher::find_matches_with_progress(table, lexicon, &self.selection, on_progress)?;
        Ok(self.results.insert(results).as_slice())
    }

    /// 直近の結果を保存
    pub fn save_results(&self, path: &Path) -> Result<export::ResultFormat> {
        let results = self
            .results
            .as_deref()
            .ok_or_else(|| Error::MissingSelection("run the analysis before saving".into()))?;
        export::save_results(results, path)
    }
}
