//! 画面遷移の状態機械
//!
//! UIフレームワークに依存しない。ガード（読み込み済みか等）は Session 側で見る。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Main,
    Settings,
    Instructions,
    LoadMetadata,
    LoadLexicon,
    DataSelection,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    Start,
    OpenSettings,
    OpenInstructions,
    Next,
    Back,
    Finish,
}

impl Screen {
    /// 遷移表。無効なイベントは None
    pub fn on(self, event: Event) -> Option<Screen> {
        use Event::*;
        use Screen::*;

        match (self, event) {
            (Main, Start) => Some(LoadMetadata),
            (Main, OpenSettings) => Some(Settings),
            (Main, OpenInstructions) => Some(Instructions),
            (Settings, Back) | (Instructions, Back) => Some(Main),
            (LoadMetadata, Next) => Some(LoadLexicon),
            (LoadMetadata, Back) => Some(Main),
            (LoadLexicon, Next) => Some(DataSelection),
            (LoadLexicon, Back) => Some(LoadMetadata),
            (DataSelection, Next) => Some(Results),
            (DataSelection, Back) => Some(LoadLexicon),
            (Results, Back) => Some(DataSelection),
            (Results, Finish) => Some(Main),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Main => "MaRMAT",
            Screen::Settings => "Settings",
            Screen::Instructions => "Getting Started",
            Screen::LoadMetadata => "Load Metadata",
            Screen::LoadLexicon => "Load Lexicon",
            Screen::DataSelection => "Select Data",
            Screen::Results => "Perform Analysis",
        }
    }

    /// ウィザードの手順番号（1始まり）
    pub fn step(&self) -> Option<u8> {
        match self {
            Screen::LoadMetadata => Some(1),
            Screen::LoadLexicon => Some(2),
            Screen::DataSelection => Some(3),
            Screen::Results => Some(4),
            _ => None,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}
