use clap::{Parser, Subcommand};
use marmat_common::{Delimiter, MatchMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marmat")]
#[command(about = "Reparative metadata assessment: flag lexicon terms in tabular metadata", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// メタデータを辞書と照合して結果ファイルを出力
    Run {
        /// メタデータファイル (csv/tsv/xlsx)
        #[arg(required = true)]
        metadata: PathBuf,

        /// 辞書ファイル（Term, Category 列を持つCSV）
        #[arg(required = true)]
        lexicon: PathBuf,

        /// ID列（省略時は先頭列）
        #[arg(short, long)]
        id_column: Option<String>,

        /// 照合する列（カンマ区切り可）
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// 照合するカテゴリ（カンマ区切り可）
        #[arg(short = 'g', long, value_delimiter = ',')]
        categories: Vec<String>,

        /// ID列以外の全列を照合
        #[arg(long, conflicts_with = "columns")]
        all_columns: bool,

        /// 全カテゴリを照合
        #[arg(long, conflicts_with = "categories")]
        all_categories: bool,

        /// 単語単位で照合（デフォルトは部分一致）
        #[arg(short = 'w', long)]
        whole_word: bool,

        /// メタデータの区切り文字 (comma/tab/semicolon/space/pipe)
        #[arg(short, long)]
        delimiter: Option<Delimiter>,

        /// 出力ファイル/ディレクトリ（デフォルト: 設定の結果フォルダ/MaRMAT_output.csv）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 対話プロンプトを出さない
        #[arg(long)]
        no_prompt: bool,
    },

    /// メタデータの列一覧とプレビューを表示
    Columns {
        #[arg(required = true)]
        metadata: PathBuf,

        /// 区切り文字
        #[arg(short, long)]
        delimiter: Option<Delimiter>,

        /// プレビュー行数
        #[arg(short, long, default_value = "5")]
        preview: usize,
    },

    /// 辞書のカテゴリ一覧を表示
    Categories {
        #[arg(required = true)]
        lexicon: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// ポップアップ通知 (on/off)
        #[arg(long)]
        popups: Option<Toggle>,

        /// フルスクリーン起動 (on/off)
        #[arg(long)]
        fullscreen: Option<Toggle>,

        /// メタデータの既定フォルダ
        #[arg(long)]
        metadata_dir: Option<PathBuf>,

        /// 辞書の既定フォルダ
        #[arg(long)]
        lexicon_dir: Option<PathBuf>,

        /// 結果の既定フォルダ
        #[arg(long)]
        results_dir: Option<PathBuf>,
    },
}

impl Commands {
    pub fn match_mode(whole_word: bool) -> MatchMode {
        if whole_word {
            MatchMode::WholeWord
        } else {
            MatchMode::Substring
        }
    }
}

/// on/off 値
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(&self) -> bool {
        matches!(self, Toggle::On)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Toggle::On => "on",
            Toggle::Off => "off",
        }
    }
}

impl std::str::FromStr for Toggle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Ok(Toggle::On),
            "off" | "false" | "no" | "0" => Ok(Toggle::Off),
            _ => Err(format!("Unknown value: {}. Use on or off", s)),
        }
    }
}
