//! MaRMAT Common Library
//!
//! CLIとデスクトップ版で共有される型・表読み込み・語句照合

pub mod error;
pub mod export;
pub mod lexicon;
pub mod matcher;
pub mod screen;
pub mod selection;
pub mod session;
pub mod settings;
pub mod summary;
pub mod table;
pub mod types;

pub use error::{Error, Result};
pub use export::{read_results, save_results, ResultFormat};
pub use lexicon::Lexicon;
pub use matcher::{find_matches, find_matches_with_progress, Matcher};
pub use screen::{Event, Screen};
pub use selection::Selection;
pub use session::Session;
pub use settings::Settings;
pub use summary::Summary;
pub use table::{Delimiter, Table};
pub use types::{LexiconEntry, MatchMode, MatchResult, Progress, DEFAULT_OUTPUT_FILE, RESULT_HEADERS};
