use std::path::PathBuf;

use marmat_common::{Delimiter, ResultFormat, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Info, message: message.into() }
    }

    /// 選択不足は警告、それ以外は失敗として扱う
    pub fn from_error(err: &anyhow::Error) -> Self {
        let selection = err
            .downcast_ref::<marmat_common::Error>()
            .is_some_and(|e| e.is_selection_problem());
        Self {
            kind: if selection { NoticeKind::Warning } else { NoticeKind::Error },
            message: format!("{err:#}"),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            NoticeKind::Info => "Done",
            NoticeKind::Warning => "Warning",
            NoticeKind::Error => "Error",
        }
    }
}

/// 直近の解析結果（画面表示用）
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub summary: Summary,
    pub format: ResultFormat,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// None = 拡張子から推定
    pub delimiter: Option<Delimiter>,
    pub output_path: PathBuf,
    pub report: Option<AnalysisReport>,
    pub status: String,
    pub popup: Option<Notice>,
}

impl AppState {
    /// ステータスバーは常に更新し、ポップアップ有効時のみウィンドウも出す
    pub fn notify(&mut self, notice: Notice, popups_enabled: bool) {
        match notice.kind {
            NoticeKind::Info => tracing::info!("{}", notice.message),
            NoticeKind::Warning => tracing::warn!("{}", notice.message),
            NoticeKind::Error => tracing::error!("{}", notice.message),
        }
        self.status = notice.message.clone();
        if popups_enabled {
            self.popup = Some(notice);
        }
    }

    pub fn dismiss_popup(&mut self) {
        self.popup = None;
    }
}
