use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use marmat_common::export::resolve_output_path;
use marmat_common::{Delimiter, Session, Settings, Summary, DEFAULT_OUTPUT_FILE};

use crate::model::AnalysisReport;

pub const TABLE_EXTENSIONS: &[&str] = &["csv", "tsv", "txt", "xlsx", "xlsm", "xls", "ods"];

pub fn pick_table(title: &str, dir: &Path) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .set_directory(dir)
        .add_filter("Tables", TABLE_EXTENSIONS)
        .pick_file()
}

pub fn pick_folder(dir: &Path) -> Option<PathBuf> {
    rfd::FileDialog::new().set_directory(dir).pick_folder()
}

pub fn pick_output(current: &Path) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv"])
        .add_filter("Excel", &["xlsx"]);
    if let Some(dir) = current.parent().filter(|p| p.is_dir()) {
        dialog = dialog.set_directory(dir);
    }
    dialog = dialog.set_file_name(
        current
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_OUTPUT_FILE),
    );
    dialog.save_file()
}

pub fn default_output_path(settings: &Settings) -> PathBuf {
    settings.default_results_dir.join(DEFAULT_OUTPUT_FILE)
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    settings.save().context("save settings")
}

/// 読み込んで要約メッセージを返す
pub fn load_metadata(session: &mut Session, path: &Path, delimiter: Option<Delimiter>) -> Result<String> {
    let table = session
        .load_metadata(path, delimiter)
        .with_context(|| format!("load {}", path.display()))?;
    let mut message = format!(
        "Loaded {} records with {} columns",
        table.len(),
        table.headers().len()
    );
    if table.skipped_rows() > 0 {
        message.push_str(&format!(" ({} malformed rows skipped)", table.skipped_rows()));
    }
    Ok(message)
}

pub fn load_lexicon(session: &mut Session, path: &Path) -> Result<String> {
    let lexicon = session
        .load_lexicon(path)
        .with_context(|| format!("load {}", path.display()))?;
    Ok(format!(
        "Loaded {} terms in {} categories",
        lexicon.len(),
        lexicon.categories().len()
    ))
}

/// 照合して結果を保存する
pub fn analyze_and_save(session: &mut Session, output: &Path) -> Result<AnalysisReport> {
    let results = session
        .analyze_with_progress(|p| tracing::trace!(done = p.done, total = p.total, "matching"))
        .context("analysis failed")?;
    let summary = Summary::from_results(results);

    let output = resolve_output_path(output);
    let format = session
        .save_results(&output)
        .with_context(|| format!("write {}", output.display()))?;
    Ok(AnalysisReport { summary, format, output })
}
