//! 照合対象の選択モジュール
//!
//! コマンドライン指定の列名・カテゴリ名を実在の名前に解決し、
//! 指定がなければ対話式（MultiSelect）で選ばせる。

use crate::error::{MarmatError, Result};
use dialoguer::{MultiSelect, Select};

/// 指定名を候補から解決（大文字小文字を無視、候補側の表記を返す）
pub fn resolve_names(requested: &[String], available: &[&str], what: &str) -> Result<Vec<String>> {
    let mut resolved: Vec<String> = Vec::new();
    let mut unknown = Vec::new();

    for name in requested.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let found = available
            .iter()
            .find(|a| **a == name)
            .or_else(|| available.iter().find(|a| a.to_lowercase() == name.to_lowercase()));
        match found {
            Some(a) if !resolved.iter().any(|r| r == a) => resolved.push(a.to_string()),
            Some(_) => {}
            None => unknown.push(name.to_string()),
        }
    }

    if !unknown.is_empty() {
        return Err(MarmatError::Selection(format!(
            "unknown {}: {} (available: {})",
            what,
            unknown.join(", "),
            available.join(", ")
        )));
    }
    Ok(resolved)
}

/// ID列を除いた全列
pub fn all_except(headers: &[String], identifier: Option<&str>) -> Vec<String> {
    headers
        .iter()
        .filter(|h| Some(h.as_str()) != identifier)
        .cloned()
        .collect()
}

/// 対話式で複数選択（未選択なら空）
pub fn pick_many(prompt: &str, items: &[&str]) -> Result<Vec<String>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let chosen = MultiSelect::new()
        .with_prompt(format!("{} (space: toggle, enter: confirm)", prompt))
        .items(items)
        .interact()?;
    Ok(chosen.into_iter().map(|i| items[i].to_string()).collect())
}

/// 対話式で1つ選択
pub fn pick_one(prompt: &str, items: &[&str], default: usize) -> Result<String> {
    let index = Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default.min(items.len().saturating_sub(1)))
        .interact()?;
    Ok(items[index].to_string())
}
