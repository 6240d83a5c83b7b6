//! 照合結果の集計

use crate::types::MatchResult;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// 結果行数
    pub matches: usize,
    /// 1件以上ヒットしたレコード数
    pub records: usize,
    /// カテゴリ別件数（多い順、同数は初出順）
    pub by_category: Vec<(String, usize)>,
    /// 列別件数（多い順、同数は初出順）
    pub by_field: Vec<(String, usize)>,
}

impl Summary {
    pub fn from_results(results: &[MatchResult]) -> Self {
        let records: HashSet<&str> = results.iter().map(|r| r.record_id.as_str()).collect();
        Self {
            matches: results.len(),
            records: records.len(),
            by_category: count_by(results, |r| &r.category),
            by_field: count_by(results, |r| &r.field_name),
        }
    }
}

fn count_by<F>(results: &[MatchResult], key: F) -> Vec<(String, usize)>
where
    F: Fn(&MatchResult) -> &String,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for result in results {
        let k = key(result);
        match counts.iter_mut().find(|(name, _)| name == k) {
            Some((_, n)) => *n += 1,
            None => counts.push((k.clone(), 1)),
        }
    }
    // 安定ソートなので同数は初出順のまま
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
