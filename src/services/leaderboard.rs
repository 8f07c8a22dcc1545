//! Leaderboard aggregation over approved events.
//!
//! Read-only. Totals are grouped by nominee display name, so two members
//! sharing a name share a row.

use crate::db::events;
use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::LeaderboardEntry;
use std::collections::HashMap;

/// Sum points per name and keep the `limit` highest totals.
///
/// Names accumulate in the order they are first seen; ties keep that order.
pub fn rank<I>(rows: I, limit: usize) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = (String, i64)>,
{
    let mut entries: Vec<LeaderboardEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (name, points) in rows {
        match index.get(&name) {
            Some(&i) => entries[i].total += i128::from(points),
            None => {
                index.insert(name.clone(), entries.len());
                entries.push(LeaderboardEntry {
                    name,
                    total: i128::from(points),
                });
            }
        }
    }

    // sort_by is stable
    entries.sort_by(|a, b| b.total.cmp(&a.total));
    entries.truncate(limit);
    entries
}

/// Top members of a group by approved points.
///
/// Pending events contribute nothing.
pub async fn top_members(
    pool: &DbPool,
    group_id: &str,
    limit: usize,
) -> Result<Vec<LeaderboardEntry>, AppError> {
    let rows = events::list_approved_points(pool, group_id).await?;
    Ok(rank(rows, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(items: &[(&str, i64)]) -> Vec<(String, i64)> {
        items.iter().map(|(n, p)| (n.to_string(), *p)).collect()
    }

    fn entry(name: &str, total: i128) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            total,
        }
    }

    #[test]
    fn test_rank_sums_by_name() {
        let ranked = rank(rows(&[("Alice", 10), ("Bob", 12), ("Alice", 15)]), 5);
        assert_eq!(ranked, vec![entry("Alice", 25), entry("Bob", 12)]);
    }

    #[test]
    fn test_rank_ties_keep_first_seen_order() {
        let ranked = rank(rows(&[("Cara", 5), ("Bob", 5), ("Dan", 9), ("Alice", 5)]), 5);
        assert_eq!(
            ranked,
            vec![entry("Dan", 9), entry("Cara", 5), entry("Bob", 5), entry("Alice", 5)]
        );
    }

    #[test]
    fn test_rank_limit_and_negative_points() {
        let ranked = rank(
            rows(&[("A", 1), ("B", 2), ("C", 3), ("D", -4), ("E", 5), ("F", 6), ("C", -10)]),
            3,
        );
        assert_eq!(ranked, vec![entry("F", 6), entry("E", 5), entry("B", 2)]);
    }

    #[test]
    fn test_rank_sums_past_i64_range() {
        let ranked = rank(
            rows(&[("A", i64::MAX), ("B", i64::MIN), ("A", 1), ("B", -1)]),
            5,
        );
        assert_eq!(
            ranked,
            vec![
                entry("A", i128::from(i64::MAX) + 1),
                entry("B", i128::from(i64::MIN) - 1),
            ]
        );
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(Vec::new(), 5).is_empty());
    }
}
