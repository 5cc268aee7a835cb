//! Priority ordering of triaged records.

use crate::types::TriagedRecord;

/// Stable sort by ascending priority weight; ties keep log order.
pub fn rank(mut records: Vec<TriagedRecord>) -> Vec<TriagedRecord> {
  records.sort_by_key(|r| r.priority.weight());
  records
}

/// Rank, then keep the `limit` most urgent records.
pub fn rank_top(records: Vec<TriagedRecord>, limit: usize) -> Vec<TriagedRecord> {
  let mut ranked = rank(records);
  ranked.truncate(limit);
  ranked
}
