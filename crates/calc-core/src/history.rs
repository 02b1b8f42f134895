//! Size-bounded calculation history.

use std::collections::VecDeque;
use std::collections::vec_deque;

use crate::error::{CalcError, Result};
use crate::record::CalculationRecord;

/// Ordered, bounded log of calculation records.
///
/// Appending past `max_size` silently evicts the oldest records. Changing the
/// bound with [`HistoryLog::set_max_size`] never evicts on its own; the next
/// append enforces it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLog {
    records: VecDeque<CalculationRecord>,
    max_size: usize,
}

impl HistoryLog {
    /// Creates an empty log bounded at `max_size` (clamped to at least 1).
    pub fn new(max_size: usize) -> Self {
        Self {
            records: VecDeque::new(),
            max_size: max_size.max(1),
        }
    }

    /// Appends `record`, evicting from the front while over the bound.
    pub fn append(&mut self, record: CalculationRecord) {
        self.records.push_back(record);
        while self.records.len() > self.max_size {
            self.records.pop_front();
        }
    }

    /// Records in insertion order.
    pub fn all(&self) -> vec_deque::Iter<'_, CalculationRecord> {
        self.records.iter()
    }

    /// The last `min(count, len)` records, oldest first.
    pub fn recent(&self, count: i64) -> Result<vec_deque::Iter<'_, CalculationRecord>> {
        if count < 0 {
            return Err(CalcError::InvalidArgument {
                argument: "count",
                reason: format!("must be non-negative, got {count}"),
            });
        }
        let take = usize::try_from(count).unwrap_or(usize::MAX).min(self.records.len());
        Ok(self.records.range(self.records.len() - take..))
    }

    /// Empties the log.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Replaces the contents with `records`, keeping the newest `max_size`.
    pub fn replace_all<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = CalculationRecord>,
    {
        self.records = records.into_iter().collect();
        let excess = self.records.len().saturating_sub(self.max_size);
        self.records.drain(..excess);
    }

    /// Owned copy of every record, oldest first.
    pub fn records(&self) -> Vec<CalculationRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn last(&self) -> Option<&CalculationRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Changes the bound without evicting existing records.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size.max(1);
    }

    /// Restores contents verbatim from a snapshot, bypassing the bound.
    pub(crate) fn restore(&mut self, records: Vec<CalculationRecord>) {
        self.records = records.into();
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a CalculationRecord;
    type IntoIter = vec_deque::Iter<'a, CalculationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcErrorKind;

    fn add(a: f64, b: f64) -> CalculationRecord {
        CalculationRecord::new("add", a, b, a + b)
    }

    fn results(log: &HistoryLog) -> Vec<f64> {
        log.all().map(|r| r.result).collect()
    }

    #[test]
    fn test_append_preserves_order() {
        let mut log = HistoryLog::new(5);
        log.append(add(1.0, 1.0));
        log.append(add(2.0, 2.0));
        assert_eq!(results(&log), vec![2.0, 4.0]);
        assert_eq!(log.last().map(|r| r.result), Some(4.0));
    }

    #[test]
    fn test_append_evicts_oldest() {
        let mut log = HistoryLog::new(3);
        for a in 1..=4 {
            log.append(add(f64::from(a), 2.0));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(results(&log), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_all_is_restartable() {
        let mut log = HistoryLog::new(3);
        log.append(add(1.0, 2.0));
        log.append(add(3.0, 4.0));
        let view = log.all();
        let first: Vec<_> = view.clone().collect();
        let second: Vec<_> = view.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_recent() {
        let mut log = HistoryLog::new(10);
        for a in 1..=5 {
            log.append(add(f64::from(a), 0.0));
        }
        let last_two: Vec<f64> = log.recent(2).unwrap().map(|r| r.result).collect();
        assert_eq!(last_two, vec![4.0, 5.0]);
        assert_eq!(log.recent(50).unwrap().count(), 5);
        assert_eq!(log.recent(0).unwrap().count(), 0);
    }

    #[test]
    fn test_recent_rejects_negative() {
        let log = HistoryLog::new(3);
        let err = log.recent(-1).unwrap_err();
        assert_eq!(err.kind(), CalcErrorKind::InvalidArgument);
    }

    #[test]
    fn test_shrinking_bound_is_lazy() {
        let mut log = HistoryLog::new(5);
        for a in 1..=5 {
            log.append(add(f64::from(a), 0.0));
        }
        log.set_max_size(2);
        assert_eq!(log.len(), 5);
        log.append(add(6.0, 0.0));
        assert_eq!(results(&log), vec![5.0, 6.0]);
    }

    #[test]
    fn test_replace_all_keeps_newest() {
        let mut log = HistoryLog::new(2);
        log.replace_all(vec![add(1.0, 0.0), add(2.0, 0.0), add(3.0, 0.0)]);
        assert_eq!(results(&log), vec![2.0, 3.0]);
    }

    #[test]
    fn test_clear() {
        let mut log = HistoryLog::new(2);
        log.append(add(1.0, 0.0));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.max_size(), 2);
    }
}
