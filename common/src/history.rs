//! 領域リストのスナップショット履歴
//!
//! 直線的なUndo/Redo。カーソルより後ろのエントリは次の `record` で破棄される。
//! エントリは記録後に変更されない。

/// スナップショット履歴
#[derive(Debug, Clone, PartialEq)]
pub struct History<T> {
    entries: Vec<T>,
    /// 現在位置。空のときのみ None
    cursor: Option<usize>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
        }
    }
}

impl<T: Clone> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// スナップショットを複製して追加し、カーソルを末尾へ
    pub fn record(&mut self, snapshot: &T) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        let dropped = self.entries.len().saturating_sub(keep);
        self.entries.truncate(keep);
        self.entries.push(snapshot.clone());
        self.cursor = Some(self.entries.len() - 1);
        log::debug!(
            "history: recorded entry {} (dropped {} redo entries)",
            self.entries.len() - 1,
            dropped
        );
    }

    /// 1つ戻る。位置0または空のときは None
    pub fn undo(&mut self) -> Option<&T> {
        let cursor = self.cursor.filter(|&c| c > 0)?;
        self.cursor = Some(cursor - 1);
        log::debug!("history: undo -> {}", cursor - 1);
        self.entries.get(cursor - 1)
    }

    /// 1つ進む。末尾のときは None
    pub fn redo(&mut self) -> Option<&T> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor = Some(cursor + 1);
        log::debug!("history: redo -> {}", cursor + 1);
        self.entries.get(cursor + 1)
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(values: &[i32]) -> History<i32> {
        let mut history = History::new();
        for v in values {
            history.record(v);
        }
        history
    }

    #[test]
    fn test_empty_history() {
        let mut history: History<i32> = History::new();
        assert_eq!(history.cursor(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        assert_eq!(history.current(), None);
    }

    #[test]
    fn test_record_advances_cursor() {
        let history = history_of(&[1, 2, 3]);
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), Some(2));
        assert_eq!(history.current(), Some(&3));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_at_zero_is_noop() {
        let mut history = history_of(&[1]);
        assert_eq!(history.undo(), None);
        assert_eq!(history.cursor(), Some(0));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_redo_at_tail_is_noop() {
        let mut history = history_of(&[1, 2]);
        assert_eq!(history.redo(), None);
        assert_eq!(history.cursor(), Some(1));
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = history_of(&[1, 2, 3]);
        assert_eq!(history.undo(), Some(&2));
        assert_eq!(history.undo(), Some(&1));
        assert!(!history.can_undo());
        assert!(history.can_redo());
        assert_eq!(history.redo(), Some(&2));
        assert_eq!(history.current(), Some(&2));
    }

    #[test]
    fn test_record_after_undo_truncates_redo_tail() {
        let mut history = history_of(&[1, 2, 3]);
        history.undo();
        history.undo();
        history.record(&9);

        assert_eq!(history.entries(), &[1, 9]);
        assert_eq!(history.cursor(), Some(1));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_recorded_entry_is_a_copy() {
        let mut snapshot = vec!["a".to_string()];
        let mut history = History::new();
        history.record(&snapshot);
        snapshot.push("b".to_string());

        assert_eq!(history.current().map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_linear_law_against_model() {
        // 記録・Undo・Redoを混ぜた操作列で、モデル（Vec + index）と一致すること
        let ops = [
            'r', 'r', 'u', 'r', 'u', 'u', 'x', 'x', 'x', 'r', 'u', 'x', 'r', 'r', 'u', 'u', 'u',
        ];
        let mut history = History::new();
        let mut model: Vec<i32> = Vec::new();
        let mut index: isize = -1;

        for (step, op) in ops.iter().enumerate() {
            let value = step as i32;
            match op {
                'r' => {
                    history.record(&value);
                    model.truncate((index + 1) as usize);
                    model.push(value);
                    index = model.len() as isize - 1;
                }
                'u' => {
                    history.undo();
                    if index > 0 {
                        index -= 1;
                    }
                }
                _ => {
                    history.redo();
                    if index < model.len() as isize - 1 {
                        index += 1;
                    }
                }
            }

            assert_eq!(history.entries(), model.as_slice());
            assert_eq!(history.cursor().map(|c| c as isize).unwrap_or(-1), index);
            assert_eq!(history.can_undo(), index > 0);
            assert_eq!(history.can_redo(), index < model.len() as isize - 1);
        }
    }
}
