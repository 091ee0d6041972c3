use crate::agg::{history::RawRecordHistory, table::AggregationTable};

/// Which half of the dashboard reacts to navigation keys.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Pane {
    Top,
    Bottom,
}

/// Cursor and size state owned by the dashboard.
#[derive(Debug)]
pub struct DashboardView {
    pub pane: Pane,
    /// Selected entry of the raw-record history, 0-based.
    pub record_idx: usize,
    /// Field cursor within the selected record.
    pub field_idx: usize,
    pub width: u16,
    pub height: u16,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            pane: Pane::Top,
            record_idx: 0,
            field_idx: 0,
            width: 0,
            height: 0,
        }
    }
}

/// Everything the aggregator writes and the dashboard reads, behind one lock.
/// Holding the lock for the whole of a render keeps upserts from overlapping
/// a paint.
#[derive(Debug)]
pub struct Session {
    pub table: AggregationTable,
    pub history: RawRecordHistory,
    pub view: DashboardView,
}

impl Session {
    pub fn new(history_limit: usize) -> Self {
        Self {
            table: AggregationTable::new(),
            history: RawRecordHistory::new(history_limit),
            view: DashboardView::default(),
        }
    }

    pub fn toggle_pane(&mut self) {
        self.view.pane = match self.view.pane {
            Pane::Top => Pane::Bottom,
            Pane::Bottom => Pane::Top,
        };
    }

    /// Up-arrow in whichever pane is active.
    pub fn scroll_up(&mut self) {
        match self.view.pane {
            Pane::Top => self.table.scroll_up(),
            Pane::Bottom => {
                if self.view.field_idx > 0 {
                    self.view.field_idx -= 1;
                } else if self.view.record_idx > 0 {
                    self.view.record_idx -= 1;
                }
            }
        }
    }

    /// Down-arrow: in the bottom pane the field cursor advances, spilling
    /// into the next record once it passes the last field.
    pub fn scroll_down(&mut self) {
        match self.view.pane {
            Pane::Top => self.table.scroll_down(),
            Pane::Bottom => {
                let fields = self.history.field_count(self.view.record_idx);
                if self.view.field_idx + 1 < fields {
                    self.view.field_idx += 1;
                } else if self.view.record_idx + 1 < self.history.len() {
                    self.view.record_idx += 1;
                    self.view.field_idx = 0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::model::record::RawRecord;

    fn raw(labels: &[&str]) -> RawRecord {
        let fields: HashMap<String, String> = labels
            .iter()
            .map(|l| (l.to_string(), "v".to_string()))
            .collect();
        RawRecord::new(fields)
    }

    fn session_with_records() -> Session {
        let mut session = Session::new(10);
        session.history.append(raw(&["method", "status", "uri"]));
        session.history.append(raw(&["size", "uri"]));
        session.view.pane = Pane::Bottom;
        session
    }

    #[test]
    fn down_walks_fields_then_spills_into_next_record() {
        let mut session = session_with_records();
        session.scroll_down();
        session.scroll_down();
        assert_eq!((session.view.record_idx, session.view.field_idx), (0, 2));

        // past the last field of a non-last record
        session.scroll_down();
        assert_eq!((session.view.record_idx, session.view.field_idx), (1, 0));
    }

    #[test]
    fn down_past_the_last_field_of_the_last_record_is_a_noop() {
        let mut session = session_with_records();
        session.view.record_idx = 1;
        session.view.field_idx = 1;
        session.scroll_down();
        assert_eq!((session.view.record_idx, session.view.field_idx), (1, 1));
    }

    #[test]
    fn up_decrements_the_field_before_moving_records() {
        let mut session = session_with_records();
        session.view.record_idx = 1;
        session.view.field_idx = 1;
        session.scroll_up();
        assert_eq!((session.view.record_idx, session.view.field_idx), (1, 0));
        session.scroll_up();
        assert_eq!((session.view.record_idx, session.view.field_idx), (0, 0));
    }

    #[test]
    fn up_at_the_first_record_is_a_noop() {
        let mut session = session_with_records();
        session.scroll_up();
        assert_eq!((session.view.record_idx, session.view.field_idx), (0, 0));
    }

    #[test]
    fn tab_toggles_the_active_pane() {
        let mut session = Session::new(10);
        assert_eq!(session.view.pane, Pane::Top);
        session.toggle_pane();
        assert_eq!(session.view.pane, Pane::Bottom);
        session.toggle_pane();
        assert_eq!(session.view.pane, Pane::Top);
    }
}
