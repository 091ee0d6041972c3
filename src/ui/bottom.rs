use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::model::session::Session;

/// Inspector over the raw-record history. The number column tracks record
/// sequence numbers; the text column walks the selected record's fields
/// starting at the field cursor. Rendering never moves the cursor forward,
/// it only clamps it after evictions.
pub fn draw_bottom(frame: &mut Frame, area: Rect, session: &mut Session) {
    if session.history.is_empty() || area.height == 0 {
        return;
    }

    let total = session.history.len();
    let view = &mut session.view;
    view.record_idx = view.record_idx.min(total - 1);
    let field_count = session.history.field_count(view.record_idx);
    view.field_idx = view.field_idx.min(field_count.saturating_sub(1));

    let rows = area.height as usize;
    let window_start = view.record_idx.min(total.saturating_sub(rows));
    let digits = total.to_string().len();

    let Some(record) = session.history.get(view.record_idx) else {
        return;
    };

    let mut lines = Vec::with_capacity(rows);
    let mut field = view.field_idx;
    for row in 0..rows {
        let idx = window_start + row;
        if idx >= total {
            break;
        }
        let number_style = if idx == view.record_idx {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let mut spans = vec![Span::styled(
            format!(" {:0width$} ", idx + 1, width = digits),
            number_style,
        )];
        if let Some(label) = record.sorted_labels.get(field) {
            let value = &record.fields[label];
            spans.push(Span::raw(format!(" {label} : {value}")));
            field += 1;
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), area);
}
