use ratatui::{Frame, layout::Rect, text::Line, widgets::Paragraph};

use crate::{
    model::{cli::RunConfig, session::Session},
    ui::{column_widths, headers, pad_cells, row_cells},
};

/// Rows above the table data: two counter rows, a blank, the column header.
const CHROME_ROWS: usize = 4;

/// Statistics table over the current pagination window.
pub fn draw_top(
    frame: &mut Frame,
    area: Rect,
    session: &mut Session,
    config: &RunConfig,
    lines_read: u64,
) {
    let visible = (area.height as usize).saturating_sub(CHROME_ROWS);
    session.table.set_visible_rows(visible);

    let accepted = session.table.accepted_lines();
    let ignored = lines_read.saturating_sub(accepted);

    let mut lines = Vec::with_capacity(visible + CHROME_ROWS);
    lines.push(Line::from(format!(
        "Total URI: {}",
        session.table.distinct_uris()
    )));
    lines.push(Line::from(format!(
        "Read lines: {lines_read}, Ignore lines: {ignored}"
    )));
    lines.push(Line::from(""));

    let headers = headers(config.expand);
    let rows: Vec<Vec<String>> = session
        .table
        .page(config.sort)
        .into_iter()
        .map(|key| row_cells(key, session.table.get(key).unwrap(), config.expand))
        .collect();
    let widths = column_widths(&headers, &rows);

    lines.push(Line::from(pad_cells(&headers, &widths)));
    for row in &rows {
        lines.push(Line::from(pad_cells(row, &widths)));
    }

    frame.render_widget(Paragraph::new(lines), area);
}
