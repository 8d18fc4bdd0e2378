use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row, Table},
};

use crate::dataset::{MARK_CLOSE, MARK_OPEN};
use crate::model::Model;
use crate::provision::Scope;
use crate::search::PLACEHOLDER;

pub const SEARCH_HEIGHT: u16 = 3;
pub const COUNT_WIDTH: u16 = 9;

pub fn draw(model: &Model, frame: &mut Frame) {
    let [search_area, table_area] =
        Layout::vertical([Constraint::Length(SEARCH_HEIGHT), Constraint::Min(0)])
            .areas(frame.area());
    let [input_area, count_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(COUNT_WIDTH)])
            .areas(search_area);

    draw_search(model, frame, input_area, count_area);
    draw_table(model, frame, table_area);
}

fn draw_search(model: &Model, frame: &mut Frame, input_area: Rect, count_area: Rect) {
    let text = model.search.text();
    let line = if text.is_empty() {
        Line::from(PLACEHOLDER.dim())
    } else {
        Line::from(text)
    };
    frame.render_widget(
        Paragraph::new(line).block(Block::bordered().title(" Search ")),
        input_area,
    );

    // The literal count from the last `results` event
    let count = format!("({})", model.search.result_count());
    frame.render_widget(
        Paragraph::new(count).centered().block(Block::bordered()),
        count_area,
    );
}

fn draw_table(model: &Model, frame: &mut Frame, area: Rect) {
    let rendered = model.table.rendered();
    let highlight = highlight_style(model.table.scope());

    let ncols = rendered.headers.len().max(1);
    let header = Row::new(
        rendered
            .headers
            .iter()
            .map(|h| Cell::from(h.clone().bold())),
    );
    let rows = rendered.rows.iter().map(|cells| {
        Row::new(
            cells
                .iter()
                .map(|cell| Cell::from(mark_line(cell, highlight))),
        )
    });

    // Fixed layout: every column gets an equal share of the width.
    let widths = vec![Constraint::Ratio(1, ncols as u32); ncols];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::bordered().title(" Results "));
    frame.render_widget(table, area);
}

/// Highlight style from the provisioned scope styles (`mark=<colour>`).
fn highlight_style(scope: &Scope) -> Style {
    let color = scope
        .styles()
        .iter()
        .find_map(|s| s.strip_prefix("mark="))
        .and_then(|name| name.parse().ok())
        .unwrap_or(Color::Yellow);
    Style::new().fg(Color::Black).bg(color)
}

/// Split a cell on its highlight markers into styled spans.
fn mark_line(text: &str, highlight: Style) -> Line<'_> {
    let mut spans = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find(MARK_OPEN) {
        let marked_start = open + MARK_OPEN.len();
        let Some(close) = rest[marked_start..].find(MARK_CLOSE) else {
            break;
        };
        if open > 0 {
            spans.push(Span::raw(&rest[..open]));
        }
        spans.push(Span::styled(
            &rest[marked_start..marked_start + close],
            highlight,
        ));
        rest = &rest[marked_start + close + MARK_CLOSE.len()..];
    }
    if !rest.is_empty() || spans.is_empty() {
        spans.push(Span::raw(rest));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_single_span() {
        let line = mark_line("Stout", Style::new());
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].content, "Stout");
    }

    #[test]
    fn marked_region_gets_the_highlight_style() {
        let highlight = Style::new().bg(Color::Yellow);
        let line = mark_line("Punk <mark>IPA</mark> 5.6", highlight);
        let parts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["Punk ", "IPA", " 5.6"]);
        assert_eq!(line.spans[1].style, highlight);
        assert_ne!(line.spans[0].style, highlight);
    }

    #[test]
    fn marker_at_string_start_has_no_empty_lead_span() {
        let line = mark_line("<mark>IPA</mark>", Style::new().bg(Color::Yellow));
        let parts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["IPA"]);
    }

    #[test]
    fn unterminated_marker_renders_verbatim() {
        let line = mark_line("<mark>IPA", Style::new());
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].content, "<mark>IPA");
    }

    #[test]
    fn scope_style_picks_the_highlight_colour() {
        let mut scope = Scope::default();
        scope.add_style("mark=green");
        assert_eq!(highlight_style(&scope).bg, Some(Color::Green));

        let bare = Scope::default();
        assert_eq!(highlight_style(&bare).bg, Some(Color::Yellow));
    }
}
