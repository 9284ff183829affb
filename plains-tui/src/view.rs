use crate::screen::{LoadState, Screen};
use crate::styles;
use anyhow::Result;
use plains_feed::Article;
use ratatui::{
    Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Position},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use textwrap::wrap;

const APP_TITLE: &str = " Great Plains Ag Solutions ";
const NOTICE_ROWS: u16 = 6;

pub fn draw<B: Backend>(term: &mut Terminal<B>, screen: &Screen) -> Result<()> {
    term.draw(|frame| {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(NOTICE_ROWS),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        let header = Paragraph::new(Line::from(Span::styled(APP_TITLE, styles::HEADER)))
            .wrap(Wrap { trim: true });
        frame.render_widget(header, layout[0]);

        frame.render_widget(Paragraph::new(filter_bar(screen)), layout[1]);

        // Article list
        let content_width = layout[2].width.saturating_sub(2) as usize;
        let selected = screen.filter_state().selected_tag.as_deref();
        let lines: Vec<Line<'static>> = match screen.load_state() {
            LoadState::Loading => vec![Line::styled("Loading articles…", styles::BUSY)],
            LoadState::Failed(message) => vec![Line::styled(message.clone(), styles::ERROR)],
            LoadState::Loaded => {
                let visible = screen.visible();
                if visible.is_empty() {
                    vec![Line::styled("No articles match.", styles::DIM)]
                } else {
                    visible
                        .into_iter()
                        .skip(screen.scroll())
                        .flat_map(|a| article_lines(a, content_width, selected))
                        .collect()
                }
            }
        };
        let items: Vec<ListItem> = lines.into_iter().map(ListItem::new).collect();
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Articles "));
        frame.render_widget(list, layout[2]);

        // Messages: newest at the bottom
        let visible_h = NOTICE_ROWS.saturating_sub(2) as usize;
        let notices = screen.notices();
        let start = notices.len().saturating_sub(visible_h);
        let items: Vec<ListItem> = notices[start..]
            .iter()
            .map(|n| ListItem::new(Line::styled(n.text.clone(), n.style)))
            .collect();
        let messages =
            List::new(items).block(Block::default().borders(Borders::ALL).title(" Messages "));
        frame.render_widget(messages, layout[3]);

        // Search box
        let input = screen.editor();
        let input_box = Paragraph::new(input.text().to_string())
            .block(Block::default().borders(Borders::ALL).title(" Search "));
        frame.render_widget(Clear, layout[4]);
        frame.render_widget(input_box, layout[4]);
        let caret_x = layout[4].x + 1 + visual_caret_col(input.before_cursor());
        frame.set_cursor_position(Position {
            x: caret_x,
            y: layout[4].y + 1,
        });

        let status_style = match screen.load_state() {
            LoadState::Loading => styles::BUSY,
            LoadState::Failed(_) => styles::ERROR,
            LoadState::Loaded => styles::VALUE,
        };
        let status_line = Line::from(vec![
            Span::raw(" "),
            Span::styled(screen.status_line(), status_style),
        ]);
        let status = Paragraph::new(status_line)
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        frame.render_widget(status, layout[5]);
    })?;

    Ok(())
}

/// "Showing N of M", plus the active tag and committed query when set.
pub fn filter_bar(screen: &Screen) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    if *screen.load_state() == LoadState::Loaded {
        spans.push(Span::styled(screen.summary().to_string(), styles::VALUE));
    }
    let state = screen.filter_state();
    if let Some(tag) = &state.selected_tag {
        spans.push(Span::styled("  •  Filtering by: ", styles::LABEL));
        spans.push(Span::styled(tag.clone(), styles::TAG_SELECTED));
        spans.push(Span::styled("  (/clear)", styles::DIM));
    }
    let query = state.applied_query().trim();
    if !query.is_empty() {
        spans.push(Span::styled("  •  Search: ", styles::LABEL));
        spans.push(Span::styled(format!("\"{query}\""), styles::VALUE));
        spans.push(Span::styled("  (/reset)", styles::DIM));
    }
    Line::from(spans)
}

/// One article card: title, tag chips, wrapped summary, image line, spacer.
pub fn article_lines(article: &Article, width: usize, selected: Option<&str>) -> Vec<Line<'static>> {
    let view = &article.view;
    let width = width.max(1);
    let mut out = Vec::new();

    let title = if view.title.is_empty() {
        "(untitled)"
    } else {
        view.title.as_str()
    };
    for seg in wrap(title, width) {
        out.push(Line::styled(seg.into_owned(), styles::TITLE));
    }

    if !view.tag_labels.is_empty() {
        let mut spans = Vec::with_capacity(view.tag_labels.len() * 2);
        for label in &view.tag_labels {
            let style = if Some(label.as_str()) == selected {
                styles::TAG_SELECTED
            } else {
                styles::TAG
            };
            spans.push(Span::styled(format!("[{label}]"), style));
            spans.push(Span::raw(" "));
        }
        spans.pop();
        out.push(Line::from(spans));
    }

    if !view.summary.is_empty() {
        for seg in wrap(&view.summary, width) {
            out.push(Line::styled(seg.into_owned(), styles::VALUE));
        }
    }

    if let Some(url) = &view.image_url {
        let text = if view.image_alt.is_empty() {
            format!("image: {url}")
        } else {
            format!("image: {url} ({})", view.image_alt)
        };
        out.push(Line::styled(text, styles::DIM));
    }

    out.push(Line::default());
    out
}

fn visual_caret_col(before: &str) -> u16 {
    use unicode_width::UnicodeWidthStr;
    UnicodeWidthStr::width(before) as u16
}
