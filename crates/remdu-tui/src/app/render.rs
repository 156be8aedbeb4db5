//! Rendering of the listing, chrome, and popups.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use remdu_core::format::{count_field, format_count, format_size, size_field};

use super::App;

const GRAPH_BARS: u64 = 10;
const SIZE_WIDTH: usize = 12;
const COUNT_WIDTH: usize = 9;

impl App {
    /// Draw the whole screen. The listing height feeds back into the
    /// controller so page moves match what is visible.
    pub(crate) fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.buffer_mut().set_style(
            area,
            Style::default().fg(self.theme.text).bg(self.theme.background),
        );

        let [header_area, path_area, list_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);
        self.list_height = list_area.height as usize;

        let header = format!(
            "remdu v{} - use the arrow keys to navigate, press ? for help",
            env!("CARGO_PKG_VERSION")
        );
        frame.render_widget(
            Paragraph::new(header).style(
                Style::default()
                    .fg(self.theme.header_fg)
                    .bg(self.theme.header_bg),
            ),
            header_area,
        );

        let path_line = pad_with(
            &format!("-- {} ", self.path),
            '-',
            path_area.width as usize,
        );
        frame.render_widget(Paragraph::new(path_line), path_area);

        let lines = self.listing_lines(list_area.width as usize);
        frame.render_widget(Paragraph::new(lines), list_area);

        frame.render_widget(
            Paragraph::new(self.footer_text()).style(
                Style::default()
                    .fg(self.theme.header_fg)
                    .bg(self.theme.header_bg),
            ),
            footer_area,
        );

        self.render_popup(frame, area);
    }

    fn listing_lines(&self, width: usize) -> Vec<Line<'static>> {
        if self.current.is_none() {
            return Vec::new();
        }
        let pos = self.viewports.get(&self.path);
        let per_bar = (self.biggest_entry() / GRAPH_BARS).max(1);
        let show_empty = self.has_empty_dir();

        let mut lines = Vec::new();
        for (rank, &underlying) in self
            .sort_perm
            .iter()
            .enumerate()
            .skip(pos.offset)
            .take(self.list_height)
        {
            let entry = &self.entries[underlying];
            let attrs = self.rows[underlying].attrs;
            let error = self.row_errors[underlying].as_deref();
            let selected = self.selection.is_selected(&self.rows[underlying].key);

            let mut flag = ' ';
            let mut message = String::new();
            if attrs.is_dir && !attrs.readable {
                message = " [not read yet]".to_string();
            }
            if attrs.count_unknown_size > 0 {
                message = format!(
                    " [{} of {} objects have unknown size, size may be underestimated]",
                    attrs.count_unknown_size, attrs.count
                );
                flag = '~';
            }
            if attrs.entries_have_errors {
                message =
                    " [some subdirectories could not be read, size may be underestimated]"
                        .to_string();
                flag = '.';
            }
            if let Some(err) = error {
                message = format!(" [{err}]");
                flag = '!';
            }
            if show_empty && attrs.is_dir && attrs.count == 0 && flag == ' ' {
                flag = 'e';
            }

            let mut extras = String::new();
            if self.show_counts {
                let field = count_field(attrs.count, self.human_readable, COUNT_WIDTH);
                if attrs.count > 0 {
                    extras.push_str(&field);
                } else {
                    extras.push_str(&" ".repeat(field.width()));
                }
                extras.push(' ');
            }
            if self.show_average {
                let average = attrs.average_size() as u64;
                let field = size_field(average, self.human_readable, COUNT_WIDTH);
                if average > 0 {
                    extras.push_str(&field);
                } else {
                    extras.push_str(&" ".repeat(field.width()));
                }
                extras.push(' ');
            }
            if self.show_graph {
                let bars = ((attrs.size + per_bar / 2) / per_bar).min(GRAPH_BARS) as usize;
                extras.push_str(&format!(
                    "[{}{}] ",
                    "#".repeat(bars),
                    " ".repeat(GRAPH_BARS as usize - bars)
                ));
            }

            let mark = if attrs.is_dir { '/' } else { ' ' };
            let text = format!(
                "{flag} {} {extras}{mark}{}{message}",
                size_field(attrs.size, self.human_readable, SIZE_WIDTH),
                entry.name(),
            );

            let mut style = Style::default().fg(self.theme.text);
            if attrs.entries_have_errors {
                style = style.fg(self.theme.warning);
            }
            if error.is_some() {
                style = style.fg(self.theme.error);
            }
            if selected {
                style = style.fg(self.theme.selected);
            }
            if rank == pos.entry {
                style = style.add_modifier(Modifier::REVERSED);
            }
            lines.push(Line::styled(truncate_to_width(&text, width), style));
        }
        lines
    }

    fn footer_text(&self) -> String {
        match &self.current {
            None => "Waiting for root directory...".to_string(),
            Some(dir) => {
                let attrs = dir.attr();
                let message = if self.listing {
                    " [listing in progress]"
                } else {
                    ""
                };
                format!(
                    "Total usage: {}, Objects: {}, sorted by {}{message}",
                    format_size(attrs.size, self.human_readable),
                    format_count(attrs.count, self.human_readable),
                    self.sort.key,
                )
            }
        }
    }

    fn render_popup(&self, frame: &mut Frame, area: Rect) {
        let Some(popup) = &self.popup else {
            return;
        };

        let menu_width = popup
            .menu
            .map(|menu| menu.options.iter().map(|o| o.width() + 4).sum())
            .unwrap_or(0);
        let text_width = popup
            .text
            .iter()
            .map(|line| line.width())
            .max()
            .unwrap_or(0);
        let inner_width = text_width
            .max(menu_width)
            .max(10)
            .min(area.width.saturating_sub(4) as usize) as u16;
        let menu_rows = u16::from(popup.menu.is_some());
        let inner_height =
            (popup.text.len() as u16 + menu_rows).min(area.height.saturating_sub(4));

        let rect = centered_rect(area, inner_width + 2, inner_height + 2);
        frame.render_widget(Clear, rect);

        let base = Style::default()
            .fg(self.theme.popup_fg)
            .bg(self.theme.popup_bg);
        let block = Block::bordered().style(base);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let mut lines: Vec<Line> = Vec::with_capacity(popup.text.len() + 1);
        for (i, text) in popup.text.iter().enumerate() {
            let style = if i == 0 {
                Style::default()
                    .fg(self.theme.popup_title)
                    .bg(self.theme.popup_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                base
            };
            lines.push(Line::styled(
                truncate_to_width(text, inner.width as usize),
                style,
            ));
        }
        if let Some(menu) = popup.menu {
            let mut spans = Vec::new();
            let pad = (inner.width as usize).saturating_sub(menu_width) / 2;
            spans.push(Span::raw(" ".repeat(pad)));
            for (i, option) in menu.options.iter().enumerate() {
                let style = if i == menu.selected {
                    base.add_modifier(Modifier::REVERSED)
                } else {
                    base
                };
                spans.push(Span::raw(" "));
                spans.push(Span::styled(format!("<{option}>"), style));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Size of the largest entry in the listing, for scaling the graph.
    fn biggest_entry(&self) -> u64 {
        self.rows.iter().map(|row| row.attrs.size).max().unwrap_or(0)
    }

    /// Whether the listing contains an empty directory (enables the `e`
    /// flag column).
    fn has_empty_dir(&self) -> bool {
        self.rows
            .iter()
            .any(|row| row.attrs.is_dir && row.attrs.count == 0)
    }
}

fn pad_with(text: &str, pad: char, width: usize) -> String {
    let mut out = truncate_to_width(text, width);
    let mut current = out.width();
    while current < width {
        out.push(pad);
        current += 1;
    }
    out
}

fn truncate_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
