use std::collections::VecDeque;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use disgate::geo;

use crate::gateway::{EntityInfo, GatewayStats};

const MAX_LOG_LINES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn color(self) -> Color {
        match self {
            LogLevel::Info => Color::White,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }
}

#[derive(Debug, Default)]
pub struct TuiState {
    logs: VecDeque<(LogLevel, String)>,
    scroll: usize,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message.into());
    }

    pub fn log_warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message.into());
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message.into());
    }

    fn push(&mut self, level: LogLevel, message: String) {
        if self.logs.len() == MAX_LOG_LINES {
            self.logs.pop_front();
        }
        self.logs.push_back((level, message));
    }

    pub fn scroll_up(&mut self) {
        self.scroll = (self.scroll + 5).min(self.logs.len().saturating_sub(1));
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_sub(5);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = 0;
    }
}

pub fn render(frame: &mut Frame, state: &TuiState, stats: &GatewayStats, entities: &[EntityInfo]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(6),
            Constraint::Length(8),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], stats);
    render_network(frame, chunks[1], stats);
    render_entities(frame, chunks[2], entities);
    render_log(frame, chunks[3], state);
    render_help(frame, chunks[4]);
}

fn render_header(frame: &mut Frame, area: Rect, stats: &GatewayStats) {
    let title = format!(" DIS Gateway - Uptime: {} ", format_duration(stats.uptime_secs));

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let text = format!(
        "Tick: {}  |  Entities: {}  |  Templates: {}",
        stats.tick, stats.entity_count, stats.catalog_size
    );

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn render_network(frame: &mut Frame, area: Rect, stats: &GatewayStats) {
    let block = Block::default()
        .title(" Network ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let net = &stats.client;
    let drop_percent = net.drop_percent();
    let lines = vec![
        Line::from(vec![
            Span::styled("Datagrams: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!(
                    "{} recv ({})",
                    net.datagrams_received,
                    format_bytes(net.bytes_received)
                ),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("PDUs: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!(
                    "{} applied / {} ignored",
                    net.pdus_dispatched, net.pdus_ignored
                ),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Entities: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!(
                    "{} created / {} evicted",
                    net.entities_created, net.entities_evicted
                ),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Dropped: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!(
                    "{} malformed / {} oversize ({:.1}%)",
                    net.datagrams_dropped, net.datagrams_oversize, drop_percent
                ),
                Style::default().fg(if drop_percent > 5.0 {
                    Color::Red
                } else {
                    Color::White
                }),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_entities(frame: &mut Frame, area: Rect, entities: &[EntityInfo]) {
    let block = Block::default()
        .title(format!(" Entities ({}) ", entities.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let header = Row::new(vec!["Id", "Template", "Marking", "DR", "Lat", "Lon", "Age"])
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let rows = entities.iter().map(|entity| {
        let (lat, lon) = match entity.position {
            Some(position) => {
                let (lat, lon) = geo::geocentric_to_lat_lon(position);
                (
                    format!("{:.4}", lat.to_degrees()),
                    format!("{:.4}", lon.to_degrees()),
                )
            }
            None => ("-".to_string(), "-".to_string()),
        };
        let model_style = if entity.model.is_implemented() {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        Row::new(vec![
            entity.id.to_string(),
            entity.template.clone(),
            entity.marking.clone(),
            entity.model.to_string(),
            lat,
            lon,
            format!("{:.1}s", entity.age_secs),
        ])
        .style(model_style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

fn render_log(frame: &mut Frame, area: Rect, state: &TuiState) {
    let block = Block::default()
        .title(" Log ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    let visible = area.height.saturating_sub(2) as usize;
    let end = state.logs.len().saturating_sub(state.scroll);
    let start = end.saturating_sub(visible);

    let lines: Vec<Line> = state
        .logs
        .range(start..end)
        .map(|(level, message)| {
            Line::from(Span::styled(
                message.as_str(),
                Style::default().fg(level.color()),
            ))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Controls ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let text = Paragraph::new("q/ESC quit  |  PgUp/PgDn scroll log  |  End follow log")
        .block(block)
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        );

    frame.render_widget(text, area);
}

fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{}B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1}MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded() {
        let mut state = TuiState::new();
        for i in 0..MAX_LOG_LINES + 10 {
            state.log_info(format!("line {i}"));
        }

        assert_eq!(state.logs.len(), MAX_LOG_LINES);
        assert_eq!(state.logs.front().unwrap().1, "line 10");
    }

    #[test]
    fn scroll_stays_within_log() {
        let mut state = TuiState::new();
        state.log_warn("one");
        state.log_error("two");

        state.scroll_up();
        assert_eq!(state.scroll, 1);
        state.scroll_down();
        assert_eq!(state.scroll, 0);
    }

    #[test]
    fn durations_and_sizes_format() {
        assert_eq!(format_duration(3725), "01:02:05");
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(2048), "2.0KB");
    }
}
