use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::analytics::{AlertState, PriceShare, Waiting};
use crate::model::tick::Tick;

pub struct StatusBar<'a> {
    pub catalog: &'a [String],
    pub selected: &'a [String],
    pub paused: bool,
    pub collected: u64,
    pub buffered: usize,
    pub capacity: usize,
    pub cycles: u64,
    pub threshold: f64,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let pause_status = if self.paused {
            Span::styled(" PAUSED ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            Span::styled(" RUNNING ", Style::default().fg(Color::Green))
        };

        let mut spans = vec![
            Span::styled(
                " spread-monitor ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
        ];
        for (i, symbol) in self.catalog.iter().enumerate() {
            let style = if self.selected.contains(symbol) {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
            };
            spans.push(Span::styled(format!("{}:{} ", i + 1, symbol), style));
        }
        spans.extend([
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            pause_status,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!(
                    "points: {} ({}/{})",
                    self.collected, self.buffered, self.capacity
                ),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("cycles: {}", self.cycles),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("|z| > {:.1}", self.threshold),
                Style::default().fg(Color::Yellow),
            ),
        ]);

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

/// Alert, warm-up or steady-state line above the charts.
pub struct AlertBanner<'a> {
    pub alert: Option<&'a AlertState>,
    pub waiting: Option<&'a Waiting>,
}

impl Widget for AlertBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (text, color, border) = match (self.alert, self.waiting) {
            (Some(alert), _) if alert.triggered => {
                (format!("🚨 {}", alert.message), Color::Red, Color::Red)
            }
            (Some(alert), _) => (alert.message.clone(), Color::Green, Color::DarkGray),
            (None, Some(waiting)) => (waiting.to_string(), Color::Blue, Color::DarkGray),
            (None, None) => ("Starting…".to_string(), Color::DarkGray, Color::DarkGray),
        };

        let block = Block::default()
            .title(" Status ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));

        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .block(block)
        .render(area, buf);
    }
}

/// Latest pair prices and their share of the pair total.
pub struct PriceSharePanel<'a> {
    shares: &'a [PriceShare],
}

impl<'a> PriceSharePanel<'a> {
    pub fn new(shares: &'a [PriceShare]) -> Self {
        Self { shares }
    }
}

const SHARE_COLORS: [Color; 2] = [Color::Yellow, Color::Magenta];

impl Widget for PriceSharePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Price Distribution (Latest) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let bar_width = block.inner(area).width.saturating_sub(8) as f64;

        let lines: Vec<Line> = if self.shares.is_empty() {
            vec![Line::from(Span::styled(
                "---",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.shares
                .iter()
                .enumerate()
                .flat_map(|(i, share)| {
                    let color = SHARE_COLORS[i % SHARE_COLORS.len()];
                    let filled = ((share.share_pct / 100.0) * bar_width).round() as usize;
                    [
                        Line::from(vec![
                            Span::styled(
                                format!("{:<9}", share.symbol),
                                Style::default().fg(color).add_modifier(Modifier::BOLD),
                            ),
                            Span::styled(
                                format!(" {:.2}", share.price),
                                Style::default().fg(Color::White),
                            ),
                        ]),
                        Line::from(vec![
                            Span::styled("█".repeat(filled), Style::default().fg(color)),
                            Span::styled(
                                format!(" {:.1}%", share.share_pct),
                                Style::default().fg(Color::DarkGray),
                            ),
                        ]),
                    ]
                })
                .collect()
        };

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// Most recent raw ticks, newest last.
pub struct TickTablePanel<'a> {
    ticks: &'a [Tick],
}

impl<'a> TickTablePanel<'a> {
    pub fn new(ticks: &'a [Tick]) -> Self {
        Self { ticks }
    }
}

impl Widget for TickTablePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::from(Span::styled(
            format!("{:<12} {:<9} {:>12}", "time", "symbol", "price"),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::UNDERLINED),
        ))];
        for tick in self.ticks {
            let time = tick
                .observed_at()
                .map(|t| t.format("%H:%M:%S%.3f").to_string())
                .unwrap_or_else(|| "--:--:--".to_string());
            lines.push(Line::from(vec![
                Span::styled(format!("{:<12} ", time), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<9} ", tick.symbol), Style::default().fg(Color::Cyan)),
                Span::styled(format!("{:>12.2}", tick.price), Style::default().fg(Color::White)),
            ]));
        }

        let block = Block::default()
            .title(" Live Tick Data ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = area.height.saturating_sub(2) as usize;
        let start = self.messages.len().saturating_sub(visible);
        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|msg| {
                let color = if msg.starts_with("[ERR]") {
                    Color::Red
                } else if msg.starts_with("[WARN]") {
                    Color::Yellow
                } else if msg.starts_with("[ALERT]") {
                    Color::Magenta
                } else {
                    Color::Gray
                };
                Line::from(Span::styled(msg.as_str(), Style::default().fg(color)))
            })
            .collect();

        let block = Block::default()
            .title(" System Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        // One row per message; long lines are clipped so the newest stay visible.
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" [Q]", Style::default().fg(Color::Yellow)),
            Span::styled("uit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[P]", Style::default().fg(Color::Yellow)),
            Span::styled("ause  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[R]", Style::default().fg(Color::Yellow)),
            Span::styled("esume  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[+/-]", Style::default().fg(Color::Yellow)),
            Span::styled(" threshold  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[1-9]", Style::default().fg(Color::Yellow)),
            Span::styled(" toggle symbol  ", Style::default().fg(Color::DarkGray)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
