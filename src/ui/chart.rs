use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

/// Horizontal reference line drawn behind the series.
#[derive(Debug, Clone, Copy)]
pub struct Guide {
    pub value: f64,
    pub color: Color,
}

/// Dot plot of the most recent values that fit the panel width.
pub struct SeriesChart<'a> {
    title: &'a str,
    values: &'a [f64],
    color: Color,
    guides: Vec<Guide>,
    precision: usize,
    placeholder: Option<&'a str>,
}

impl<'a> SeriesChart<'a> {
    pub fn new(title: &'a str, values: &'a [f64]) -> Self {
        Self {
            title,
            values,
            color: Color::Cyan,
            guides: Vec::new(),
            precision: 2,
            placeholder: None,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn guide(mut self, value: f64, color: Color) -> Self {
        self.guides.push(Guide { value, color });
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Text shown instead of the plot while there is nothing to draw.
    pub fn placeholder(mut self, text: Option<&'a str>) -> Self {
        self.placeholder = text;
        self
    }
}

fn row_for(value: f64, min: f64, range: f64, chart_height: usize) -> usize {
    let normalized = ((value - min) / range).clamp(0.0, 1.0);
    chart_height - 1 - ((normalized * (chart_height - 1) as f64) as usize).min(chart_height - 1)
}

impl Widget for SeriesChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" {} ", self.title);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 || inner.width < 4 {
            return;
        }
        if self.values.is_empty() {
            if let Some(text) = self.placeholder {
                buf.set_stringn(
                    inner.x,
                    inner.y,
                    text,
                    inner.width as usize,
                    Style::default().fg(Color::DarkGray),
                );
            }
            return;
        }

        let chart_height = inner.height as usize;
        let chart_width = inner.width as usize;

        let visible = if self.values.len() > chart_width {
            &self.values[self.values.len() - chart_width..]
        } else {
            self.values
        };

        let guide_values = self.guides.iter().map(|g| g.value);
        let min_v = visible
            .iter()
            .copied()
            .chain(guide_values.clone())
            .fold(f64::INFINITY, f64::min);
        let max_v = visible
            .iter()
            .copied()
            .chain(guide_values)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = max_v - min_v;
        let range = if range < 1e-9 { 1.0 } else { range };

        for guide in &self.guides {
            let y = inner.y + row_for(guide.value, min_v, range, chart_height) as u16;
            for x in inner.x..inner.x + inner.width {
                buf.set_string(x, y, "·", Style::default().fg(guide.color));
            }
        }

        for (i, &value) in visible.iter().enumerate() {
            let x = inner.x + i as u16;
            if x >= inner.x + inner.width {
                break;
            }
            let y = inner.y + row_for(value, min_v, range, chart_height) as u16;
            buf.set_string(x, y, "●", Style::default().fg(self.color));
        }

        // Axis labels
        let max_label = format!("{:.*}", self.precision, max_v);
        let min_label = format!("{:.*}", self.precision, min_v);
        buf.set_string(inner.x, inner.y, &max_label, Style::default().fg(Color::DarkGray));
        buf.set_string(
            inner.x,
            inner.y + inner.height - 1,
            &min_label,
            Style::default().fg(Color::DarkGray),
        );
    }
}
