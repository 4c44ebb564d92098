use std::io::{self, Stdout, Write};

use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use humansize::{format_size, DECIMAL};
use ratatui::{
    backend::CrosstermBackend,
    prelude::*,
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, Gauge, GraphType, Paragraph, Row, Table},
    Terminal,
};

use super::dashboard::{BarPanel, DashboardView, LinePanel, Panel, PlotStyle};
use super::surface::RenderSurface;
use super::theme::{self, Palette};
use crate::error::{GtopError, Result};

type Backend = CrosstermBackend<Stdout>;

/// Render surface on stdout
///
/// Text lines go straight to stdout. The first plot frame switches to the
/// alternate screen, which is left again when the surface is dropped. Raw
/// mode is never enabled, so Ctrl+C still reaches the signal handler.
pub struct TerminalSurface {
    terminal: Option<Terminal<Backend>>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self { terminal: None }
    }

    fn terminal(&mut self) -> Result<&mut Terminal<Backend>> {
        let terminal = match self.terminal.take() {
            Some(terminal) => terminal,
            None => {
                let mut stdout = io::stdout();
                execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
                Terminal::new(CrosstermBackend::new(stdout))
                    .map_err(|e| GtopError::tui(format!("Failed to create terminal: {}", e)))?
            }
        };
        Ok(self.terminal.insert(terminal))
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for TerminalSurface {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()?;
        Ok(())
    }

    fn render(&mut self, view: &DashboardView, style: &PlotStyle) -> Result<()> {
        self.terminal()?
            .draw(|frame| draw_dashboard(frame, view, style))
            .map_err(|e| GtopError::tui(format!("Failed to draw dashboard: {}", e)))?;
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if let Some(mut terminal) = self.terminal.take() {
            let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show);
        }
    }
}

/// Draw one dashboard frame
pub fn draw_dashboard(frame: &mut Frame, view: &DashboardView, style: &PlotStyle) {
    let palette = theme::palette(style.theme);
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // Device banner
            Constraint::Percentage(50), // Plots
            Constraint::Min(3),         // Processes
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(view.banner.as_str()).style(
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        ),
        chunks[0],
    );

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_panel(frame, panels[0], &view.utilization, style, &palette);
    render_panel(frame, panels[1], &view.throughput, style, &palette);
    render_processes(frame, chunks[2], view, &palette);
}

fn panel_block<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(palette.text),
        ))
}

fn render_panel(frame: &mut Frame, area: Rect, panel: &Panel, style: &PlotStyle, palette: &Palette) {
    match panel {
        Panel::Lines(lines) => render_lines(frame, area, lines, style, palette),
        Panel::Bars(bars) => render_bars(frame, area, bars, palette),
    }
}

fn axis_labels(bounds: [f64; 2]) -> Vec<String> {
    let [low, high] = bounds;
    let precision = if (high - low).abs() < 10.0 { 1 } else { 0 };
    [low, (low + high) / 2.0, high]
        .iter()
        .map(|v| format!("{:.*}", precision, v))
        .collect()
}

fn render_lines(frame: &mut Frame, area: Rect, panel: &LinePanel, style: &PlotStyle, palette: &Palette) {
    let marker = theme::marker(style.marker);

    let datasets: Vec<Dataset> = panel
        .series
        .iter()
        .zip([palette.primary, palette.secondary])
        .map(|(series, color)| {
            Dataset::default()
                .name(series.label)
                .marker(marker)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(&series.points)
        })
        .collect();

    let axis_style = Style::default().fg(palette.axis);
    let chart = Chart::new(datasets)
        .block(panel_block(panel.y_label, palette))
        .x_axis(
            Axis::default()
                .title("Time (s)")
                .style(axis_style)
                .bounds(panel.x_bounds)
                .labels(axis_labels(panel.x_bounds)),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds(panel.y_bounds)
                .labels(axis_labels(panel.y_bounds)),
        );

    frame.render_widget(chart, area);
}

fn render_bars(frame: &mut Frame, area: Rect, panel: &BarPanel, palette: &Palette) {
    let block = panel_block(panel.y_label, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if panel.bars.is_empty() {
        return;
    }

    let count = panel.bars.len() as u32;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(vec![Constraint::Ratio(1, count); panel.bars.len()])
        .split(inner);

    for (bar, row) in panel.bars.iter().zip(rows.iter()) {
        let ratio = if panel.max > 0.0 {
            (bar.value / panel.max).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let gauge = Gauge::default()
            .gauge_style(
                Style::default()
                    .fg(theme::level_color(ratio * 100.0))
                    .bg(Color::Black),
            )
            .ratio(ratio)
            .label(format!("{} {:.1} {}", bar.label, bar.value, panel.unit));

        frame.render_widget(gauge, *row);
    }
}

fn render_processes(frame: &mut Frame, area: Rect, view: &DashboardView, palette: &Palette) {
    let block = panel_block("GPU Processes", palette);

    if view.processes.is_empty() {
        frame.render_widget(
            Paragraph::new("No Compute Running Processes")
                .style(Style::default().fg(palette.text))
                .block(block),
            area,
        );
        return;
    }

    let header = Row::new(["PID", "USER", "GPU MEM", "CPU", "HOST MEM", "COMMAND"]).style(
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = view
        .processes
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.pid.to_string()),
                Cell::from(p.user.clone()),
                Cell::from(format!(
                    "{:.0}MB ({:.0}%)",
                    p.gpu_memory_used,
                    p.gpu_memory_percent(view.memory_total)
                )),
                Cell::from(format!("{:.1}%", p.cpu_percent)),
                Cell::from(format_size(p.host_memory_used, DECIMAL)),
                Cell::from(p.command.clone()),
            ])
            .style(Style::default().fg(palette.text))
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Min(10),
    ];

    frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
}
