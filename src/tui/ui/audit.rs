//! Audit screen: read-only dump of the clinical ledger.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::LedgerSnapshot;
use crate::tui::styles::MedicalTheme;

use super::{render_header, render_key_hints};

/// Audit screen state.
#[derive(Debug, Default)]
pub struct AuditViewState {
    pub json: String,
    pub identity_count: usize,
    pub event_count: usize,
    pub scroll: u16,
    pub error: Option<String>,
}

impl AuditViewState {
    /// Replace the dump with a fresh snapshot.
    pub fn load(&mut self, snapshot: &LedgerSnapshot, json: String) {
        self.identity_count = snapshot.identity_count();
        self.event_count = snapshot.event_count();
        self.json = json;
        self.scroll = 0;
        self.error = None;
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max = u16::try_from(self.json.lines().count()).unwrap_or(u16::MAX);
        if self.scroll.saturating_add(1) < max {
            self.scroll += 1;
        }
    }
}

pub fn render_audit(f: &mut Frame, area: Rect, state: &AuditViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(2), // Summary
            Constraint::Min(5),    // Dump
            Constraint::Length(3), // Key hints
        ])
        .split(area);

    render_header(f, chunks[0], "Vista de Auditoría (Privacidad)");

    let summary = match &state.error {
        Some(e) => Line::from(Span::styled(e.as_str(), MedicalTheme::danger())),
        None => Line::from(vec![
            Span::styled("Identidades: ", MedicalTheme::text_secondary()),
            Span::styled(state.identity_count.to_string(), MedicalTheme::text()),
            Span::styled("  Eventos: ", MedicalTheme::text_secondary()),
            Span::styled(state.event_count.to_string(), MedicalTheme::text()),
            Span::styled(
                "  (sin nombres ni huellas)",
                MedicalTheme::text_muted(),
            ),
        ]),
    };
    f.render_widget(Paragraph::new(summary), chunks[1]);

    let dump = Paragraph::new(state.json.as_str())
        .style(MedicalTheme::text())
        .scroll((state.scroll, 0))
        .block(
            Block::default()
                .title(Span::styled(" Libro Clínico ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        );
    f.render_widget(dump, chunks[2]);

    render_key_hints(
        f,
        chunks[3],
        &[
            ("↑/↓", "Desplazar"),
            ("F2", "Actualizar"),
            ("Esc", "Volver"),
            ("Ctrl+Q", "Salir"),
        ],
    );
}
