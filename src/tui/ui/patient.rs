//! Patient screen: verified identity, clinical history and new-event form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::domain::{ClinicalEvent, IdentityRecord};
use crate::tui::styles::MedicalTheme;

use super::{render_header, render_key_hints, Notice, TextInput};

/// State for a recognised patient.
#[derive(Default)]
pub struct PatientViewState {
    pub record: Option<IdentityRecord>,
    pub history: Vec<ClinicalEvent>,
    pub input: TextInput,
    pub notice: Option<Notice>,
}

impl PatientViewState {
    /// Show a freshly resolved identity.
    pub fn load(&mut self, record: IdentityRecord, history: Vec<ClinicalEvent>) {
        self.record = Some(record);
        self.history = history;
        self.input.clear();
        self.notice = None;
    }

    /// Drop the identity and history from UI state.
    pub fn clear_sensitive(&mut self) {
        self.record = None;
        self.history.clear();
        self.input.clear();
        self.notice = None;
    }
}

pub fn render_patient(f: &mut Frame, area: Rect, state: &PatientViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Identity
            Constraint::Min(5),    // History
            Constraint::Length(3), // New event
            Constraint::Length(1), // Notice
            Constraint::Length(3), // Key hints
        ])
        .split(area);

    render_header(f, chunks[0], "Ficha Clínica");
    render_identity(f, chunks[1], state.record.as_ref());
    render_history(f, chunks[2], &state.history);
    render_event_input(f, chunks[3], &state.input);

    if let Some(notice) = &state.notice {
        f.render_widget(Paragraph::new(notice.line()), chunks[4]);
    }

    render_key_hints(
        f,
        chunks[5],
        &[
            ("Enter", "Guardar en Ficha"),
            ("Esc", "Nuevo escaneo"),
            ("F2", "Auditoría"),
            ("Ctrl+Q", "Salir"),
        ],
    );
}

fn render_identity(f: &mut Frame, area: Rect, record: Option<&IdentityRecord>) {
    let lines = match record {
        Some(record) => vec![
            Line::from(vec![
                Span::styled("✓ Identidad Verificada: ", MedicalTheme::success()),
                Span::styled(record.display_name.as_str(), MedicalTheme::title()),
            ]),
            Line::from(vec![
                Span::styled("ID Anónimo: ", MedicalTheme::text_secondary()),
                Span::styled(
                    format!("...{}", record.anonymized_id.short()),
                    MedicalTheme::text_muted(),
                ),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "Sin identidad cargada.",
            MedicalTheme::text_muted(),
        ))],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_history(f: &mut Frame, area: Rect, history: &[ClinicalEvent]) {
    let block = Block::default()
        .title(Span::styled(" Historial Clínico ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    if history.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "Ficha clínica nueva.",
            MedicalTheme::info(),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    // Newest entries stay visible when the table overflows.
    let visible = usize::from(area.height.saturating_sub(3));
    let skip = history.len().saturating_sub(visible);

    let rows = history.iter().skip(skip).map(|event| {
        Row::new(vec![
            Cell::from(event.timestamp.as_str()).style(MedicalTheme::text_secondary()),
            Cell::from(event.detail.as_str()).style(MedicalTheme::text()),
        ])
    });

    let table = Table::new(rows, [Constraint::Length(14), Constraint::Min(10)])
        .header(Row::new(vec!["Fecha", "Detalle"]).style(MedicalTheme::header()))
        .block(block);

    f.render_widget(table, area);
}

fn render_event_input(f: &mut Frame, area: Rect, input: &TextInput) {
    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        input.display("Diagnóstico / Procedimiento"),
        Span::styled("▌", MedicalTheme::cursor()),
    ]))
    .block(
        Block::default()
            .title(Span::styled(" Agregar registro médico ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );

    f.render_widget(content, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnonymizedId;

    #[test]
    fn test_load_then_clear() {
        let mut state = PatientViewState::default();
        state.input.push('x');
        state.load(
            IdentityRecord::new("Juan Perez", AnonymizedId::generate()),
            vec![ClinicalEvent::new("05/03 09:30", "Fractura de brazo")],
        );

        assert!(state.input.is_empty());
        assert_eq!(state.history.len(), 1);

        state.clear_sensitive();
        assert!(state.record.is_none());
        assert!(state.history.is_empty());
    }
}
