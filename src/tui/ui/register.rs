//! Register screen: enrol an unrecognised biometric digest.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::BiometricDigest;
use crate::tui::styles::MedicalTheme;

use super::{render_header, render_key_hints, Notice, TextInput};

/// State for the new-patient form.
#[derive(Default)]
pub struct RegisterFormState {
    pub digest: Option<BiometricDigest>,
    pub name: TextInput,
    pub notice: Option<Notice>,
}

impl RegisterFormState {
    /// Start a fresh form for an unrecognised digest.
    pub fn load(&mut self, digest: BiometricDigest) {
        self.digest = Some(digest);
        self.name.clear();
        self.notice = None;
    }

    pub fn clear_sensitive(&mut self) {
        self.digest = None;
        self.name.clear();
        self.notice = None;
    }
}

pub fn render_register(f: &mut Frame, area: Rect, state: &RegisterFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Warning
            Constraint::Length(3), // Name
            Constraint::Min(2),    // Notice
            Constraint::Length(3), // Key hints
        ])
        .split(area);

    render_header(f, chunks[0], "Registrar Nuevo Paciente");

    let digest_line = match &state.digest {
        Some(d) => Line::from(vec![
            Span::styled("Huella: ", MedicalTheme::text_secondary()),
            Span::styled(format!("{}…", d.prefix()), MedicalTheme::text_muted()),
        ]),
        None => Line::from(""),
    };

    let warning = Paragraph::new(vec![
        Line::from(Span::styled(
            "⚠ Biometría no reconocida",
            MedicalTheme::warning(),
        )),
        digest_line,
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(warning, chunks[1]);

    let name = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        state.name.display("Nombre Completo"),
        Span::styled("▌", MedicalTheme::cursor()),
    ]))
    .block(
        Block::default()
            .title(Span::styled(" Nombre Completo ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );
    f.render_widget(name, chunks[2]);

    if let Some(notice) = &state.notice {
        f.render_widget(Paragraph::new(notice.line()), chunks[3]);
    }

    render_key_hints(
        f,
        chunks[4],
        &[
            ("Enter", "Registrar Identidad"),
            ("Esc", "Cancelar"),
            ("Ctrl+Q", "Salir"),
        ],
    );
}
