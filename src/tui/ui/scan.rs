//! Scan screen: capture biometric input.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::{CaptureInput, CaptureMode};
use crate::tui::styles::MedicalTheme;

use super::{render_header, render_key_hints, Notice, TextInput};

/// Scan screen state.
#[derive(Default)]
pub struct ScanState {
    pub mode: CaptureMode,
    pub input: TextInput,
    pub notice: Option<Notice>,
    pub identity_count: usize,
}

impl ScanState {
    /// Switch capture mode, discarding anything typed so far.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
        self.input.clear();
        self.input.set_masked(self.mode == CaptureMode::ManualCode);
        self.notice = None;
    }

    /// Turn the typed text into captured input and wipe the buffer.
    ///
    /// # Errors
    /// Returns a message if nothing was typed or the photo cannot be read.
    pub fn take_capture(&mut self) -> Result<CaptureInput, String> {
        if self.input.is_empty() {
            return Err(match self.mode {
                CaptureMode::PhotoFile => "Ingresa la ruta de la foto.".to_string(),
                CaptureMode::ManualCode => "Ingresa el código simulado.".to_string(),
            });
        }

        let capture = match self.mode {
            CaptureMode::PhotoFile => CaptureInput::from_photo_file(self.input.value().trim())
                .map_err(|e| format!("No se pudo leer la foto: {e}")),
            CaptureMode::ManualCode => Ok(CaptureInput::ManualCode(self.input.value().to_string())),
        };

        self.input.clear();
        capture
    }
}

pub fn render_scan(f: &mut Frame, area: Rect, state: &ScanState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Mode selector
            Constraint::Length(3), // Input
            Constraint::Min(0),    // Status
            Constraint::Length(3), // Key hints
        ])
        .split(area);

    render_header(f, chunks[0], "Sistema de Trazabilidad Biométrica");
    render_mode_selector(f, chunks[1], state.mode);
    render_input(f, chunks[2], state);
    render_status(f, chunks[3], state);
    render_key_hints(
        f,
        chunks[4],
        &[
            ("Tab", "Cambiar modo"),
            ("Enter", "Escanear"),
            ("F2", "Auditoría"),
            ("Ctrl+Q", "Salir"),
        ],
    );
}

fn render_mode_selector(f: &mut Frame, area: Rect, mode: CaptureMode) {
    let option = |m: CaptureMode| {
        if m == mode {
            Span::styled(format!(" ◉ {} ", m.label()), MedicalTheme::subtitle())
        } else {
            Span::styled(format!(" ○ {} ", m.label()), MedicalTheme::text_muted())
        }
    };

    let selector = Paragraph::new(Line::from(vec![
        option(CaptureMode::PhotoFile),
        option(CaptureMode::ManualCode),
    ]))
    .block(
        Block::default()
            .title(Span::styled(" Modo de Escaneo ", MedicalTheme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(selector, area);
}

fn render_input(f: &mut Frame, area: Rect, state: &ScanState) {
    let (title, hint) = match state.mode {
        CaptureMode::PhotoFile => (" Escáner Biométrico ", "ruta a una foto del dedo o la mano"),
        CaptureMode::ManualCode => (" Código simulado (PIN) ", "escribe el código"),
    };

    let input = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        state.input.display(hint),
        Span::styled("▌", MedicalTheme::cursor()),
    ]))
    .block(
        Block::default()
            .title(Span::styled(title, MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );

    f.render_widget(input, area);
}

fn render_status(f: &mut Frame, area: Rect, state: &ScanState) {
    let mut lines = vec![Line::from(vec![Span::styled(
        "Esperando lectura biométrica para iniciar...",
        MedicalTheme::info(),
    )])];

    if let Some(notice) = &state.notice {
        lines.push(Line::from(""));
        lines.push(notice.line());
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Identidades registradas: ", MedicalTheme::text_secondary()),
        Span::styled(state.identity_count.to_string(), MedicalTheme::text()),
    ]));

    let status = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(status, area);
}
