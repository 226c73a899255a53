//! UI module: View components for the TUI.

pub mod audit;
pub mod patient;
pub mod register;
pub mod scan;

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use zeroize::Zeroize;

use crate::tui::styles::{MedicalTheme, LOGO_SMALL};

/// Single-line text input buffer.
///
/// Masked inputs render as bullets. Buffers are zeroized when cleared so
/// typed codes and names do not linger in UI state.
#[derive(Default)]
pub struct TextInput {
    value: String,
    masked: bool,
}

impl TextInput {
    #[must_use]
    pub fn masked() -> Self {
        Self {
            value: String::new(),
            masked: true,
        }
    }

    pub fn set_masked(&mut self, masked: bool) {
        self.masked = masked;
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.value.push(c);
        }
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    /// Wipe and empty the buffer.
    pub fn clear(&mut self) {
        self.value.zeroize();
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Text to draw: bullets when masked, the hint when empty.
    #[must_use]
    pub fn display<'a>(&'a self, hint: &'a str) -> Span<'a> {
        if self.value.is_empty() {
            Span::styled(hint, MedicalTheme::text_muted())
        } else if self.masked {
            Span::styled("•".repeat(self.value.chars().count()), MedicalTheme::text())
        } else {
            Span::styled(self.value.as_str(), MedicalTheme::text())
        }
    }
}

impl Drop for TextInput {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

/// One-line status message shown under a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(t) | Self::Warning(t) | Self::Error(t) => t,
        }
    }

    #[must_use]
    pub fn style(&self) -> Style {
        match self {
            Self::Success(_) => MedicalTheme::success(),
            Self::Warning(_) => MedicalTheme::warning(),
            Self::Error(_) => MedicalTheme::danger(),
        }
    }

    #[must_use]
    pub fn line(&self) -> Line<'_> {
        let marker = match self {
            Self::Success(_) => "✓ ",
            Self::Warning(_) => "⚠ ",
            Self::Error(_) => "! ",
        };
        Line::from(vec![
            Span::styled(marker, self.style()),
            Span::styled(self.text(), self.style()),
        ])
    }
}

/// Render a screen header with the product name and a subtitle.
pub fn render_header(f: &mut Frame, area: Rect, subtitle: &str) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(LOGO_SMALL, MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(subtitle.to_string(), MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

/// Render a row of `[key] description` hints.
pub fn render_key_hints(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!("[{key}] "), MedicalTheme::key_hint()),
                Span::styled(format!("{desc}  "), MedicalTheme::key_desc()),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DEMO: el reconocimiento compara exactamente un SHA-256 de los bytes capturados, no es biometría real.",
            MedicalTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Los registros viven en memoria y se descartan al salir.",
            MedicalTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_editing() {
        let mut input = TextInput::default();
        input.push('A');
        input.push('n');
        input.push('\u{7}');
        input.push('a');
        assert_eq!(input.value(), "Ana");

        input.pop();
        assert_eq!(input.value(), "An");

        input.clear();
        assert!(input.is_empty());
    }

    #[test]
    fn test_masked_display_hides_value() {
        let mut input = TextInput::masked();
        input.push('4');
        input.push('2');
        assert_eq!(input.display("hint").content, "••");

        input.set_masked(false);
        assert_eq!(input.display("hint").content, "42");

        input.clear();
        assert_eq!(input.display("hint").content, "hint");
    }

    #[test]
    fn test_notice_text() {
        let notice = Notice::Error("Debes ingresar un nombre.".to_string());
        assert_eq!(notice.text(), "Debes ingresar un nombre.");
        assert_eq!(notice.style(), MedicalTheme::danger());
    }
}
