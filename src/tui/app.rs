//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation driven by the session state
//! - Input event handling
//! - Service integration

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::memory::{InMemoryLedger, InMemoryRegistry};
use crate::application::{AuditService, SessionService, SessionState};
use crate::config::ShellConfig;
use crate::domain::BiometricDigest;

use super::ui::{
    audit::{render_audit, AuditViewState},
    patient::{render_patient, PatientViewState},
    register::{render_register, RegisterFormState},
    render_disclaimer,
    scan::{render_scan, ScanState},
    Notice,
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Scan,
    Patient,
    Register,
    Audit,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Recognition, registration and event entry
    session: SessionService<InMemoryRegistry, InMemoryLedger>,

    /// Read-only ledger dump
    audit: AuditService<InMemoryLedger>,

    /// Digest of the last capture; `None` while awaiting input
    current_digest: Option<BiometricDigest>,

    /// Screen to restore when leaving the audit view
    audit_return: Screen,

    scan_state: ScanState,
    patient_state: PatientViewState,
    register_state: RegisterFormState,
    audit_state: AuditViewState,
}

impl App {
    /// Create a new application with fresh in-memory stores.
    ///
    /// For more control, use `with_dependencies()`.
    ///
    /// # Errors
    /// Returns error if services cannot be initialized.
    pub fn new(config: &ShellConfig) -> Result<Self> {
        let registry = Arc::new(InMemoryRegistry::new());
        let ledger = Arc::new(InMemoryLedger::new().timestamp_format(&config.timestamp_format));

        let session = SessionService::new(registry, Arc::clone(&ledger));
        let audit = AuditService::new(ledger);

        Ok(Self::with_dependencies(session, audit))
    }

    /// Create application with injected services.
    ///
    /// The session and audit services must share the same ledger.
    #[must_use]
    pub fn with_dependencies(
        session: SessionService<InMemoryRegistry, InMemoryLedger>,
        audit: AuditService<InMemoryLedger>,
    ) -> Self {
        let mut app = Self {
            screen: Screen::Scan,
            should_quit: false,
            session,
            audit,
            current_digest: None,
            audit_return: Screen::Scan,
            scan_state: ScanState::default(),
            patient_state: PatientViewState::default(),
            register_state: RegisterFormState::default(),
            audit_state: AuditViewState::default(),
        };
        app.refresh();
        app
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.clear_sensitive();
        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.screen {
                    Screen::Scan => render_scan(f, content_area, &self.scan_state),
                    Screen::Patient => render_patient(f, content_area, &self.patient_state),
                    Screen::Register => render_register(f, content_area, &self.register_state),
                    Screen::Audit => render_audit(f, content_area, &self.audit_state),
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global keys
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match key {
            KeyCode::Esc if self.screen == Screen::Audit => {
                self.close_audit();
                return;
            }
            KeyCode::Esc => {
                self.back_to_scan();
                return;
            }
            KeyCode::F(2) => {
                self.open_audit();
                return;
            }
            KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => return,
            _ => {}
        }

        match self.screen {
            Screen::Scan => self.handle_scan_key(key),
            Screen::Patient => self.handle_patient_key(key),
            Screen::Register => self.handle_register_key(key),
            Screen::Audit => self.handle_audit_key(key),
        }
    }

    fn handle_scan_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Tab | KeyCode::BackTab => self.scan_state.toggle_mode(),
            KeyCode::Char(c) => self.scan_state.input.push(c),
            KeyCode::Backspace => self.scan_state.input.pop(),
            KeyCode::Enter => self.submit_capture(),
            _ => {}
        }
    }

    fn handle_patient_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.patient_state.input.push(c),
            KeyCode::Backspace => self.patient_state.input.pop(),
            KeyCode::Enter => self.submit_event(),
            _ => {}
        }
    }

    fn handle_register_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.register_state.name.push(c),
            KeyCode::Backspace => self.register_state.name.pop(),
            KeyCode::Enter => self.submit_registration(),
            _ => {}
        }
    }

    fn handle_audit_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => self.audit_state.scroll_up(),
            KeyCode::Down => self.audit_state.scroll_down(),
            _ => {}
        }
    }

    fn submit_capture(&mut self) {
        match self.scan_state.take_capture() {
            Ok(capture) => {
                // `capture` is wiped on drop at the end of this arm.
                self.current_digest = Some(self.session.capture(&capture));
                self.scan_state.notice = None;
                self.refresh();
            }
            Err(message) => {
                self.scan_state.notice = Some(Notice::Error(message));
            }
        }
    }

    fn submit_event(&mut self) {
        let Some(record) = self.patient_state.record.clone() else {
            self.back_to_scan();
            return;
        };

        match self
            .session
            .submit_event(&record, self.patient_state.input.value())
        {
            Ok(state) => {
                self.apply(state);
                self.patient_state.notice =
                    Some(Notice::Success("Guardado en ficha clínica.".to_string()));
            }
            Err(e) => {
                self.patient_state.notice = Some(Notice::Error(e.to_string()));
            }
        }
    }

    fn submit_registration(&mut self) {
        let Some(digest) = self.register_state.digest.clone() else {
            self.back_to_scan();
            return;
        };

        match self
            .session
            .submit_registration(self.register_state.name.value(), &digest)
        {
            Ok(outcome) => {
                let notice = match &outcome.anonymized_id {
                    Some(id) => Notice::Success(format!("{}. ID: {id}", outcome.status.message())),
                    None => Notice::Warning(outcome.status.message().to_string()),
                };

                // The new identity is recognised on the next capture.
                self.back_to_scan();
                self.scan_state.notice = Some(notice);
            }
            Err(e) => {
                self.register_state.notice = Some(Notice::Error(e.to_string()));
            }
        }
    }

    fn open_audit(&mut self) {
        let snapshot = self.audit.snapshot();
        match AuditService::<InMemoryLedger>::render(&snapshot) {
            Ok(json) => self.audit_state.load(&snapshot, json),
            Err(e) => {
                tracing::error!("Failed to render audit dump: {}", e);
                self.audit_state.json.clear();
                self.audit_state.error = Some(e.to_string());
            }
        }
        if self.screen != Screen::Audit {
            self.audit_return = self.screen;
        }
        self.screen = Screen::Audit;
    }

    /// Leave the audit view with the patient or form left as it was.
    fn close_audit(&mut self) {
        self.screen = self.audit_return;
    }

    fn back_to_scan(&mut self) {
        self.clear_sensitive();
        self.refresh();
    }

    /// Recompute the session state from the current digest.
    fn refresh(&mut self) {
        let state = self.session.resolve(self.current_digest.as_ref());
        self.apply(state);
    }

    fn apply(&mut self, state: SessionState) {
        match state {
            SessionState::AwaitingInput => {
                self.scan_state.identity_count = self.session.identity_count();
                self.screen = Screen::Scan;
            }
            SessionState::Found { record, history } => {
                self.register_state.clear_sensitive();
                self.patient_state.load(record, history);
                self.screen = Screen::Patient;
            }
            SessionState::NotFound { digest } => {
                self.patient_state.clear_sensitive();
                self.register_state.load(digest);
                self.screen = Screen::Register;
            }
        }
    }

    /// Drop the current digest and every plaintext buffer from UI state.
    fn clear_sensitive(&mut self) {
        self.current_digest = None;
        self.scan_state.input.clear();
        self.scan_state.notice = None;
        self.patient_state.clear_sensitive();
        self.register_state.clear_sensitive();
    }
}
