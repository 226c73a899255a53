//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a medical-themed shell for:
//! - Biometric capture (photo file or manual code)
//! - Patient identification and clinical history
//! - New patient registration
//! - Privacy audit of the clinical ledger

mod app;
mod styles;
mod ui;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
