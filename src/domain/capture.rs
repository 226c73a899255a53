//! Captured biometric input.
//!
//! Input arrives either as photo bytes (camera or image file) or as a
//! manually typed code. Both are reduced to bytes before hashing.
//!
//! # Memory Security
//!
//! `CaptureInput` implements `ZeroizeOnDrop`: the raw bytes and manual
//! codes are wiped once the digest has been computed and the input dropped.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// How the clinician supplies the biometric input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    /// Read image bytes from a file path
    #[default]
    PhotoFile,
    /// Type a simulated code (PIN)
    ManualCode,
}

impl CaptureMode {
    /// Switch to the other mode.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::PhotoFile => Self::ManualCode,
            Self::ManualCode => Self::PhotoFile,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::PhotoFile => "Foto (archivo)",
            Self::ManualCode => "Código manual",
        }
    }
}

/// Raw captured input, ready to be hashed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub enum CaptureInput {
    /// Image bytes
    Photo(Vec<u8>),
    /// Manual code, hashed as its UTF-8 bytes
    ManualCode(String),
}

impl CaptureInput {
    /// Read photo bytes from a file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read.
    pub fn from_photo_file(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        std::fs::read(path).map(Self::Photo)
    }

    /// The bytes that feed the hasher.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Photo(bytes) => bytes,
            Self::ManualCode(code) => code.as_bytes(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> CaptureMode {
        match self {
            Self::Photo(_) => CaptureMode::PhotoFile,
            Self::ManualCode(_) => CaptureMode::ManualCode,
        }
    }
}

impl std::fmt::Debug for CaptureInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureInput")
            .field("mode", &self.mode())
            .field("size_bytes", &self.as_bytes().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_manual_code_bytes_are_utf8() {
        let input = CaptureInput::ManualCode("1234".to_string());
        assert_eq!(input.as_bytes(), b"1234");
        assert_eq!(input.mode(), CaptureMode::ManualCode);
    }

    #[test]
    fn test_photo_file_is_read_verbatim() {
        let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
        file.write_all(&[0xff, 0xd8, 0xff, 0xe0]).expect("Should write");

        let input = CaptureInput::from_photo_file(file.path()).expect("Should read photo");
        assert_eq!(input.as_bytes(), &[0xff, 0xd8, 0xff, 0xe0]);
        assert_eq!(input.mode(), CaptureMode::PhotoFile);
    }

    #[test]
    fn test_missing_photo_file_is_error() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        assert!(CaptureInput::from_photo_file(dir.path().join("missing.jpg")).is_err());
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(CaptureMode::PhotoFile.label(), "Foto (archivo)");
        assert_eq!(CaptureMode::ManualCode.label(), "Código manual");
    }

    #[test]
    fn test_debug_does_not_leak_code() {
        let input = CaptureInput::ManualCode("9876".to_string());
        let debug_output = format!("{input:?}");
        assert!(!debug_output.contains("9876"));
        assert!(debug_output.contains("size_bytes"));
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(CaptureMode::PhotoFile.toggle(), CaptureMode::ManualCode);
        assert_eq!(CaptureMode::ManualCode.toggle(), CaptureMode::PhotoFile);
    }
}
