//! Capture file input.
//!
//! Input modes:
//! - `Binary`: raw ASTERIX bytes, as recorded from a socket, decoded as one
//!   buffer of consecutive data blocks
//! - `Hex`:    text hex dumps, one buffer per line (`30 00 0D ...`,
//!   `30000D...`, optionally prefixed by a `timestamp:` or `offset:` field)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use asterix_core::types::hex_decode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Binary,
    Hex,
}

/// Reads a capture file into the buffers passed to `Decoder::decode`.
pub struct CaptureReader {
    path: PathBuf,
    format: CaptureFormat,
}

impl CaptureReader {
    pub fn new(path: &Path, format: CaptureFormat) -> Self {
        CaptureReader {
            path: path.to_path_buf(),
            format,
        }
    }

    /// Read every buffer from the file.
    ///
    /// Hex lines that do not parse are logged and skipped.
    pub fn read_all(&self) -> io::Result<Vec<Vec<u8>>> {
        match self.format {
            CaptureFormat::Binary => {
                let data = fs::read(&self.path)?;
                Ok(if data.is_empty() { Vec::new() } else { vec![data] })
            }
            CaptureFormat::Hex => {
                let content = fs::read_to_string(&self.path)?;
                let mut buffers = Vec::new();
                for (i, line) in content.lines().enumerate() {
                    match clean_hex_line(line) {
                        Some(Ok(bytes)) => buffers.push(bytes),
                        Some(Err(())) => log::warn!("{}:{}: not a hex dump, skipped", self.path.display(), i + 1),
                        None => {}
                    }
                }
                Ok(buffers)
            }
        }
    }
}

/// Parse one hex dump line.
///
/// `None` for blank lines and `#` comments, `Some(Err(()))` for lines that
/// are not hex. A leading field ending in `:` (timestamp or offset) is
/// dropped.
pub fn clean_hex_line(line: &str) -> Option<Result<Vec<u8>, ()>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let hex = match line.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => line,
    };
    match hex_decode(hex) {
        Some(bytes) if !bytes.is_empty() => Some(Ok(bytes)),
        _ => Some(Err(())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_clean_hex_line_plain() {
        let result = clean_hex_line("30000D800102").unwrap().unwrap();
        assert_eq!(result, vec![0x30, 0x00, 0x0D, 0x80, 0x01, 0x02]);
    }

    #[test]
    fn test_clean_hex_line_spaced_lowercase() {
        let result = clean_hex_line("  30 00 0d 80 01 02 ").unwrap().unwrap();
        assert_eq!(result, vec![0x30, 0x00, 0x0D, 0x80, 0x01, 0x02]);
    }

    #[test]
    fn test_clean_hex_line_prefixed() {
        let result = clean_hex_line("1712345678.250: 22 00 05 80 01").unwrap().unwrap();
        assert_eq!(result, vec![0x22, 0x00, 0x05, 0x80, 0x01]);
    }

    #[test]
    fn test_clean_hex_line_comment_and_empty() {
        assert!(clean_hex_line("# recorded 2024-03-01").is_none());
        assert!(clean_hex_line("").is_none());
        assert!(clean_hex_line("   ").is_none());
    }

    #[test]
    fn test_clean_hex_line_invalid() {
        assert!(clean_hex_line("not hex at all").unwrap().is_err());
        assert!(clean_hex_line("300").unwrap().is_err()); // odd digit count
    }

    #[test]
    fn test_read_hex_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# two blocks").unwrap();
        writeln!(file, "30 00 05 80 01").unwrap();
        writeln!(file, "garbage").unwrap();
        writeln!(file, "2200058001").unwrap();
        let reader = CaptureReader::new(file.path(), CaptureFormat::Hex);
        let buffers = reader.read_all().unwrap();
        assert_eq!(buffers.len(), 2);
        assert_eq!(buffers[1], vec![0x22, 0x00, 0x05, 0x80, 0x01]);
    }

    #[test]
    fn test_read_binary_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x30, 0x00, 0x05, 0x80, 0x01]).unwrap();
        let reader = CaptureReader::new(file.path(), CaptureFormat::Binary);
        assert_eq!(reader.read_all().unwrap(), vec![vec![0x30, 0x00, 0x05, 0x80, 0x01]]);

        let empty = tempfile::NamedTempFile::new().unwrap();
        let reader = CaptureReader::new(empty.path(), CaptureFormat::Binary);
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let reader = CaptureReader::new(Path::new("/nonexistent/capture.bin"), CaptureFormat::Binary);
        assert!(reader.read_all().is_err());
    }
}
