//! Input validation shared by converter backends.
//!
//! pdfium reports a missing file, an unreadable file and an HTML error page
//! saved as `.pdf` with the same opaque "format error". Checking existence,
//! read permission and the `%PDF` magic bytes up front gives the caller a
//! precise [`ConversionError`] instead.

use crate::error::ConversionError;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Validate that `path` is an existing, readable file starting with `%PDF`.
///
/// Files shorter than four bytes are passed through; the backend reports
/// them as corrupt.
pub fn validate_pdf(path: &Path) -> Result<(), ConversionError> {
    if !path.exists() {
        return Err(ConversionError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ConversionError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ConversionError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(ConversionError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Validated PDF input: {}", path.display());
    Ok(())
}
