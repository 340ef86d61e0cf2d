use std::path::Path;

use crate::error::DocumentError;

/// Read an extracted-text document. Anything that decodes as UTF-8 is
/// accepted, including an empty file; other bytes are rejected.
pub fn load_text(path: &Path) -> Result<String, DocumentError> {
    let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(path, bytes)
}

fn decode(path: &Path, bytes: Vec<u8>) -> Result<String, DocumentError> {
    String::from_utf8(bytes).map_err(|e| DocumentError::NotText {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })
}
