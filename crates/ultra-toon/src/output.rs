//! Persisting rendered documents.
//!
//! Encoding never touches the filesystem; callers that want the document on
//! disk hand the rendered text to [`write_document`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::error::Result;

/// Write `text` to `path`, creating or truncating the file.
///
/// The handle is closed when it goes out of scope, on success and on error.
pub fn write_document(path: impl AsRef<Path>, text: &str) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    debug!("wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}
