use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::IResult;

/// Write `value` as JSON indented by two spaces, without a trailing newline.
pub fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> IResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    debug!("wrote {}", path.display());
    Ok(())
}
