use crate::error::{MonitorError, Result};
use crate::metrics::types::MetricLine;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Lines joined by `\n`, without a trailing newline.
pub fn render(lines: &[MetricLine]) -> String {
    lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the rendered lines to the file the Zabbix agent reads.
pub struct ZabbixFileExporter {
    path: PathBuf,
}

impl ZabbixFileExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Replace the output file in one step: content is written to a sibling
    /// temporary file and renamed over the target, so readers never see a partial
    /// file. An empty slice still produces an (empty) file.
    pub fn write(&self, lines: &[MetricLine]) -> Result<()> {
        let content = render(lines);

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;
        set_readable(file.path())?;
        debug!(tmp = %file.path().display(), bytes = content.len(), "Wrote temporary output");

        file.persist(&self.path)
            .map_err(|e| MonitorError::Io(e.error))?;

        info!(
            path = %self.path.display(),
            lines = lines.len(),
            "Output written"
        );
        Ok(())
    }
}

// Temp files are created 0600; the agent usually runs as another user.
#[cfg(unix)]
fn set_readable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_readable(_path: &Path) -> Result<()> {
    Ok(())
}
