use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::Local;
use tracing::debug;

use crate::error::Error;

/// A timestamp string suitable for settings files and log lines,
/// `YYYY-MM-DD HH:MM:SS` in local time.
pub fn file_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Read a PID from a file as a string.
///
/// A missing file is not an error; it means no PID has been recorded,
/// so `None` is returned. Surrounding whitespace is trimmed.
pub fn read_pid_file<P: AsRef<Path>>(path: P) -> Result<Option<String>, Error> {
    let path = path.as_ref();
    if !path.is_file() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)?;
    Ok(Some(contents.trim().to_string()))
}

/// Write the current process's PID to a file.
/// Returns the string that was written.
pub fn write_pid_file<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let pid = std::process::id().to_string();
    debug!(path = ?path.as_ref(), %pid, "Writing PID file");
    std::fs::write(path, &pid)?;
    Ok(pid)
}

/// Append one line to a plain log file, creating the file if necessary.
/// With `with_timestamp`, the line is prefixed by [`file_timestamp`].
pub fn append_log_line<P: AsRef<Path>>(
    path: P,
    line: &str,
    with_timestamp: bool,
) -> Result<(), Error> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    if with_timestamp {
        write!(file, "{} ", file_timestamp())?;
    }
    writeln!(file, "{line}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_pid_file_is_none() {
        let dir = tempfile::tempdir().unwrap();

        let pid = read_pid_file(dir.path().join("absent.pid")).unwrap();

        assert_eq!(pid, None);
    }

    #[test]
    fn pid_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sp.pid");

        let written = write_pid_file(&path).unwrap();
        let read_back = read_pid_file(&path).unwrap();

        assert_eq!(read_back.as_deref(), Some(written.as_str()));
        assert_eq!(written, std::process::id().to_string());
    }

    #[test]
    fn pid_is_trimmed_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sp.pid");
        std::fs::write(&path, " 4242 \n").unwrap();

        assert_eq!(read_pid_file(&path).unwrap().as_deref(), Some("4242"));
    }

    #[test]
    fn log_lines_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sp.log");

        append_log_line(&path, "first", false).unwrap();
        append_log_line(&path, "second", false).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn timestamped_log_line_has_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sp.log");

        append_log_line(&path, "printer offline", true).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with("printer offline\n"));
        // "YYYY-MM-DD HH:MM:SS " prefix.
        assert_eq!(contents.len(), "printer offline\n".len() + 20);
    }

    #[test]
    fn timestamp_shape() {
        let ts = file_timestamp();

        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[13..14], ":");
    }
}
