//! Logger setup: stderr plus an appended log file

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

/// Log file written next to the working directory
pub const LOG_FILE: &str = "katana_benchmark.log";

/// Overrides [`LOG_FILE`]; an empty value disables the file
pub const LOG_FILE_ENV: &str = "KATANA_LOG_FILE";

/// Writes everything to both writers
#[derive(Debug)]
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

/// Path of the log file, `None` when disabled
pub fn log_file_path(env_value: Option<String>) -> Option<PathBuf> {
    match env_value {
        Some(value) if value.is_empty() => None,
        Some(value) => Some(PathBuf::from(value)),
        None => Some(PathBuf::from(LOG_FILE)),
    }
}

/// Initialize env_logger at `default_level`, teeing records into the log file
pub fn init(default_level: &str) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));

    let mut open_error = None;
    if let Some(path) = log_file_path(std::env::var(LOG_FILE_ENV).ok()) {
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(Tee::new(io::stderr(), file))));
            }
            Err(e) => open_error = Some((path, e)),
        }
    }
    builder.init();

    if let Some((path, e)) = open_error {
        log::warn!("⚠️ Could not open log file {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_writes_to_both() {
        let mut tee = Tee::new(Vec::new(), Vec::new());
        writeln!(tee, "[INFO] ✅ Match found").unwrap();
        tee.flush().unwrap();

        let (a, b) = tee.into_inner();
        assert_eq!(a, b"[INFO] \xE2\x9C\x85 Match found\n");
        assert_eq!(a, b);
    }

    #[test]
    fn test_log_file_path() {
        assert_eq!(log_file_path(None), Some(PathBuf::from(LOG_FILE)));
        assert_eq!(
            log_file_path(Some("/tmp/bench.log".to_string())),
            Some(PathBuf::from("/tmp/bench.log"))
        );
        assert_eq!(log_file_path(Some(String::new())), None);
    }
}
