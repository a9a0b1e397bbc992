#![allow(dead_code)]

pub use handoff_test_utils::builders;
pub use handoff_test_utils::fake_processes::FakeProcessTable;
pub use handoff_test_utils::{init_tracing, with_timeout};

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `contents` to a temp file with the given extension (e.g. ".json").
pub fn config_file(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("handoff-")
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Append raw bytes to a log file, the way a separate writer process would.
pub fn append_bytes(path: &Path, bytes: &[u8]) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
}

pub fn append_line(path: &Path, line: &str) {
    append_bytes(path, format!("{line}\n").as_bytes());
}
