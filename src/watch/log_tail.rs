// src/watch/log_tail.rs

//! Tail a growing log file from its end, one decoded line at a time.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use encoding_rs::{Decoder, DecoderResult};
use tracing::debug;

use crate::types::TextEncoding;
use crate::watch::probe::ProbeError;

const READ_CHUNK: usize = 8 * 1024;

/// Reader positioned at the end of a log file when opened.
///
/// Content present before [`LogTail::open_at_end`] is never returned.
/// Bytes are decoded as they arrive and split on `\n` afterwards, so
/// multi-byte encodings such as UTF-16 split correctly. Only complete lines
/// are returned; a partial line stays buffered until the rest is written.
pub struct LogTail {
    path: PathBuf,
    encoding: TextEncoding,
    file: File,
    decoder: Decoder,
    offset: u64,
    pending: String,
}

impl std::fmt::Debug for LogTail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogTail")
            .field("path", &self.path)
            .field("encoding", &self.encoding)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl LogTail {
    /// Open `path` and seek to its current end.
    pub fn open_at_end(path: &Path, encoding: &str) -> Result<Self, ProbeError> {
        let encoding = TextEncoding::from_str(encoding).map_err(|_| {
            ProbeError::UnsupportedEncoding {
                encoding: encoding.to_string(),
            }
        })?;

        let open_err = |source: io::Error| ProbeError::Open {
            path: path.to_path_buf(),
            encoding,
            source,
        };

        let mut file = File::open(path).map_err(open_err)?;
        let offset = file.seek(SeekFrom::End(0)).map_err(open_err)?;

        debug!(path = %path.display(), offset, %encoding, "log tail opened at end of file");

        Ok(Self {
            path: path.to_path_buf(),
            encoding,
            file,
            decoder: encoding.new_decoder(),
            offset,
            pending: String::new(),
        })
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Read the next complete line, without its line terminator.
    ///
    /// `Ok(None)` means no complete line is available yet. Bytes that are
    /// not valid under the configured encoding are a [`ProbeError::Decode`].
    pub fn read_next_line(&mut self) -> Result<Option<String>, ProbeError> {
        let mut buf = [0u8; READ_CHUNK];
        loop {
            if let Some(line) = self.take_line() {
                return Ok(Some(line));
            }

            let n = self.file.read(&mut buf).map_err(ProbeError::Read)?;
            if n == 0 {
                self.rewind_if_truncated()?;
                return Ok(None);
            }
            self.offset += n as u64;
            self.decode(&buf[..n])?;
        }
    }

    fn take_line(&mut self) -> Option<String> {
        let end = self.pending.find('\n')?;
        let mut line: String = self.pending.drain(..=end).collect();
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }

    fn decode(&mut self, mut src: &[u8]) -> Result<(), ProbeError> {
        let encoding = self.encoding;
        if !encoding.admits(src) {
            return Err(ProbeError::Decode { encoding });
        }

        loop {
            let room = self
                .decoder
                .max_utf8_buffer_length_without_replacement(src.len())
                .unwrap_or(src.len() * 3 + 4);
            self.pending.reserve(room);

            let (result, read) =
                self.decoder
                    .decode_to_string_without_replacement(src, &mut self.pending, false);
            src = &src[read..];
            match result {
                DecoderResult::InputEmpty => return Ok(()),
                DecoderResult::OutputFull => continue,
                DecoderResult::Malformed(..) => return Err(ProbeError::Decode { encoding }),
            }
        }
    }

    /// A file shorter than our position was truncated in place; follow it
    /// from the start.
    fn rewind_if_truncated(&mut self) -> Result<(), ProbeError> {
        let len = self.file.metadata().map_err(ProbeError::Read)?.len();
        if len < self.offset {
            debug!(path = %self.path.display(), len, offset = self.offset, "log truncated; rewinding");
            self.offset = self.file.seek(SeekFrom::Start(0)).map_err(ProbeError::Read)?;
            self.decoder = self.encoding.new_decoder();
            self.pending.clear();
        }
        Ok(())
    }
}
