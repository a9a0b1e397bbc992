use std::fmt;
use std::str::FromStr;

use encoding_rs::{Decoder, Encoding};

/// What a watch item observes.
///
/// The config spells the process variant `"program"`; internally it is a
/// process-presence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    Process,
    Log,
}

impl ConditionKind {
    /// Parse the `type` field of a watch item. Unknown values yield `None`
    /// so the validator can skip them with a warning.
    pub fn from_config_type(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "program" => Some(ConditionKind::Process),
            "log" => Some(ConditionKind::Log),
            _ => None,
        }
    }

    /// Interval between two probes of this kind.
    pub fn poll_interval(self) -> std::time::Duration {
        match self {
            ConditionKind::Process => std::time::Duration::from_secs(1),
            ConditionKind::Log => std::time::Duration::from_millis(500),
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionKind::Process => f.write_str("program"),
            ConditionKind::Log => f.write_str("log"),
        }
    }
}

/// Text encoding used to decode a watched log file.
///
/// Any WHATWG label `encoding_rs` knows is accepted (`utf-16le`,
/// `windows-1252`, `gbk`, `shift_jis`, ...), plus the common spellings
/// operators use elsewhere (`latin-1`, `utf_16_le`, `utf-8-sig`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Strict 7-bit ASCII. WHATWG maps the `ascii` label to windows-1252,
    /// which would accept every byte.
    Ascii,
    Codec(&'static Encoding),
}

impl TextEncoding {
    pub fn utf8() -> Self {
        TextEncoding::Codec(encoding_rs::UTF_8)
    }

    /// A fresh streaming decoder. A leading BOM is consumed.
    pub fn new_decoder(self) -> Decoder {
        match self {
            TextEncoding::Ascii => encoding_rs::UTF_8.new_decoder(),
            TextEncoding::Codec(codec) => codec.new_decoder(),
        }
    }

    /// Byte-level check applied before decoding.
    pub fn admits(self, bytes: &[u8]) -> bool {
        match self {
            TextEncoding::Ascii => bytes.is_ascii(),
            TextEncoding::Codec(_) => true,
        }
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        if matches!(label.as_str(), "ascii" | "us-ascii") {
            return Ok(TextEncoding::Ascii);
        }
        if let Some(codec) = Encoding::for_label_no_replacement(label.as_bytes()) {
            return Ok(TextEncoding::Codec(codec));
        }

        let alias = match label.replace('_', "-").as_str() {
            "latin-1" => "latin1".to_string(),
            "utf-8-sig" => "utf-8".to_string(),
            "utf-16-le" => "utf-16le".to_string(),
            "utf-16-be" => "utf-16be".to_string(),
            other => other.to_string(),
        };
        Encoding::for_label_no_replacement(alias.as_bytes())
            .map(TextEncoding::Codec)
            .ok_or_else(|| format!("unsupported encoding: {s}"))
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Ascii => f.write_str("ascii"),
            TextEncoding::Codec(codec) => f.write_str(&codec.name().to_ascii_lowercase()),
        }
    }
}

/// A cleanup step. `close` is the only action the supervisor knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Close,
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "close" => Ok(ActionKind::Close),
            other => Err(format!("invalid action: {other} (expected \"close\")")),
        }
    }
}
