//! Text encoding applied uniformly to every read and write.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use encoding_rs::{Encoding, REPLACEMENT, UTF_8, UTF_16BE, UTF_16LE};

use crate::error::BundleError;

const BYTE_ORDER_MARK: u16 = 0xfeff;

/// Encoding resolved from a WHATWG label such as `utf-8` or `windows-1252`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding {
  encoding: &'static Encoding,
  write_bom: bool,
}

impl TextEncoding {
  /// Resolve an encoding label, ignoring case and surrounding whitespace.
  ///
  /// `utf-16` and its aliases write a byte order mark; `utf-16le` and `utf-16be` do not.
  /// The WHATWG `replacement` encoding can neither read nor write text and is rejected.
  pub fn for_label(label: &str) -> Result<Self, BundleError> {
    let trimmed = label.trim();
    let encoding = Encoding::for_label(trimmed.as_bytes())
      .filter(|encoding| *encoding != REPLACEMENT)
      .ok_or_else(|| BundleError::UnknownEncoding(label.to_string()))?;

    let lowered = trimmed.to_ascii_lowercase();
    let explicit_order = lowered.ends_with("le") || lowered.ends_with("be");
    Ok(Self {
      encoding,
      write_bom: is_utf16(encoding) && !explicit_order,
    })
  }

  /// Canonical name of the encoding.
  pub fn name(&self) -> &'static str {
    self.encoding.name()
  }

  /// Decode raw file bytes. Malformed sequences are an error rather than replaced.
  ///
  /// A leading byte order mark is dropped for UTF-16 input; UTF-8 input keeps it.
  pub fn decode<'a>(&self, path: &Path, bytes: &'a [u8]) -> Result<Cow<'a, str>, BundleError> {
    let bytes = match self.utf16_bom() {
      Some(bom) => bytes.strip_prefix(bom.as_slice()).unwrap_or(bytes),
      None => bytes,
    };

    self
      .encoding
      .decode_without_bom_handling_and_without_replacement(bytes)
      .ok_or_else(|| BundleError::Decode {
        path: path.to_path_buf(),
        encoding: self.name(),
      })
  }

  /// Encode text for writing to `path`.
  ///
  /// Text containing characters the encoding cannot represent is an error.
  pub fn encode<'a>(&self, path: &Path, text: &'a str) -> Result<Cow<'a, [u8]>, BundleError> {
    if is_utf16(self.encoding) {
      return Ok(Cow::Owned(self.encode_utf16(text)));
    }

    let (bytes, _, had_errors) = self.encoding.encode(text);
    if had_errors {
      return Err(BundleError::Unencodable {
        path: path.to_path_buf(),
        encoding: self.name(),
      });
    }
    Ok(bytes)
  }

  fn encode_utf16(&self, text: &str) -> Vec<u8> {
    let big_endian = self.encoding == UTF_16BE;
    let bom = self.write_bom.then_some(BYTE_ORDER_MARK);

    let mut bytes = Vec::with_capacity(text.len() * 2 + 2);
    for unit in bom.into_iter().chain(text.encode_utf16()) {
      let pair = if big_endian {
        unit.to_be_bytes()
      } else {
        unit.to_le_bytes()
      };
      bytes.extend_from_slice(&pair);
    }
    bytes
  }

  fn utf16_bom(&self) -> Option<[u8; 2]> {
    if self.encoding == UTF_16BE {
      Some(BYTE_ORDER_MARK.to_be_bytes())
    } else if self.encoding == UTF_16LE {
      Some(BYTE_ORDER_MARK.to_le_bytes())
    } else {
      None
    }
  }
}

fn is_utf16(encoding: &'static Encoding) -> bool {
  encoding == UTF_16LE || encoding == UTF_16BE
}

impl Default for TextEncoding {
  fn default() -> Self {
    Self {
      encoding: UTF_8,
      write_bom: false,
    }
  }
}

impl fmt::Debug for TextEncoding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("TextEncoding").field(&self.name()).finish()
  }
}

impl fmt::Display for TextEncoding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for TextEncoding {
  type Err = BundleError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::for_label(s)
  }
}
