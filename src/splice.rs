//! Inlining the manifest and catalog into the docs viewer's HTML shell.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};

use crate::error::BundleError;

/// Fragment of the minified docs viewer that fetches both JSON files at runtime.
pub const MANIFEST_FETCH_MARKER: &str =
  r#"o=[i("manifest","manifest.json"+t),i("catalog","catalog.json"+t)]"#;

const MANIFEST_PREFIX: &str = "o=[{label: 'manifest', data: ";
const CATALOG_PREFIX: &str = "},{label: 'catalog', data: ";
const PAYLOAD_SUFFIX: &str = "}]";

/// Result of splicing the payload into a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplicedShell {
  /// Resulting HTML text.
  pub html: String,
  /// Whether the fetch marker was found and replaced.
  pub marker_replaced: bool,
}

/// Compact JSON formatter that writes every non-ASCII character as a `\uXXXX` escape.
///
/// The payload is then plain ASCII and survives any ASCII-compatible output encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiFormatter;

impl Formatter for AsciiFormatter {
  fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
  where
    W: ?Sized + Write,
  {
    let mut start = 0;
    for (index, ch) in fragment.char_indices() {
      if ch.is_ascii() {
        continue;
      }
      writer.write_all(&fragment.as_bytes()[start..index])?;
      let mut units = [0u16; 2];
      for unit in ch.encode_utf16(&mut units) {
        write!(writer, "\\u{unit:04x}")?;
      }
      start = index + ch.len_utf8();
    }
    writer.write_all(&fragment.as_bytes()[start..])
  }
}

/// Serialise a JSON object compactly with non-ASCII characters escaped.
pub fn to_ascii_json(value: &Map<String, Value>) -> Result<String, BundleError> {
  let mut buffer = Vec::new();
  let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, AsciiFormatter);
  value
    .serialize(&mut serializer)
    .map_err(BundleError::Serialize)?;
  // The formatter only ever emits ASCII.
  Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Render the inline registration expression carrying both documents.
///
/// Nothing is HTML-escaped, so content containing `</script>` ends the surrounding
/// script element early.
pub fn inline_payload(
  manifest: &Map<String, Value>,
  catalog: &Map<String, Value>,
) -> Result<String, BundleError> {
  let manifest_json = to_ascii_json(manifest)?;
  let catalog_json = to_ascii_json(catalog)?;

  Ok(format!(
    "{MANIFEST_PREFIX}{manifest_json}{CATALOG_PREFIX}{catalog_json}{PAYLOAD_SUFFIX}"
  ))
}

/// Replace the fetch marker in `shell` with the inline payload.
///
/// Only the first occurrence is replaced. A shell without the marker comes back unchanged.
pub fn splice_shell(
  shell: &str,
  manifest: &Map<String, Value>,
  catalog: &Map<String, Value>,
) -> Result<SplicedShell, BundleError> {
  if !shell.contains(MANIFEST_FETCH_MARKER) {
    tracing::warn!("manifest fetch marker not found; HTML shell left unchanged");
    return Ok(SplicedShell {
      html: shell.to_string(),
      marker_replaced: false,
    });
  }

  let payload = inline_payload(manifest, catalog)?;
  Ok(SplicedShell {
    html: shell.replacen(MANIFEST_FETCH_MARKER, &payload, 1),
    marker_replaced: true,
  })
}

/// Parse the embedded manifest and catalog back out of a spliced document.
pub fn extract_payload(html: &str) -> Option<(Value, Value)> {
  let start = html.find(MANIFEST_PREFIX)? + MANIFEST_PREFIX.len();
  let (manifest, rest) = take_json_value(&html[start..])?;
  let rest = rest.strip_prefix(CATALOG_PREFIX)?;
  let (catalog, rest) = take_json_value(rest)?;
  rest.starts_with(PAYLOAD_SUFFIX).then_some((manifest, catalog))
}

fn take_json_value(input: &str) -> Option<(Value, &str)> {
  let mut stream = serde_json::Deserializer::from_str(input).into_iter::<Value>();
  let value = stream.next()?.ok()?;
  Some((value, &input[stream.byte_offset()..]))
}
