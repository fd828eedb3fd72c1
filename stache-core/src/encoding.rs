//! Text encodings for template and output files.
//!
//! Unicode forms are handled here directly (encoding_rs never *encodes*
//! UTF-16 and has no UTF-32 at all); every other encoding is delegated to
//! [`encoding_rs`] by WHATWG label.
//!
//! | BOM bytes       | Encoding  |
//! |-----------------|-----------|
//! | `FF FE 00 00`   | UTF-32 LE |
//! | `00 00 FE FF`   | UTF-32 BE |
//! | `EF BB BF`      | UTF-8     |
//! | `FF FE`         | UTF-16 LE |
//! | `FE FF`         | UTF-16 BE |

use std::fmt;

use crate::error::UserError;

const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF16_BE: &[u8] = &[0xFE, 0xFF];
const BOM_UTF32_LE: &[u8] = &[0xFF, 0xFE, 0x00, 0x00];
const BOM_UTF32_BE: &[u8] = &[0x00, 0x00, 0xFE, 0xFF];

/// Byte order of a multi-byte Unicode form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// A resolved character encoding plus its byte-order-mark policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSpec {
    Utf8 { bom: bool },
    Utf16 { order: ByteOrder, bom: bool },
    Utf32 { order: ByteOrder, bom: bool },
    /// Any non-Unicode encoding known to encoding_rs. Never written with a BOM.
    Legacy(&'static encoding_rs::Encoding),
}

impl Default for EncodingSpec {
    fn default() -> Self {
        Self::UTF8_NO_BOM
    }
}

impl fmt::Display for EncodingSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bom = match self {
            EncodingSpec::Utf8 { bom }
            | EncodingSpec::Utf16 { bom, .. }
            | EncodingSpec::Utf32 { bom, .. } => *bom,
            EncodingSpec::Legacy(_) => false,
        };
        if bom {
            write!(f, "{} (with BOM)", self.name())
        } else {
            f.write_str(self.name())
        }
    }
}

impl EncodingSpec {
    /// The default assumption when nothing else is known.
    pub const UTF8_NO_BOM: EncodingSpec = EncodingSpec::Utf8 { bom: false };

    /// Resolve an encoding by name, case-insensitively.
    ///
    /// Explicitly named Unicode encodings emit a BOM when writing.
    pub fn for_label(label: &str) -> Result<EncodingSpec, UserError> {
        let unsupported = || UserError::UnsupportedEncoding {
            name: label.to_owned(),
        };
        let normalized = label.trim().to_ascii_lowercase();
        let spec = match normalized.as_str() {
            "utf-8" | "utf8" => EncodingSpec::Utf8 { bom: true },
            "utf-16" | "utf16" | "utf-16le" | "unicode" | "ucs-2" => EncodingSpec::Utf16 {
                order: ByteOrder::Little,
                bom: true,
            },
            "utf-16be" | "unicodefffe" => EncodingSpec::Utf16 {
                order: ByteOrder::Big,
                bom: true,
            },
            "utf-32" | "utf32" | "utf-32le" => EncodingSpec::Utf32 {
                order: ByteOrder::Little,
                bom: true,
            },
            "utf-32be" => EncodingSpec::Utf32 {
                order: ByteOrder::Big,
                bom: true,
            },
            other => {
                let encoding =
                    encoding_rs::Encoding::for_label(other.as_bytes()).ok_or_else(unsupported)?;
                if encoding == encoding_rs::UTF_8 {
                    EncodingSpec::Utf8 { bom: true }
                } else if encoding == encoding_rs::UTF_16LE {
                    EncodingSpec::Utf16 {
                        order: ByteOrder::Little,
                        bom: true,
                    }
                } else if encoding == encoding_rs::UTF_16BE {
                    EncodingSpec::Utf16 {
                        order: ByteOrder::Big,
                        bom: true,
                    }
                } else if encoding == encoding_rs::REPLACEMENT {
                    return Err(unsupported());
                } else {
                    EncodingSpec::Legacy(encoding)
                }
            }
        };
        Ok(spec)
    }

    /// Identify an encoding from a leading byte-order mark.
    ///
    /// UTF-32 LE is checked before UTF-16 LE since their marks share a prefix.
    pub fn sniff(bytes: &[u8]) -> Option<EncodingSpec> {
        if bytes.starts_with(BOM_UTF32_LE) {
            Some(EncodingSpec::Utf32 {
                order: ByteOrder::Little,
                bom: true,
            })
        } else if bytes.starts_with(BOM_UTF32_BE) {
            Some(EncodingSpec::Utf32 {
                order: ByteOrder::Big,
                bom: true,
            })
        } else if bytes.starts_with(BOM_UTF8) {
            Some(EncodingSpec::Utf8 { bom: true })
        } else if bytes.starts_with(BOM_UTF16_LE) {
            Some(EncodingSpec::Utf16 {
                order: ByteOrder::Little,
                bom: true,
            })
        } else if bytes.starts_with(BOM_UTF16_BE) {
            Some(EncodingSpec::Utf16 {
                order: ByteOrder::Big,
                bom: true,
            })
        } else {
            None
        }
    }

    /// The encoding announced by a BOM in `bytes`, or `self` when there is none.
    pub fn detect(self, bytes: &[u8]) -> EncodingSpec {
        Self::sniff(bytes).unwrap_or(self)
    }

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            EncodingSpec::Utf8 { .. } => "utf-8",
            EncodingSpec::Utf16 { order: ByteOrder::Little, .. } => "utf-16le",
            EncodingSpec::Utf16 { order: ByteOrder::Big, .. } => "utf-16be",
            EncodingSpec::Utf32 { order: ByteOrder::Little, .. } => "utf-32le",
            EncodingSpec::Utf32 { order: ByteOrder::Big, .. } => "utf-32be",
            EncodingSpec::Legacy(encoding) => encoding.name(),
        }
    }

    /// Byte-order mark emitted in front of encoded text (empty if none).
    pub fn preamble(&self) -> &'static [u8] {
        match self {
            EncodingSpec::Utf8 { bom: true } => BOM_UTF8,
            EncodingSpec::Utf16 { order: ByteOrder::Little, bom: true } => BOM_UTF16_LE,
            EncodingSpec::Utf16 { order: ByteOrder::Big, bom: true } => BOM_UTF16_BE,
            EncodingSpec::Utf32 { order: ByteOrder::Little, bom: true } => BOM_UTF32_LE,
            EncodingSpec::Utf32 { order: ByteOrder::Big, bom: true } => BOM_UTF32_BE,
            _ => &[],
        }
    }

    /// Decode file contents.
    ///
    /// A BOM in `bytes` takes precedence over `self` and is stripped.
    /// Malformed sequences become U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let actual = self.detect(bytes);
        let body = Self::strip_bom(bytes);
        match actual {
            EncodingSpec::Utf8 { .. } => String::from_utf8_lossy(body).into_owned(),
            EncodingSpec::Utf16 { order, .. } => {
                let units = body.chunks(2).map(|chunk| match (order, chunk) {
                    (ByteOrder::Little, [lo, hi]) => u16::from_le_bytes([*lo, *hi]),
                    (ByteOrder::Big, [hi, lo]) => u16::from_be_bytes([*hi, *lo]),
                    _ => 0xFFFD,
                });
                char::decode_utf16(units)
                    .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect()
            }
            EncodingSpec::Utf32 { order, .. } => body
                .chunks(4)
                .map(|chunk| {
                    let Ok(quad) = <[u8; 4]>::try_from(chunk) else {
                        return char::REPLACEMENT_CHARACTER;
                    };
                    let scalar = match order {
                        ByteOrder::Little => u32::from_le_bytes(quad),
                        ByteOrder::Big => u32::from_be_bytes(quad),
                    };
                    char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER)
                })
                .collect(),
            EncodingSpec::Legacy(encoding) => {
                encoding.decode_without_bom_handling(body).0.into_owned()
            }
        }
    }

    /// `bytes` without a leading Unicode byte-order mark.
    pub fn strip_bom(bytes: &[u8]) -> &[u8] {
        match Self::sniff(bytes) {
            Some(found) => &bytes[found.preamble().len()..],
            None => bytes,
        }
    }

    /// Encode `text`, prefixed with the BOM if this encoding carries one.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut out = self.preamble().to_vec();
        out.extend_from_slice(&self.encode_body(text));
        out
    }

    /// Encode `text` without any BOM.
    ///
    /// Characters a legacy encoding cannot represent are written as HTML
    /// numeric character references (`&#20013;`).
    pub fn encode_body(&self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        match self {
            EncodingSpec::Utf8 { .. } => out.extend_from_slice(text.as_bytes()),
            EncodingSpec::Utf16 { order, .. } => {
                for unit in text.encode_utf16() {
                    match order {
                        ByteOrder::Little => out.extend_from_slice(&unit.to_le_bytes()),
                        ByteOrder::Big => out.extend_from_slice(&unit.to_be_bytes()),
                    }
                }
            }
            EncodingSpec::Utf32 { order, .. } => {
                for c in text.chars() {
                    match order {
                        ByteOrder::Little => out.extend_from_slice(&u32::from(c).to_le_bytes()),
                        ByteOrder::Big => out.extend_from_slice(&u32::from(c).to_be_bytes()),
                    }
                }
            }
            EncodingSpec::Legacy(encoding) => out.extend_from_slice(&encoding.encode(text).0),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_utf8_without_bom() {
        assert_eq!(EncodingSpec::default(), EncodingSpec::Utf8 { bom: false });
        assert!(EncodingSpec::default().preamble().is_empty());
    }

    #[test]
    fn utf32_le_bom_is_not_mistaken_for_utf16() {
        let bytes = [0xFF, 0xFE, 0x00, 0x00, b'a', 0, 0, 0];
        assert_eq!(
            EncodingSpec::sniff(&bytes),
            Some(EncodingSpec::Utf32 { order: ByteOrder::Little, bom: true })
        );
    }

    #[test]
    fn decode_strips_bom_and_honours_it_over_default() {
        let mut bytes = BOM_UTF16_BE.to_vec();
        bytes.extend_from_slice(&[0x00, b'h', 0x00, b'i']);
        assert_eq!(EncodingSpec::UTF8_NO_BOM.decode(&bytes), "hi");
    }

    #[test]
    fn legacy_encoding_round_trips_non_ascii() {
        let latin1 = EncodingSpec::for_label("windows-1252").unwrap();
        let bytes = latin1.encode("café");
        assert_eq!(bytes, b"caf\xE9");
        assert_eq!(latin1.decode(&bytes), "café");
    }

    #[test]
    fn unmappable_legacy_characters_become_references() {
        let latin1 = EncodingSpec::for_label("windows-1252").unwrap();
        assert_eq!(latin1.encode_body("a中"), b"a&#20013;");
    }

    #[test]
    fn strip_bom_leaves_plain_bytes_alone() {
        assert_eq!(EncodingSpec::strip_bom(b"\xEF\xBB\xBFabc"), b"abc");
        assert_eq!(EncodingSpec::strip_bom(b"abc"), b"abc");
    }

    #[test]
    fn utf16_encoding_emits_bom() {
        let spec = EncodingSpec::for_label("UTF-16").unwrap();
        assert_eq!(spec.encode("A"), vec![0xFF, 0xFE, b'A', 0x00]);
    }

    #[test]
    fn odd_trailing_byte_decodes_to_replacement() {
        let spec = EncodingSpec::Utf16 { order: ByteOrder::Little, bom: false };
        assert_eq!(spec.decode(&[b'A', 0x00, b'B']), "A\u{FFFD}");
    }

    #[test]
    fn display_mentions_bom() {
        assert_eq!(EncodingSpec::UTF8_NO_BOM.to_string(), "utf-8");
        assert_eq!(EncodingSpec::Utf8 { bom: true }.to_string(), "utf-8 (with BOM)");
    }
}
