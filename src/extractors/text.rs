//! Positioned text-run extraction from a page's content stream.
//!
//! Walks the operator sequence produced by [`crate::content::parse_content_stream`]
//! through a [`GraphicsStateStack`], decoding each text-showing operator's bytes
//! through the font's decoding contract (ToUnicode CMap, falling back to the
//! encoding/Differences overlay, falling back to U+FFFD) and emitting one
//! [`TextSpan`] per operator.

use std::collections::HashMap;

use crate::content::{self, GraphicsStateStack, Operator, TextElement};
use crate::document::PdfDocument;
use crate::error::Result;
use crate::fonts::FontInfo;
use crate::geometry::Rect;
use crate::layout::TextSpan;
use crate::object::Object;

/// Load every font referenced by a page's `/Resources /Font` dictionary.
pub fn load_page_fonts(doc: &mut PdfDocument, resources: &Object) -> Result<HashMap<String, FontInfo>> {
    let mut fonts = HashMap::new();

    let resources_obj = doc.resolve_object(resources)?;
    let Some(resources_dict) = resources_obj.as_dict() else {
        return Ok(fonts);
    };

    let Some(font_dict_entry) = resources_dict.get("Font") else {
        return Ok(fonts);
    };
    let font_dict_obj = doc.resolve_object(font_dict_entry)?;
    let Some(font_dict) = font_dict_obj.as_dict() else {
        return Ok(fonts);
    };

    let entries: Vec<(String, Object)> = font_dict.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    for (name, font_obj) in entries {
        let font = doc.resolve_object(&font_obj)?;
        match FontInfo::from_dict(&font, doc) {
            Ok(info) => {
                fonts.insert(name, info);
            },
            Err(e) => {
                log::warn!("skipping font resource '{}': {}", name, e);
            },
        }
    }

    Ok(fonts)
}

/// Extract positioned text runs from an already-decoded page content stream.
///
/// One [`TextSpan`] is produced per text-showing operator (`Tj`, each string
/// inside `TJ`, `'` and `"`); adjacent runs are left unmerged here and joined
/// into page text later by [`crate::reading_order`].
pub fn extract_spans(content_data: &[u8], fonts: &HashMap<String, FontInfo>) -> Result<Vec<TextSpan>> {
    let operators = content::parse_content_stream(content_data)?;
    let mut gs = GraphicsStateStack::new();
    let mut spans = Vec::new();

    for op in operators {
        match op {
            Operator::SaveState => gs.save(),
            Operator::RestoreState => gs.restore(),
            Operator::Cm { a, b, c, d, e, f } => {
                let m = content::Matrix { a, b, c, d, e, f };
                let new_ctm = m.multiply(&gs.current().ctm);
                gs.current_mut().ctm = new_ctm;
            },
            Operator::Td { tx, ty } => move_line(&mut gs, tx, ty),
            Operator::TD { tx, ty } => {
                gs.current_mut().leading = -ty;
                move_line(&mut gs, tx, ty);
            },
            Operator::TStar => {
                let leading = gs.current().leading;
                move_line(&mut gs, 0.0, -leading);
            },
            Operator::Tm { a, b, c, d, e, f } => {
                let m = content::Matrix { a, b, c, d, e, f };
                gs.current_mut().text_line_matrix = m;
                gs.current_mut().text_matrix = m;
            },
            Operator::Tc { char_space } => gs.current_mut().char_space = char_space,
            Operator::Tw { word_space } => gs.current_mut().word_space = word_space,
            Operator::Tz { scale } => gs.current_mut().horizontal_scaling = scale,
            Operator::TL { leading } => gs.current_mut().leading = leading,
            Operator::Tf { font, size } => {
                gs.current_mut().font_name = Some(font);
                gs.current_mut().font_size = size;
            },
            Operator::Tr { render } => gs.current_mut().render_mode = render,
            Operator::Ts { rise } => gs.current_mut().text_rise = rise,
            Operator::Tj { text } => show_text(&text, &mut gs, fonts, &mut spans),
            Operator::Quote { text } => {
                let leading = gs.current().leading;
                move_line(&mut gs, 0.0, -leading);
                show_text(&text, &mut gs, fonts, &mut spans);
            },
            Operator::DoubleQuote {
                word_space,
                char_space,
                text,
            } => {
                gs.current_mut().word_space = word_space;
                gs.current_mut().char_space = char_space;
                let leading = gs.current().leading;
                move_line(&mut gs, 0.0, -leading);
                show_text(&text, &mut gs, fonts, &mut spans);
            },
            Operator::TJ { array } => {
                for elem in array {
                    match elem {
                        TextElement::String(bytes) => show_text(&bytes, &mut gs, fonts, &mut spans),
                        TextElement::Offset(off) => {
                            let th = gs.current().horizontal_scaling / 100.0;
                            let tx = -off / 1000.0 * gs.current().font_size * th;
                            let translation = content::Matrix::translation(tx, 0.0);
                            let new_matrix = translation.multiply(&gs.current().text_matrix);
                            gs.current_mut().text_matrix = new_matrix;
                        },
                    }
                }
            },
            _ => {},
        }
    }

    Ok(spans)
}

fn move_line(gs: &mut GraphicsStateStack, tx: f32, ty: f32) {
    let translation = content::Matrix::translation(tx, ty);
    let new_line_matrix = translation.multiply(&gs.current().text_line_matrix);
    gs.current_mut().text_line_matrix = new_line_matrix;
    gs.current_mut().text_matrix = new_line_matrix;
}

/// Split a show-text byte string into character codes for the given font.
///
/// CID-keyed fonts (CIDFontType0/2, almost always Identity-H encoded) use
/// two-byte codes; simple fonts use one byte per code.
fn codes_for(font: Option<&FontInfo>, bytes: &[u8]) -> Vec<u32> {
    let two_byte = font.is_some_and(|f| f.cid_font_type.is_some());
    if two_byte {
        bytes
            .chunks(2)
            .map(|pair| if pair.len() == 2 {
                u32::from(pair[0]) << 8 | u32::from(pair[1])
            } else {
                u32::from(pair[0])
            })
            .collect()
    } else {
        bytes.iter().map(|&b| u32::from(b)).collect()
    }
}

fn show_text(bytes: &[u8], gs: &mut GraphicsStateStack, fonts: &HashMap<String, FontInfo>, spans: &mut Vec<TextSpan>) {
    let state = gs.current().clone();
    let font_name = state.font_name.clone().unwrap_or_default();
    let font = fonts.get(&font_name);
    let font_size = state.font_size;
    let th = state.horizontal_scaling / 100.0;

    let start = state.ctm.multiply(&state.text_matrix).transform_point(0.0, state.text_rise);

    let mut text = String::new();
    for code in codes_for(font, bytes) {
        match font.and_then(|f| f.char_to_unicode(code)) {
            Some(s) => text.push_str(&s),
            None => text.push('\u{FFFD}'),
        }

        let w0 = font.map(|f| f.get_glyph_width(code as u16) / 1000.0).unwrap_or(0.5);
        let is_single_byte_space = code == 32 && font.is_some_and(|f| f.cid_font_type.is_none());
        let word_space = if is_single_byte_space { state.word_space } else { 0.0 };
        let advance = (w0 * font_size + state.char_space + word_space) * th;

        let translation = content::Matrix::translation(advance, 0.0);
        let new_matrix = translation.multiply(&gs.current().text_matrix);
        gs.current_mut().text_matrix = new_matrix;
    }

    if text.trim().is_empty() {
        return;
    }

    let end = gs.current().ctm.multiply(&gs.current().text_matrix).transform_point(0.0, state.text_rise);
    let width = ((end.x - start.x).powi(2) + (end.y - start.y).powi(2)).sqrt();

    spans.push(TextSpan::new(text, Rect::new(start.x, start.y, width, font_size), font_name, font_size));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_tj_with_no_font_falls_back_to_replacement_char() {
        let content = b"BT /F1 12 Tf 0 0 Td (A) Tj ET";
        let fonts = HashMap::new();
        let spans = extract_spans(content, &fonts).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "\u{FFFD}");
    }

    #[test]
    fn tj_array_offsets_advance_text_matrix_between_strings() {
        let content = b"BT /F1 12 Tf 0 0 Td [(A) -250 (B)] TJ ET";
        let fonts = HashMap::new();
        let spans = extract_spans(content, &fonts).unwrap();
        assert_eq!(spans.len(), 2);
        assert!(spans[1].bbox.x > spans[0].bbox.x);
    }

    #[test]
    fn text_line_matrix_resets_on_t_star() {
        let content = b"BT 12 TL 0 100 Td (A) Tj T* (B) Tj ET";
        let fonts = HashMap::new();
        let spans = extract_spans(content, &fonts).unwrap();
        assert_eq!(spans.len(), 2);
        assert!(spans[1].bbox.y < spans[0].bbox.y);
    }
}
