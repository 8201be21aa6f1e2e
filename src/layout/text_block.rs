//! Text span representation produced by the content stream interpreter.

use crate::geometry::Rect;

/// A positioned text run: a decoded Unicode substring emitted by one or more
/// text-showing operators at the same baseline, in the same font.
///
/// `bbox.y` holds the baseline y-coordinate; `bbox.height` is approximated
/// from the font size so that header/footer/signature-band rectangle
/// filtering can treat spans geometrically without needing glyph outlines.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// Decoded Unicode text for this run.
    pub text: String,
    /// Bounding box: x/y is the baseline origin, width is the run's advance,
    /// height approximates the font's em size.
    pub bbox: Rect,
    /// Name of the font in effect (resource key or base font name).
    pub font_name: String,
    /// Font size in points at the time this run was shown.
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(text: impl Into<String>, bbox: Rect, font_name: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_name: font_name.into(),
            font_size,
        }
    }
}
