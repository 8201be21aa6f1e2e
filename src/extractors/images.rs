//! Image metadata extraction from page `/Resources /XObject` entries.
//!
//! Only the descriptor the forensic analysis record needs is kept — width,
//! height, color space, and filter chain. Raw pixel data is never decoded or
//! retained; rendering is out of scope.

use crate::document::PdfDocument;
use crate::error::Result;
use crate::object::Object;

/// Color space of an image XObject, as declared by `/ColorSpace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpace {
    /// `/DeviceGray`
    Gray,
    /// `/DeviceRGB`
    Rgb,
    /// `/DeviceCMYK`
    Cmyk,
    /// `/Indexed` (palette-based)
    Indexed,
    /// Any other name (e.g. ICCBased, Separation) kept verbatim.
    Other(String),
}

impl ColorSpace {
    fn from_object(obj: &Object) -> Self {
        match obj {
            Object::Name(name) => Self::from_name(name),
            Object::Array(arr) => arr
                .first()
                .and_then(|o| o.as_name())
                .map(Self::from_name)
                .unwrap_or(Self::Other("Unknown".to_string())),
            _ => Self::Other("Unknown".to_string()),
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "DeviceGray" | "CalGray" | "G" => Self::Gray,
            "DeviceRGB" | "CalRGB" | "RGB" => Self::Rgb,
            "DeviceCMYK" | "CMYK" => Self::Cmyk,
            "Indexed" | "I" => Self::Indexed,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Descriptor for one image XObject: dimensions, color space, and the
/// filter chain applied to its (un-retained) pixel data.
#[derive(Debug, Clone)]
pub struct ImageDescriptor {
    /// Resource name the image is keyed under in `/Resources /XObject`.
    pub name: String,
    /// `/Width` in samples.
    pub width: u32,
    /// `/Height` in samples.
    pub height: u32,
    /// `/BitsPerComponent`, when declared.
    pub bits_per_component: Option<u8>,
    /// Declared color space.
    pub color_space: ColorSpace,
    /// `/Filter` chain, in declaration order (e.g. `["DCTDecode"]`).
    pub filters: Vec<String>,
    /// Whether `/ImageMask` is true (stencil mask, no color space).
    pub is_mask: bool,
}

/// Walk a page's `/Resources /XObject` dictionary and describe every entry
/// with `/Subtype /Image`. XObjects referencing form XObjects are skipped.
pub fn describe_page_images(doc: &mut PdfDocument, resources: &Object) -> Result<Vec<ImageDescriptor>> {
    let mut images = Vec::new();

    let resources_obj = doc.resolve_object(resources)?;
    let Some(resources_dict) = resources_obj.as_dict() else {
        return Ok(images);
    };

    let Some(xobject_entry) = resources_dict.get("XObject") else {
        return Ok(images);
    };
    let xobject_dict_obj = doc.resolve_object(xobject_entry)?;
    let Some(xobject_dict) = xobject_dict_obj.as_dict() else {
        return Ok(images);
    };

    let entries: Vec<(String, Object)> = xobject_dict.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    for (name, xobj) in entries {
        let resolved = doc.resolve_object(&xobj)?;
        let Some(dict) = resolved.as_dict() else {
            continue;
        };

        let is_image = dict.get("Subtype").and_then(|o| o.as_name()) == Some("Image");
        if !is_image {
            continue;
        }

        let width = dict.get("Width").and_then(|o| o.as_integer()).unwrap_or(0) as u32;
        let height = dict.get("Height").and_then(|o| o.as_integer()).unwrap_or(0) as u32;
        let bits_per_component = dict
            .get("BitsPerComponent")
            .and_then(|o| o.as_integer())
            .map(|v| v as u8);
        let is_mask = dict
            .get("ImageMask")
            .and_then(|o| o.as_bool())
            .unwrap_or(false);
        let color_space = dict
            .get("ColorSpace")
            .map(ColorSpace::from_object)
            .unwrap_or(ColorSpace::Other("None".to_string()));
        let filters = dict
            .get("Filter")
            .map(|f| match f {
                Object::Name(n) => vec![n.clone()],
                Object::Array(arr) => arr.iter().filter_map(|o| o.as_name().map(str::to_string)).collect(),
                _ => vec![],
            })
            .unwrap_or_default();

        images.push(ImageDescriptor {
            name,
            width,
            height,
            bits_per_component,
            color_space,
            filters,
            is_mask,
        });
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_space_from_array_uses_family_name() {
        let obj = Object::Array(vec![Object::Name("Indexed".to_string()), Object::Null]);
        assert_eq!(ColorSpace::from_object(&obj), ColorSpace::Indexed);
    }

    #[test]
    fn color_space_unknown_name_is_kept_verbatim() {
        let obj = Object::Name("Separation".to_string());
        assert_eq!(ColorSpace::from_object(&obj), ColorSpace::Other("Separation".to_string()));
    }
}
