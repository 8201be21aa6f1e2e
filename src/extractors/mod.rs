//! Per-page content extraction: text runs, image descriptors, XMP metadata.

pub mod images;
pub mod text;
pub mod xmp;

pub use images::{ColorSpace, ImageDescriptor, describe_page_images};
pub use text::{extract_spans, load_page_fonts};
pub use xmp::{XmpExtractor, XmpMetadata};
