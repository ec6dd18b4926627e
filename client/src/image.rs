//! Finding images in HTML.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IMG_TAG: Regex = Regex::new(r"(?is)<img\b[^>]*>").unwrap();
    static ref ATTRIBUTE: Regex = Regex::new(
        r#"(?is)\s([a-z][a-z0-9_:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#
    )
    .unwrap();
}

/// Returns the `src` of the first `<img>` element, or of the one with
/// the given `id`.
pub fn find_image_src<'h>(html: &'h str, id: Option<&str>) -> Option<&'h str> {
    IMG_TAG.find_iter(html).find_map(|tag| {
        let mut src = None;
        let mut tag_id = None;

        for attr in ATTRIBUTE.captures_iter(tag.as_str()) {
            let value = attr
                .get(2)
                .or_else(|| attr.get(3))
                .or_else(|| attr.get(4))
                .map(|v| v.as_str());

            match attr[1].to_ascii_lowercase().as_str() {
                "src" => src = value,
                "id" => tag_id = value,
                _ => {}
            }
        }

        match id {
            Some(id) if tag_id != Some(id) => None,
            _ => src,
        }
    })
}
