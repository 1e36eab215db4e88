//! Font name resolution for `Tf` operands.
//!
//! A `Tf` operand names an entry in the current `Resources/Font` dictionary.
//! The family name we report is that font's `BaseFont` (or the descriptor's
//! `FontName` when `BaseFont` is absent) with any subset tag removed.

use lopdf::{Dictionary, Document, Object};

/// Follows one level of indirection, returning the object itself otherwise.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

/// Looks up `key` in `dict` and returns it as a dictionary, following references.
pub(crate) fn get_dict<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Dictionary> {
    dict.get(key)
        .ok()
        .map(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
}

/// Resolves the resource name `resource` to the font family it refers to.
pub fn resolve_font_name(
    doc: &Document,
    resources: Option<&Dictionary>,
    resource: &[u8],
) -> Option<String> {
    let fonts = get_dict(doc, resources?, b"Font")?;
    let font = get_dict(doc, fonts, resource)?;

    let base = font
        .get(b"BaseFont")
        .ok()
        .map(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_name().ok())
        .or_else(|| {
            get_dict(doc, font, b"FontDescriptor")?
                .get(b"FontName")
                .ok()
                .map(|obj| resolve(doc, obj))
                .and_then(|obj| obj.as_name().ok())
        })?;

    let name = String::from_utf8_lossy(base);
    let name = strip_subset_tag(&name);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Removes the `ABCDEF+` prefix embedded subset fonts carry.
pub fn strip_subset_tag(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => name,
    }
}
