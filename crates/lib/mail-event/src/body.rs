//! Body part selection and charset decoding.

use mailparse::{DispositionType, ParsedMail};

use crate::{CharsetError, ParseError};

/// Raw body bytes of the chosen part together with its declared charset.
pub(crate) struct RawBody {
    /// Payload with the transfer encoding removed.
    pub bytes: Vec<u8>,

    /// Lower-cased charset parameter, if the part declares one.
    pub charset: Option<String>,
}

/// Pick the part that carries the message text.
///
/// For `multipart/*` messages every part is visited depth-first and the last
/// inline `text/plain` part wins. Anything else uses its own payload.
pub(crate) fn extract(mail: &ParsedMail<'_>) -> Result<Option<RawBody>, ParseError> {
    let part = if mail.ctype.mimetype.starts_with("multipart/") {
        match walk(mail).filter(|part| is_inline_plain_text(part)).last() {
            Some(part) => part,
            None => return Ok(None),
        }
    } else {
        mail
    };

    let bytes = part.get_body_raw().map_err(ParseError::Mime)?;
    let charset = part
        .ctype
        .params
        .get("charset")
        .map(|charset| charset.trim().to_ascii_lowercase());

    Ok(Some(RawBody { bytes, charset }))
}

/// Decode body bytes into text.
///
/// With a declared charset the decode is strict; without one the bytes are read
/// as UTF-8 and invalid sequences become U+FFFD.
pub fn decode_text(bytes: &[u8], charset: Option<&str>) -> Result<String, CharsetError> {
    let Some(label) = charset else {
        return Ok(String::from_utf8_lossy(bytes).into_owned());
    };

    let encoding = encoding_rs::Encoding::for_label(label.as_bytes())
        .ok_or_else(|| CharsetError::Unknown(label.to_owned()))?;

    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| CharsetError::Malformed(label.to_owned()))
}

/// Depth-first, pre-order walk over a part and all of its descendants.
fn walk<'p, 'm>(root: &'p ParsedMail<'m>) -> impl Iterator<Item = &'p ParsedMail<'m>> {
    let mut stack = vec![root];
    std::iter::from_fn(move || {
        let part = stack.pop()?;
        stack.extend(part.subparts.iter().rev());
        Some(part)
    })
}

/// Whether the part is `text/plain` and not marked as an attachment.
///
/// Only the disposition type counts, compared case-insensitively. Parameters
/// such as `filename="attachment.txt"` do not exclude an inline part.
fn is_inline_plain_text(part: &ParsedMail<'_>) -> bool {
    part.ctype.mimetype == "text/plain"
        && part.get_content_disposition().disposition != DispositionType::Attachment
}
