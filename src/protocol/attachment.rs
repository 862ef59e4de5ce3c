//! Confirmation document decoding.
//!
//! Document bytes arrive either as base64 text or as a sequence of byte
//! values (signed or unsigned, one element per byte or a delimited list).
//! Both are normalized to a single `Vec<u8>`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::xml::XmlNode;
use crate::error::TransportError;

/// Decodes base64 text, ignoring embedded whitespace and line breaks.
///
/// # Example
///
/// ```
/// use sgk_gateway::protocol::decode_base64;
///
/// assert_eq!(decode_base64("JVBE\nRg==").unwrap(), b"%PDF".to_vec());
/// ```
pub fn decode_base64(text: &str) -> Result<Vec<u8>, TransportError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| TransportError::MalformedResponse {
            message: format!("invalid base64 document: {}", e),
        })
}

/// Decodes a list of byte values separated by commas or whitespace.
///
/// Values in `-128..=-1` are read as signed bytes.
///
/// # Example
///
/// ```
/// use sgk_gateway::protocol::decode_byte_list;
///
/// assert_eq!(decode_byte_list("37, 80, -1").unwrap(), vec![37, 80, 255]);
/// ```
pub fn decode_byte_list(text: &str) -> Result<Vec<u8>, TransportError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(parse_byte)
        .collect()
}

fn parse_byte(token: &str) -> Result<u8, TransportError> {
    let invalid = || TransportError::MalformedResponse {
        message: format!("invalid byte value '{}' in document", token),
    };
    let value: i16 = token.trim().parse().map_err(|_| invalid())?;
    match value {
        -128..=-1 => Ok((value + 256) as u8),
        0..=255 => Ok(value as u8),
        _ => Err(invalid()),
    }
}

/// Decodes the document elements of a response.
///
/// Returns `Ok(None)` when the response carries no document content. A
/// blank element inside a byte sequence is malformed.
pub(crate) fn decode_attachment(nodes: &[&XmlNode]) -> Result<Option<Vec<u8>>, TransportError> {
    let bytes = match nodes {
        [] => return Ok(None),
        [single] if !single.children.is_empty() => decode_elements(single.children.iter())?,
        [single] => match single.value() {
            None => return Ok(None),
            Some(text) => decode_text(text)?,
        },
        many => decode_elements(many.iter().copied())?,
    };
    Ok(Some(bytes).filter(|b| !b.is_empty()))
}

fn decode_elements<'a>(
    elements: impl Iterator<Item = &'a XmlNode>,
) -> Result<Vec<u8>, TransportError> {
    elements
        .enumerate()
        .map(|(position, element)| {
            let value = element
                .value()
                .ok_or_else(|| TransportError::MalformedResponse {
                    message: format!("blank byte element at position {} in document", position),
                })?;
            parse_byte(value)
        })
        .collect()
}

fn decode_text(text: &str) -> Result<Vec<u8>, TransportError> {
    if text.contains(',') || is_spaced_byte_list(text) {
        return decode_byte_list(text);
    }
    decode_base64(text).or_else(|base64_error| {
        decode_byte_list(text).map_err(|_| TransportError::MalformedResponse {
            message: format!(
                "document is neither base64 nor a byte list ({})",
                base64_error
            ),
        })
    })
}

/// Two or more whitespace-separated tokens, each a byte value.
fn is_spaced_byte_list(text: &str) -> bool {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.len() > 1 && tokens.iter().all(|token| parse_byte(token).is_ok())
}
