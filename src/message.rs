//! Messaging-platform boundary.
//!
//! The surrounding bot hands us a message (and optionally the message it
//! replies to); we pull out the first URL-like entity's text span. This
//! module models just enough of the platform's message shape to do that:
//! plain value objects, no platform SDK types.
//!
//! Entity offsets are UTF-16 code units, as the Telegram Bot API defines
//! them.

/// The entity kinds we care about. Everything else is `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    /// A bare URL appearing literally in the text.
    Url,
    /// A text span hyperlinked to a hidden URL.
    TextLink { url: String },
    Other,
}

/// One formatting entity attached to a message.
#[derive(Debug, Clone)]
pub struct MessageEntity {
    pub kind: EntityKind,
    /// Offset into the text, in UTF-16 code units.
    pub offset: usize,
    /// Length of the span, in UTF-16 code units.
    pub length: usize,
}

/// The slice of a platform message this crate consumes.
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub text: Option<String>,
    pub caption: Option<String>,
    pub entities: Vec<MessageEntity>,
    pub caption_entities: Vec<MessageEntity>,
    pub reply_to: Option<Box<Message>>,
}

/// Extract the first URL-like entity from a message or its reply.
///
/// Scan order: the message itself before the replied-to message. Within a
/// message, the first `Url` entity wins; `TextLink` entities are only
/// consulted via the caption-entities channel (when there are no plain
/// entities) and return their hidden URL immediately.
pub fn first_url(message: &Message) -> Option<String> {
    let mut scan: Vec<&Message> = vec![message];
    if let Some(reply) = &message.reply_to {
        scan.push(reply);
    }

    for msg in scan {
        if !msg.entities.is_empty() {
            if let Some(entity) = msg.entities.iter().find(|e| e.kind == EntityKind::Url) {
                let text = msg.text.as_deref().or(msg.caption.as_deref())?;
                return slice_utf16(text, entity.offset, entity.length);
            }
        } else if let Some(url) = msg.caption_entities.iter().find_map(|e| match &e.kind {
            EntityKind::TextLink { url } => Some(url.clone()),
            _ => None,
        }) {
            return Some(url);
        }
    }

    None
}

/// Slice `text` by a UTF-16 span. Returns `None` when the span does not
/// land on character boundaries or runs past the end.
fn slice_utf16(text: &str, offset: usize, length: usize) -> Option<String> {
    let end = offset.checked_add(length)?;
    let mut start_byte = None;
    let mut end_byte = None;
    let mut units = 0usize;

    for (byte_idx, ch) in text.char_indices() {
        if units == offset {
            start_byte = Some(byte_idx);
        }
        if units == end {
            end_byte = Some(byte_idx);
            break;
        }
        units += ch.len_utf16();
    }
    if units == offset {
        start_byte.get_or_insert(text.len());
    }
    if units == end {
        end_byte.get_or_insert(text.len());
    }

    Some(text[start_byte?..end_byte?].to_string())
}
