use http::{Method, StatusCode};
use tracing::{debug, warn};

use crate::codec::HeaderTable;
use crate::codec::segment::{last_token, parse_number};
use crate::ensure;
use crate::protocol::{Limits, NumberError, ProtocolError};

/// Whether the message being framed is a request or a reply.
///
/// Replies carry the status and the method of the request they answer, since both
/// decide whether a body may follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Reply { status: StatusCode, method: Method },
}

impl MessageKind {
    pub fn reply(status: StatusCode, method: &Method) -> Self {
        Self::Reply { status, method: method.clone() }
    }

    #[inline]
    pub fn is_reply(&self) -> bool {
        matches!(self, MessageKind::Reply { .. })
    }

    /// Returns true for replies that never carry a body: 1xx, 204, 304 and any reply
    /// to HEAD.
    pub fn forbids_body(&self) -> bool {
        match self {
            MessageKind::Request => false,
            MessageKind::Reply { status, method } => {
                status.is_informational()
                    || *status == StatusCode::NO_CONTENT
                    || *status == StatusCode::NOT_MODIFIED
                    || *method == Method::HEAD
            }
        }
    }
}

/// How the body of a message is delimited.
///
/// - Known length: exactly that many bytes follow the header block
/// - Chunked: size-prefixed chunks followed by a trailer block
/// - Until close: everything up to end of input (replies only)
/// - Empty: no body at all
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Framing {
    Empty,
    Length(u64),
    Chunked,
    UntilClose,
}

impl Framing {
    #[inline]
    pub fn is_chunked(&self) -> bool {
        matches!(self, Framing::Chunked)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Framing::Empty)
    }

    /// Decides the framing of a message from its header block.
    ///
    /// Rules are tried in order and the first match wins:
    ///
    /// 1. a reply that forbids a body is empty
    /// 2. `Transfer-Encoding` whose final coding is `chunked` means chunked, and any
    ///    `Content-Length` is ignored
    /// 3. a single valid `Content-Length` gives the exact length
    /// 4. otherwise a reply runs until close and a request is empty
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if `Content-Length` is unparsable, repeated with
    /// different values, or larger than the entity limit.
    pub fn detect(header: &HeaderTable<'_>, kind: &MessageKind, limits: &Limits) -> Result<Self, ProtocolError> {
        if kind.forbids_body() {
            debug!(?kind, "reply cannot carry a body");
            return Ok(Framing::Empty);
        }

        // refer: https://www.rfc-editor.org/rfc/rfc9112.html#name-message-body-length
        if is_chunked(header) {
            if header.contains("content-length") {
                warn!("content-length ignored, transfer-encoding is chunked");
            }
            return Ok(Framing::Chunked);
        }

        if let Some(length) = content_length(header)? {
            ensure!(
                usize::try_from(length).is_ok_and(|length| length <= limits.entity_size()),
                ProtocolError::too_large("content-length exceeds entity limit")
            );
            return Ok(Framing::Length(length));
        }

        Ok(if kind.is_reply() { Framing::UntilClose } else { Framing::Empty })
    }
}

/// Returns true if the last `Transfer-Encoding` field names `chunked` as its final coding.
fn is_chunked(header: &HeaderTable<'_>) -> bool {
    header
        .lookup_all("transfer-encoding")
        .last()
        .and_then(|value| last_token(value.as_bytes()))
        .is_some_and(|token| token.eq_ignore_ascii_case(b"chunked"))
}

/// Reads `Content-Length`, accepting repeats only when they all agree.
fn content_length(header: &HeaderTable<'_>) -> Result<Option<u64>, ProtocolError> {
    let mut length = None;

    for value in header.lookup_all("content-length") {
        let parsed = parse_number(value.as_bytes().trim_ascii()).map_err(|e| match e {
            NumberError::Overflow => ProtocolError::too_large("content-length exceeds entity limit"),
            NumberError::Empty | NumberError::InvalidDigit => ProtocolError::conflict("invalid content-length"),
        })?;

        match length {
            Some(previous) if previous != parsed => {
                return Err(ProtocolError::conflict("conflicting content-length values"));
            }
            _ => length = Some(parsed),
        }
    }

    Ok(length)
}
