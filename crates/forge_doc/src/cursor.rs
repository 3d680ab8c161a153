//! Event cursor shared by nested decoders

use crate::codec::Decode;
use crate::error::{DocError, DocResult};
use crate::event::{Event, EventKind, Scalar};
use crate::node::Node;
use crate::reader::Reader;

/// Forward-only cursor over document events.
///
/// Entity decoders, container adapters and element codecs all advance the
/// same cursor, so each routine consumes exactly the node it owns.
pub struct Cursor {
    events: Vec<Event>,
    pos: usize,
}

impl Cursor {
    /// Create a cursor over already-read events
    pub fn new(events: Vec<Event>) -> Self {
        Self { events, pos: 0 }
    }

    /// Read `source` and position the cursor at its root node
    pub fn parse(source: &str) -> DocResult<Self> {
        Ok(Self::new(Reader::new(source).read_events()?))
    }

    /// Next event without consuming it
    pub fn peek(&self) -> Option<&Event> {
        self.events.get(self.pos)
    }

    /// Consume the next event
    pub fn next_event(&mut self) -> DocResult<Event> {
        let event = self
            .events
            .get(self.pos)
            .cloned()
            .ok_or(DocError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(event)
    }

    /// Line of the next event, or of the last one at end of input
    pub fn line(&self) -> usize {
        self.peek()
            .or_else(|| self.events.last())
            .map(|e| e.line)
            .unwrap_or(1)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.events.len()
    }

    pub fn expect_mapping_start(&mut self) -> DocResult<()> {
        let event = self.next_event()?;
        match event.kind {
            EventKind::MappingStart => Ok(()),
            _ => Err(unexpected(&event, "mapping")),
        }
    }

    /// Consume a mapping end if it is next
    pub fn next_is_mapping_end(&mut self) -> DocResult<bool> {
        match self.peek() {
            Some(Event {
                kind: EventKind::MappingEnd,
                ..
            }) => {
                self.pos += 1;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(DocError::UnexpectedEnd),
        }
    }

    pub fn expect_sequence_start(&mut self) -> DocResult<()> {
        let event = self.next_event()?;
        match event.kind {
            EventKind::SequenceStart => Ok(()),
            _ => Err(unexpected(&event, "sequence")),
        }
    }

    /// Consume a sequence end if it is next
    pub fn next_is_sequence_end(&mut self) -> DocResult<bool> {
        match self.peek() {
            Some(Event {
                kind: EventKind::SequenceEnd,
                ..
            }) => {
                self.pos += 1;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(DocError::UnexpectedEnd),
        }
    }

    pub fn expect_scalar(&mut self) -> DocResult<Scalar> {
        let event = self.next_event()?;
        match event.kind {
            EventKind::Scalar(scalar) => Ok(scalar),
            _ => Err(unexpected(&event, "scalar")),
        }
    }

    /// Consume a null scalar if it is next
    pub fn next_is_null(&mut self) -> bool {
        let is_null = matches!(
            self.peek(),
            Some(Event { kind: EventKind::Scalar(s), .. }) if s.is_null()
        );
        if is_null {
            self.pos += 1;
        }
        is_null
    }

    /// Parse the next scalar with `FromStr`
    pub fn parse_scalar<T: std::str::FromStr>(&mut self, expected: &'static str) -> DocResult<T> {
        let line = self.line();
        let scalar = self.expect_scalar()?;
        scalar
            .value
            .trim()
            .parse()
            .map_err(|_| DocError::InvalidScalar {
                line,
                expected,
                value: scalar.value,
            })
    }

    /// Decode the next node into an opaque placeholder and discard it
    pub fn skip_node(&mut self) -> DocResult<()> {
        let line = self.line();
        let skipped = Node::decode(self)?;
        log::debug!("skipped {} at line {}", skipped.kind_name(), line);
        Ok(())
    }

    pub fn decode<T: Decode>(&mut self) -> DocResult<T> {
        T::decode(self)
    }

    /// Fail if anything is left after the root node
    pub fn finish(self) -> DocResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(event) => Err(DocError::syntax(
                event.line,
                format!("unexpected {} after the document root", event.kind.describe()),
            )),
        }
    }
}

pub(crate) fn unexpected(event: &Event, expected: &'static str) -> DocError {
    DocError::UnexpectedNode {
        line: event.line,
        expected,
        found: event.kind.describe(),
    }
}
