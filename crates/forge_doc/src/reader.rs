//! Reader for asset documents
//!
//! Source text is parsed by `yaml-rust2` and flattened into the crate's own
//! event vocabulary. Anchors, aliases, collection keys, duplicate keys and
//! multi-document streams are rejected; tags are ignored.

use std::collections::HashSet;

use yaml_rust2::parser::{Event as YamlEvent, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::error::{DocError, DocResult};
use crate::event::{Event, EventKind, Scalar, ScalarStyle};

/// Reader for asset documents
pub struct Reader<'a> {
    source: &'a str,
}

impl<'a> Reader<'a> {
    /// Create a new reader for the given source
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Read the entire source into events.
    ///
    /// An empty document yields a single null scalar.
    pub fn read_events(self) -> DocResult<Vec<Event>> {
        let mut collector = Collector::default();
        Parser::new(self.source.chars())
            .load(&mut collector, true)
            .map_err(|e| DocError::syntax(e.marker().line(), e.info()))?;

        if let Some(error) = collector.error {
            return Err(error);
        }
        if collector.events.is_empty() {
            collector
                .events
                .push(Event::new(EventKind::Scalar(Scalar::null()), 1));
        }
        log::trace!("read {} document events", collector.events.len());
        Ok(collector.events)
    }
}

enum Frame {
    Sequence,
    Mapping {
        keys: HashSet<String>,
        expect_key: bool,
    },
}

/// Receives parser events, checks the structure and keeps the first error
#[derive(Default)]
struct Collector {
    events: Vec<Event>,
    frames: Vec<Frame>,
    documents: usize,
    error: Option<DocError>,
}

impl Collector {
    fn fail(&mut self, error: DocError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn push(&mut self, kind: EventKind, line: usize) {
        self.events.push(Event::new(kind, line));
    }

    /// A node starts. Inside a mapping it alternates between key and value;
    /// keys must be unique scalars.
    fn enter_node(&mut self, key: Option<&str>, line: usize) {
        let error = match self.frames.last_mut() {
            Some(Frame::Mapping { keys, expect_key }) => {
                let is_key = *expect_key;
                *expect_key = !is_key;
                match key {
                    _ if !is_key => None,
                    None => Some(DocError::Unsupported {
                        line,
                        construct: "collection used as a mapping key",
                    }),
                    Some(key) if !keys.insert(key.to_string()) => Some(DocError::DuplicateKey {
                        line,
                        key: key.to_string(),
                    }),
                    Some(_) => None,
                }
            }
            Some(Frame::Sequence) | None => None,
        };
        if let Some(error) = error {
            self.fail(error);
        }
    }

    fn check_anchor(&mut self, anchor: usize, line: usize) {
        if anchor != 0 {
            self.fail(DocError::Unsupported {
                line,
                construct: "anchor",
            });
        }
    }
}

impl MarkedEventReceiver for Collector {
    fn on_event(&mut self, event: YamlEvent, mark: Marker) {
        if self.error.is_some() {
            return;
        }
        let line = mark.line();

        match event {
            YamlEvent::DocumentStart { .. } => {
                self.documents += 1;
                if self.documents > 1 {
                    self.fail(DocError::Unsupported {
                        line,
                        construct: "multiple documents",
                    });
                }
            }
            YamlEvent::Alias { .. } => self.fail(DocError::Unsupported {
                line,
                construct: "alias",
            }),
            YamlEvent::Scalar(value, style, anchor, ..) => {
                self.check_anchor(anchor, line);
                self.enter_node(Some(&value), line);
                let style = match style {
                    TScalarStyle::Plain => ScalarStyle::Plain,
                    TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
                    _ => ScalarStyle::DoubleQuoted,
                };
                self.push(EventKind::Scalar(Scalar { value, style }), line);
            }
            YamlEvent::SequenceStart(anchor, ..) => {
                self.check_anchor(anchor, line);
                self.enter_node(None, line);
                self.frames.push(Frame::Sequence);
                self.push(EventKind::SequenceStart, line);
            }
            YamlEvent::SequenceEnd => {
                self.frames.pop();
                self.push(EventKind::SequenceEnd, line);
            }
            YamlEvent::MappingStart(anchor, ..) => {
                self.check_anchor(anchor, line);
                self.enter_node(None, line);
                self.frames.push(Frame::Mapping {
                    keys: HashSet::new(),
                    expect_key: true,
                });
                self.push(EventKind::MappingStart, line);
            }
            YamlEvent::MappingEnd => {
                self.frames.pop();
                self.push(EventKind::MappingEnd, line);
            }
            _ => {}
        }
    }
}
