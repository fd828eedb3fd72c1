//! Template parser.
//!
//! Single pass over the source: literal text is copied until the next `{{`,
//! the tag is classified by its sigil, and sections are matched with an
//! explicit stack of open frames.
//!
//! Section, inverted-section, closing and comment tags that sit alone on
//! their line are *standalone*: the whole line, including indentation and
//! line ending, is dropped from the output.

use crate::ast::{Name, Node};
use crate::error::TemplateError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const CLOSE_TRIPLE: &str = "}}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Variable,
    SectionOpen,
    InvertedOpen,
    SectionClose,
    Comment,
}

impl TagKind {
    fn can_stand_alone(self) -> bool {
        !matches!(self, TagKind::Variable)
    }
}

struct Tag<'s> {
    kind: TagKind,
    name: &'s str,
    /// Byte offset just past the closing delimiter.
    end: usize,
}

/// An open section awaiting its closing tag.
struct Frame {
    name: String,
    inverted: bool,
    line: usize,
    children: Vec<Node>,
}

/// Parse `source` into a node tree.
pub fn parse(source: &str) -> Result<Vec<Node>, TemplateError> {
    Parser::new(source).run()
}

struct Parser<'s> {
    src: &'s str,
    pos: usize,
    /// 1-based line of `counted_to`.
    line: usize,
    counted_to: usize,
    root: Vec<Node>,
    stack: Vec<Frame>,
}

impl<'s> Parser<'s> {
    fn new(src: &'s str) -> Self {
        Parser {
            src,
            pos: 0,
            line: 1,
            counted_to: 0,
            root: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Node>, TemplateError> {
        while let Some(offset) = self.src[self.pos..].find(OPEN) {
            let start = self.pos + offset;
            let line = self.line_at(start);
            let tag = self.read_tag(start, line)?;

            let (text_end, resume) = match self.standalone_bounds(start, &tag) {
                Some(bounds) => bounds,
                None => (start, tag.end),
            };
            self.push_text(self.pos, text_end);
            self.pos = resume;
            self.apply(tag, line)?;
        }
        self.push_text(self.pos, self.src.len());

        if let Some(frame) = self.stack.pop() {
            return Err(TemplateError::UnclosedSection {
                name: frame.name,
                line: frame.line,
            });
        }
        Ok(self.root)
    }

    fn line_at(&mut self, offset: usize) -> usize {
        self.line += self.src[self.counted_to..offset].matches('\n').count();
        self.counted_to = offset;
        self.line
    }

    fn read_tag(&self, start: usize, line: usize) -> Result<Tag<'s>, TemplateError> {
        let src = self.src;
        let after_open = start + OPEN.len();
        let rest = &src[after_open..];

        if let Some(inner) = rest.strip_prefix('{') {
            let close = inner.find(CLOSE_TRIPLE).ok_or(TemplateError::UnclosedTag {
                line,
                expected: CLOSE_TRIPLE,
            })?;
            let name = inner[..close].trim();
            if name.is_empty() {
                return Err(TemplateError::EmptyTag { line });
            }
            return Ok(Tag {
                kind: TagKind::Variable,
                name,
                end: after_open + 1 + close + CLOSE_TRIPLE.len(),
            });
        }

        let close = rest.find(CLOSE).ok_or(TemplateError::UnclosedTag {
            line,
            expected: CLOSE,
        })?;
        let content = rest[..close].trim();
        let end = after_open + close + CLOSE.len();

        let (kind, name) = match content.chars().next() {
            Some('#') => (TagKind::SectionOpen, &content[1..]),
            Some('^') => (TagKind::InvertedOpen, &content[1..]),
            Some('/') => (TagKind::SectionClose, &content[1..]),
            Some('&') => (TagKind::Variable, &content[1..]),
            Some('!') => {
                return Ok(Tag {
                    kind: TagKind::Comment,
                    name: "",
                    end,
                })
            }
            Some('>') => {
                return Err(TemplateError::Unsupported {
                    line,
                    feature: "partials",
                })
            }
            Some('=') => {
                return Err(TemplateError::Unsupported {
                    line,
                    feature: "custom delimiters",
                })
            }
            _ => (TagKind::Variable, content),
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(TemplateError::EmptyTag { line });
        }
        Ok(Tag { kind, name, end })
    }

    /// When `tag` is alone on its line, returns where the preceding text ends
    /// (start of the line) and where scanning resumes (start of next line).
    fn standalone_bounds(&self, start: usize, tag: &Tag<'_>) -> Option<(usize, usize)> {
        if !tag.kind.can_stand_alone() {
            return None;
        }
        let line_begin = self.src[..start].rfind('\n').map_or(0, |i| i + 1);
        if line_begin < self.pos || !is_blank(&self.src[line_begin..start]) {
            return None;
        }
        let rest = &self.src[tag.end..];
        let line_end = rest.find('\n').map_or(rest.len(), |i| i + 1);
        let trailing = rest[..line_end].trim_end_matches('\n').trim_end_matches('\r');
        if !is_blank(trailing) {
            return None;
        }
        Some((line_begin, tag.end + line_end))
    }

    fn apply(&mut self, tag: Tag<'s>, line: usize) -> Result<(), TemplateError> {
        match tag.kind {
            TagKind::Comment => {}
            TagKind::Variable => self.push_node(Node::Variable {
                name: Name::parse(tag.name),
            }),
            TagKind::SectionOpen | TagKind::InvertedOpen => self.stack.push(Frame {
                name: tag.name.to_owned(),
                inverted: tag.kind == TagKind::InvertedOpen,
                line,
                children: Vec::new(),
            }),
            TagKind::SectionClose => {
                let Some(frame) = self.stack.pop() else {
                    return Err(TemplateError::UnexpectedClose {
                        name: tag.name.to_owned(),
                        line,
                    });
                };
                if frame.name != tag.name {
                    return Err(TemplateError::MismatchedClose {
                        expected: frame.name,
                        found: tag.name.to_owned(),
                        line,
                    });
                }
                self.push_node(Node::Section {
                    name: Name::parse(&frame.name),
                    inverted: frame.inverted,
                    children: frame.children,
                });
            }
        }
        Ok(())
    }

    /// Appends literal text, merging with a directly preceding text node.
    fn push_text(&mut self, from: usize, to: usize) {
        if from >= to {
            return;
        }
        let src = self.src;
        let text = &src[from..to];
        let siblings = match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        };
        match siblings.last_mut() {
            Some(Node::Text(previous)) => previous.push_str(text),
            _ => siblings.push(Node::Text(text.to_owned())),
        }
    }

    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(frame) => frame.children.push(node),
            None => self.root.push(node),
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c == ' ' || c == '\t')
}
