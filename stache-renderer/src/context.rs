//! Scope chain used while rendering.
//!
//! The root object is the outermost frame; every entered section that binds
//! an object or an array element pushes a new innermost frame. Names are
//! resolved innermost-first and the first frame that has the key wins.

use stache_core::{Binding, DataNode};

use crate::ast::Name;

/// Stack of data contexts, innermost last.
#[derive(Debug, Clone)]
pub struct ContextStack<'a> {
    frames: Vec<&'a DataNode>,
}

impl<'a> ContextStack<'a> {
    pub fn new(root: &'a DataNode) -> Self {
        ContextStack { frames: vec![root] }
    }

    pub fn push(&mut self, node: &'a DataNode) {
        self.frames.push(node);
    }

    /// Leave the innermost frame. The root frame is never popped.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Resolve a tag name.
    ///
    /// For dotted names only the first segment walks the scope chain; the
    /// remaining segments must be children of that value.
    pub fn resolve(&self, name: &Name) -> Binding<'a> {
        let segments = match name {
            Name::Implicit => {
                return self
                    .frames
                    .last()
                    .map_or(Binding::Missing, |&node| Binding::from(node));
            }
            Name::Path(segments) => segments,
        };
        let Some((first, rest)) = segments.split_first() else {
            return Binding::Missing;
        };
        let Some(mut node) = self.frames.iter().rev().find_map(|&frame| frame.get(first)) else {
            return Binding::Missing;
        };
        for segment in rest {
            match node.get(segment) {
                Some(child) => node = child,
                None => return Binding::Missing,
            }
        }
        Binding::from(node)
    }
}
