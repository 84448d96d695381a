//! Stack of active per-file parses with constant-time cycle detection.

use std::collections::HashSet;

/// A parse frame that can report which file it is parsing.
pub trait FrameName {
    /// The name of the file this frame parses.
    fn filename(&self) -> &str;
}

/// Stack of active parse frames, at most one per filename.
///
/// A companion set of active filenames makes the cycle check independent of
/// the include depth.
#[derive(Debug)]
pub struct ParserStack<F> {
    frames: Vec<F>,
    active: HashSet<String>,
}

impl<F: FrameName> ParserStack<F> {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            active: HashSet::new(),
        }
    }

    /// Pushes `frame` and makes it current.
    ///
    /// Returns `false`, leaving the stack untouched, when a frame for the same
    /// file is already active.
    pub fn push(&mut self, frame: F) -> bool {
        if !self.active.insert(frame.filename().to_string()) {
            return false;
        }
        self.frames.push(frame);
        true
    }

    /// Removes and returns the current frame; the previous frame becomes
    /// current. Returns `None` on an empty stack.
    pub fn pop(&mut self) -> Option<F> {
        let frame = self.frames.pop()?;
        self.active.remove(frame.filename());
        Some(frame)
    }

    /// The frame being parsed.
    pub fn current(&self) -> Option<&F> {
        self.frames.last()
    }

    /// Mutable access to the frame being parsed.
    pub fn current_mut(&mut self) -> Option<&mut F> {
        self.frames.last_mut()
    }

    /// Returns `true` when `filename` is being parsed.
    pub fn contains(&self, filename: &str) -> bool {
        self.active.contains(filename)
    }

    /// Active filenames, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|f| f.filename())
    }

    /// Number of active frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` when nothing is being parsed.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl<F: FrameName> Default for ParserStack<F> {
    fn default() -> Self {
        Self::new()
    }
}
