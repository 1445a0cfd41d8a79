//! Branchable move history.
//!
//! States live in a persistent `im::Vector`, so cloning a timeline (for a
//! snapshot) shares structure instead of copying every state.

use im::Vector;

/// Ordered states plus a cursor.
///
/// The cursor is always a valid index. Pushing after an undo drops every
/// state past the cursor first, so there is never more than one future.
///
/// ## Example
///
/// ```
/// use mcts_arena::session::Timeline;
///
/// let mut timeline = Timeline::new("start");
/// timeline.push("a");
/// timeline.push("b");
/// timeline.undo();
/// timeline.push("c");
///
/// assert_eq!(timeline.len(), 3);
/// assert_eq!(*timeline.current(), "c");
/// assert!(!timeline.can_redo());
/// ```
#[derive(Clone, Debug)]
pub struct Timeline<S: Clone> {
    states: Vector<S>,
    index: usize,
}

impl<S: Clone> Timeline<S> {
    /// A timeline holding only `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            states: Vector::unit(initial),
            index: 0,
        }
    }

    /// State under the cursor.
    #[must_use]
    pub fn current(&self) -> &S {
        &self.states[self.index]
    }

    /// Cursor position.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: a timeline holds at least one state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.states.len()
    }

    /// Append `state` after the cursor, discarding any redo future.
    ///
    /// Returns the new cursor position.
    pub fn push(&mut self, state: S) -> usize {
        self.states.truncate(self.index + 1);
        self.states.push_back(state);
        self.index = self.states.len() - 1;
        self.index
    }

    /// Step the cursor back. `None` at the first state.
    pub fn undo(&mut self) -> Option<&S> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    /// Step the cursor forward. `None` at the last state.
    pub fn redo(&mut self) -> Option<&S> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    /// Replace the whole history with a single state.
    pub fn reset(&mut self, initial: S) {
        self.states = Vector::unit(initial);
        self.index = 0;
    }

    /// States from oldest to newest, including any redo future.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.states.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timeline() {
        let timeline = Timeline::new(0);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.index(), 0);
        assert_eq!(*timeline.current(), 0);
        assert!(!timeline.can_undo());
        assert!(!timeline.can_redo());
    }

    #[test]
    fn test_undo_redo() {
        let mut timeline = Timeline::new(0);
        timeline.push(1);
        timeline.push(2);

        assert_eq!(timeline.undo(), Some(&1));
        assert_eq!(timeline.undo(), Some(&0));
        assert_eq!(timeline.undo(), None);
        assert_eq!(timeline.index(), 0);

        assert_eq!(timeline.redo(), Some(&1));
        assert_eq!(timeline.redo(), Some(&2));
        assert_eq!(timeline.redo(), None);
        assert_eq!(timeline.len(), 3);
    }

    #[test]
    fn test_push_truncates_future() {
        let mut timeline = Timeline::new(0);
        for i in 1..=5 {
            timeline.push(i);
        }
        timeline.undo();
        timeline.undo();
        timeline.undo();
        assert_eq!(timeline.index(), 2);

        let index = timeline.push(10);
        assert_eq!(index, 3);
        assert_eq!(timeline.len(), 4);
        assert!(!timeline.can_redo());
        assert_eq!(timeline.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 10]);
    }

    #[test]
    fn test_reset() {
        let mut timeline = Timeline::new(0);
        timeline.push(1);
        timeline.reset(7);
        assert_eq!(timeline.len(), 1);
        assert_eq!(*timeline.current(), 7);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut timeline = Timeline::new(0);
        timeline.push(1);
        let snapshot = timeline.clone();
        timeline.push(2);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(timeline.len(), 3);
    }
}
