use crate::compat::{Rc, String, Vec, format};
use crate::error::{LocationError, Result};
use crate::history::{Action, LocationSource, Navigator};
use crate::location::{Location, NavigationTarget};
use core::cell::{Cell, RefCell};

type Listener<S> = Rc<dyn Fn(&Location<S>, Action)>;

/// Handle returned by [`MemoryHistory::listen`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Stack<S> {
    entries: Vec<Location<S>>,
    index: usize,
    action: Action,
}

/// An in-memory history stack, for tests and non-browser environments.
///
/// Cloning returns another handle to the same stack.
///
/// ```
/// use locq::{LocationSource, MemoryHistory, Navigator};
///
/// let history: MemoryHistory = MemoryHistory::with_entries(["/a", "/b"], 0)?;
/// history.push("/c".into(), None)?;
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.location().pathname, "/c");
/// # Ok::<(), locq::LocationError>(())
/// ```
pub struct MemoryHistory<S = ()> {
    stack: Rc<RefCell<Stack<S>>>,
    listeners: Rc<RefCell<Vec<(ListenerId, Listener<S>)>>>,
    next_key: Rc<Cell<u64>>,
    next_listener: Rc<Cell<u64>>,
}

impl<S> Clone for MemoryHistory<S> {
    fn clone(&self) -> Self {
        Self {
            stack: Rc::clone(&self.stack),
            listeners: Rc::clone(&self.listeners),
            next_key: Rc::clone(&self.next_key),
            next_listener: Rc::clone(&self.next_listener),
        }
    }
}

impl<S> core::fmt::Debug for MemoryHistory<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let stack = self.stack.borrow();
        f.debug_struct("MemoryHistory")
            .field("len", &stack.entries.len())
            .field("index", &stack.index)
            .field("action", &stack.action)
            .finish_non_exhaustive()
    }
}

impl<S: Clone> Default for MemoryHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone> MemoryHistory<S> {
    /// A history with a single `/` entry
    pub fn new() -> Self {
        let history = Self::empty();
        let root = Location {
            key: Some(history.create_key()),
            ..Location::default()
        };
        history.stack.borrow_mut().entries.push(root);
        history
    }

    /// A history seeded with `entries`; `initial_index` is clamped to the
    /// entry range. No entries yields a single `/` entry.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidPercentEncoding`] when a pathname does
    /// not decode.
    pub fn with_entries<I, P>(entries: I, initial_index: usize) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let history = Self::empty();
        {
            let mut stack = history.stack.borrow_mut();
            for path in entries {
                let target = NavigationTarget::from(path.as_ref());
                let key = history.create_key();
                stack
                    .entries
                    .push(Location::resolve(&target, None, Some(key), None)?);
            }
            if stack.entries.is_empty() {
                let key = history.create_key();
                stack.entries.push(Location {
                    key: Some(key),
                    ..Location::default()
                });
            }
            stack.index = initial_index.min(stack.entries.len() - 1);
        }
        Ok(history)
    }

    fn empty() -> Self {
        Self {
            stack: Rc::new(RefCell::new(Stack {
                entries: Vec::new(),
                index: 0,
                action: Action::Pop,
            })),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_key: Rc::new(Cell::new(0)),
            next_listener: Rc::new(Cell::new(0)),
        }
    }

    fn create_key(&self) -> String {
        let n = self.next_key.get();
        self.next_key.set(n + 1);
        format!("{n:06x}")
    }

    pub fn len(&self) -> usize {
        self.stack.borrow().entries.len()
    }

    /// Always false: a memory history holds at least one entry
    pub fn is_empty(&self) -> bool {
        self.stack.borrow().entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.stack.borrow().index
    }

    /// The action that produced the current entry
    pub fn action(&self) -> Action {
        self.stack.borrow().action
    }

    /// Snapshot of every entry
    pub fn entries(&self) -> Vec<Location<S>> {
        self.stack.borrow().entries.clone()
    }

    /// `pathname + search + hash` of `location`
    pub fn create_href(&self, location: &Location<S>) -> String {
        location.href()
    }

    /// Whether `go(n)` lands inside the stack without clamping
    pub fn can_go(&self, n: isize) -> bool {
        let stack = self.stack.borrow();
        stack
            .index
            .checked_add_signed(n)
            .is_some_and(|next| next < stack.entries.len())
    }

    /// Move `n` entries back (negative) or forward, clamped to the stack
    pub fn go(&self, n: isize) {
        let location = {
            let mut stack = self.stack.borrow_mut();
            let last = stack.entries.len() - 1;
            let next = stack.index.saturating_add_signed(n).min(last);
            tracing::debug!(from = stack.index, to = next, "history pop");
            stack.index = next;
            stack.action = Action::Pop;
            stack.entries[next].clone()
        };
        self.notify(&location, Action::Pop);
    }

    pub fn go_back(&self) {
        self.go(-1);
    }

    pub fn go_forward(&self) {
        self.go(1);
    }

    /// Register `listener`, called after every transition with the new
    /// location and the action that produced it.
    ///
    /// Listeners run synchronously and may navigate again.
    pub fn listen<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Location<S>, Action) + 'static,
    {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        let listener: Listener<S> = Rc::new(listener);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unlisten(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    fn notify(&self, location: &Location<S>, action: Action) {
        // Snapshot so listeners can (un)register or navigate re-entrantly
        let listeners: Vec<Listener<S>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(location, action);
        }
    }

    fn transition(
        &self,
        target: &NavigationTarget,
        state: Option<S>,
        action: Action,
    ) -> Result<()> {
        let key = self.create_key();
        let location = {
            let mut stack = self.stack.borrow_mut();
            let current = &stack.entries[stack.index];
            let location = Location::resolve(target, state, Some(key), Some(current))?;
            let index = stack.index;
            match action {
                Action::Push => {
                    stack.entries.truncate(index + 1);
                    stack.entries.push(location.clone());
                    stack.index = index + 1;
                }
                Action::Replace | Action::Pop => {
                    stack.entries[index] = location.clone();
                }
            }
            stack.action = action;
            location
        };
        tracing::debug!(?action, href = %location.href(), "history transition");
        self.notify(&location, action);
        Ok(())
    }
}

impl<S: Clone> LocationSource for MemoryHistory<S> {
    type State = S;

    fn location(&self) -> Location<S> {
        let stack = self.stack.borrow();
        stack.entries[stack.index].clone()
    }
}

impl<S: Clone> Navigator for MemoryHistory<S> {
    type Error = LocationError;

    fn push(&self, target: NavigationTarget, state: Option<S>) -> Result<()> {
        self.transition(&target, state, Action::Push)
    }

    fn replace(&self, target: NavigationTarget, state: Option<S>) -> Result<()> {
        self.transition(&target, state, Action::Replace)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn history(paths: &[&str], index: usize) -> MemoryHistory {
        MemoryHistory::with_entries(paths.iter().copied(), index).unwrap()
    }

    #[test]
    fn test_new_has_root_entry() {
        let history: MemoryHistory = MemoryHistory::new();
        assert_eq!(history.len(), 1);
        assert_eq!(history.location().pathname, "/");
        assert_eq!(history.action(), Action::Pop);
        assert!(history.location().key.is_some());
    }

    #[test]
    fn test_with_entries_clamps_index() {
        let h = history(&["/a", "/b"], 5);
        assert_eq!(h.index(), 1);
        assert_eq!(h.location().pathname, "/b");

        let h = history(&[], 0);
        assert_eq!(h.len(), 1);
        assert_eq!(h.location().pathname, "/");
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let h = history(&["/a", "/b", "/c"], 0);
        h.push("/d".into(), None).unwrap();
        let paths: Vec<String> = h.entries().into_iter().map(|l| l.pathname).collect();
        assert_eq!(paths, ["/a", "/d"]);
        assert_eq!(h.index(), 1);
        assert_eq!(h.action(), Action::Push);
    }

    #[test]
    fn test_replace_keeps_length() {
        let h = history(&["/a?x=1"], 0);
        h.replace("?x=2".into(), None).unwrap();
        assert_eq!(h.len(), 1);
        assert_eq!(h.location().pathname, "/a");
        assert_eq!(h.location().search, "?x=2");
        assert_eq!(h.action(), Action::Replace);
    }

    #[test]
    fn test_go_clamps() {
        let h = history(&["/a", "/b", "/c"], 1);
        assert!(h.can_go(1));
        assert!(!h.can_go(2));
        assert!(!h.can_go(-2));
        h.go(10);
        assert_eq!(h.index(), 2);
        h.go(-10);
        assert_eq!(h.index(), 0);
        h.go_forward();
        assert_eq!(h.location().pathname, "/b");
        h.go_back();
        assert_eq!(h.location().pathname, "/a");
        assert_eq!(h.action(), Action::Pop);
    }

    #[test]
    fn test_keys_are_unique() {
        let h = history(&["/a"], 0);
        let first = h.location().key;
        h.push("/b".into(), None).unwrap();
        assert_ne!(h.location().key, first);
    }

    #[test]
    fn test_state_is_stored() {
        let h: MemoryHistory<u32> = MemoryHistory::new();
        h.push("/a".into(), Some(3)).unwrap();
        assert_eq!(h.location().state, Some(3));
        h.go_back();
        assert_eq!(h.location().state, None);
    }

    #[test]
    fn test_listeners() {
        let h = history(&["/a"], 0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let id = h.listen({
            let seen = Rc::clone(&seen);
            move |location, action| seen.borrow_mut().push((location.href(), action))
        });

        h.push("/b?x=1".into(), None).unwrap();
        h.go_back();
        assert!(h.unlisten(id));
        assert!(!h.unlisten(id));
        h.go_forward();

        assert_eq!(
            *seen.borrow(),
            [
                (String::from("/b?x=1"), Action::Push),
                (String::from("/a"), Action::Pop),
            ]
        );
    }

    #[test]
    fn test_listener_may_navigate() {
        let h = history(&["/a"], 0);
        let inner = h.clone();
        h.listen(move |location, action| {
            if action == Action::Push && location.pathname == "/old" {
                inner.replace("/new".into(), None).unwrap();
            }
        });
        h.push("/old".into(), None).unwrap();
        assert_eq!(h.location().pathname, "/new");
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_invalid_pathname_is_rejected() {
        let h = history(&["/a"], 0);
        assert_eq!(
            h.push("/%C3%28".into(), None),
            Err(LocationError::InvalidPercentEncoding)
        );
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_encoded_question_mark_stays_in_pathname() {
        let h = history(&["/"], 0);
        h.push("/a%3Fb?x=1".into(), None).unwrap();
        let location = h.location();
        assert_eq!(location.pathname, "/a%3Fb");
        assert_eq!(location.search, "?x=1");

        let href = h.create_href(&location);
        assert_eq!(href, "/a%3Fb?x=1");
        let reread = history(&[href.as_str()], 0).location();
        assert_eq!(reread.pathname, location.pathname);
        assert_eq!(reread.search, location.search);
    }

    #[test]
    fn test_create_href() {
        let h = history(&["/a?b=c#d"], 0);
        assert_eq!(h.create_href(&h.location()), "/a?b=c#d");
        let bare = Location::<()> {
            search: String::from("?"),
            hash: String::from("#"),
            ..Location::default()
        };
        assert_eq!(h.create_href(&bare), "/");
    }
}
