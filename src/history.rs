use crate::location::{Location, NavigationTarget};

/// How the current entry was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Initial entry, or moved with `go`/`go_back`/`go_forward`
    #[default]
    Pop,
    Push,
    Replace,
}

/// Something that knows the current location, typically a router's history.
pub trait LocationSource {
    /// Per-entry state carried alongside each location
    type State: Clone;

    /// Snapshot of the current location
    fn location(&self) -> Location<Self::State>;
}

/// A history that can be navigated with `push` and `replace`.
///
/// Both operations must take effect synchronously: a [`LocationSource::location`]
/// call made after they return observes the new entry.
pub trait Navigator: LocationSource {
    type Error;

    /// Append a new entry, discarding any forward entries
    ///
    /// # Errors
    ///
    /// Implementation-defined; wrappers in this crate forward it unchanged.
    fn push(
        &self,
        target: NavigationTarget,
        state: Option<Self::State>,
    ) -> Result<(), Self::Error>;

    /// Overwrite the current entry
    ///
    /// # Errors
    ///
    /// Implementation-defined; wrappers in this crate forward it unchanged.
    fn replace(
        &self,
        target: NavigationTarget,
        state: Option<Self::State>,
    ) -> Result<(), Self::Error>;
}

impl<T: LocationSource + ?Sized> LocationSource for &T {
    type State = T::State;

    fn location(&self) -> Location<Self::State> {
        (**self).location()
    }
}

impl<T: Navigator + ?Sized> Navigator for &T {
    type Error = T::Error;

    fn push(
        &self,
        target: NavigationTarget,
        state: Option<Self::State>,
    ) -> Result<(), Self::Error> {
        (**self).push(target, state)
    }

    fn replace(
        &self,
        target: NavigationTarget,
        state: Option<Self::State>,
    ) -> Result<(), Self::Error> {
        (**self).replace(target, state)
    }
}
