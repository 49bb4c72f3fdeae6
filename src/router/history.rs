use super::table::RouteMatch;

/// How a location was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// Ordinary in-app navigation.
    Push,
    /// Full reload of the target; previous entries are discarded.
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: RouteMatch,
    pub kind: NavigationKind,
}

/// Linear navigation history. The last entry is the current location.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<Location>,
}

impl History {
    pub fn push(&mut self, route: RouteMatch) {
        self.entries.push(Location { route, kind: NavigationKind::Push });
    }

    /// Replace the whole history with `route`.
    pub fn reset(&mut self, route: RouteMatch) {
        self.entries.clear();
        self.entries.push(Location { route, kind: NavigationKind::Hard });
    }

    #[must_use]
    pub fn current(&self) -> Option<&Location> {
        self.entries.last()
    }

    /// Replace the current entry, or start the history with `route`.
    pub fn replace(&mut self, route: RouteMatch) {
        self.entries.pop();
        self.entries.push(Location { route, kind: NavigationKind::Push });
    }

    /// The entry [`History::back`] would return.
    #[must_use]
    pub fn previous(&self) -> Option<&Location> {
        self.entries.len().checked_sub(2).map(|i| &self.entries[i])
    }

    /// Drop the current entry and return the one before it. The first entry
    /// is never dropped.
    pub fn back(&mut self) -> Option<&Location> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop();
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
