/// Ordered record of what an agent did during one episode.
///
/// Bandit agents record `(arm, reward)` pairs; game players record state
/// transitions. The owner clears it at episode start and only exposes it
/// read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeHistory<T> {
    entries: Vec<T>,
}

impl<T> Default for EpisodeHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EpisodeHistory<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: vec![] }
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn entries(&self) -> &[T] {
        &self.entries
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
