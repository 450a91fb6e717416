/// Dense table of value estimates and visit counts.
///
/// The table is pre-sized to the whole key domain: `K` entries for a K-armed
/// bandit, [`StateIndex::COUNT`](tabrl_engine::StateIndex::COUNT) entries for
/// the game. Every entry starts at the same initial value, so "unseen" simply
/// means "visit count zero".
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateTable {
    values: Vec<f64>,
    visits: Vec<u64>,
    initial: f64,
}

impl EstimateTable {
    #[must_use]
    pub fn new(len: usize, initial: f64) -> Self {
        Self {
            values: vec![initial; len],
            visits: vec![0; len],
            initial,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn initial(&self) -> f64 {
        self.initial
    }

    /// Current estimate for `key`; keys outside the table read as the initial value.
    #[must_use]
    pub fn read(&self, key: usize) -> f64 {
        self.values.get(key).copied().unwrap_or(self.initial)
    }

    #[must_use]
    pub fn visits(&self, key: usize) -> u64 {
        self.visits.get(key).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn visit_counts(&self) -> &[u64] {
        &self.visits
    }

    /// Entries with at least one visit, as `(key, value, visits)`.
    pub fn visited(&self) -> impl Iterator<Item = (usize, f64, u64)> + '_ {
        self.values
            .iter()
            .zip(&self.visits)
            .enumerate()
            .filter(|(_, (_, n))| **n > 0)
            .map(|(key, (v, n))| (key, *v, *n))
    }

    /// Increments the visit count of `key` and returns the new count.
    ///
    /// # Panics
    ///
    /// Panics if `key` is outside the table.
    pub fn record_visit(&mut self, key: usize) -> u64 {
        let len = self.len();
        let n = self
            .visits
            .get_mut(key)
            .unwrap_or_else(|| panic!("key {key} outside estimate table of {len} entries"));
        *n += 1;
        *n
    }

    /// Moves the estimate for `key` by `step * (target - estimate)`.
    ///
    /// A step of exactly 1 replaces the estimate with `target`, so the result
    /// does not depend on the previous value.
    ///
    /// # Panics
    ///
    /// Panics if `key` is outside the table.
    pub fn step_toward(&mut self, key: usize, target: f64, step: f64) {
        let value = self.value_mut(key);
        if step == 1.0 {
            *value = target;
        } else {
            *value += step * (target - *value);
        }
    }

    /// Overwrites the estimate for `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is outside the table.
    pub fn set(&mut self, key: usize, value: f64) {
        *self.value_mut(key) = value;
    }

    fn value_mut(&mut self, key: usize) -> &mut f64 {
        let len = self.len();
        self.values
            .get_mut(key)
            .unwrap_or_else(|| panic!("key {key} outside estimate table of {len} entries"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_uniform() {
        let table = EstimateTable::new(3, 0.5);
        assert_eq!(table.values(), &[0.5, 0.5, 0.5]);
        assert_eq!(table.visit_counts(), &[0, 0, 0]);
        assert_eq!(table.visited().count(), 0);
    }

    #[test]
    fn test_out_of_range_reads_as_initial() {
        let table = EstimateTable::new(2, -1.0);
        assert_eq!(table.read(10), -1.0);
        assert_eq!(table.visits(10), 0);
    }

    #[test]
    fn test_step_toward_and_visits() {
        let mut table = EstimateTable::new(2, 0.0);
        assert_eq!(table.record_visit(1), 1);
        table.step_toward(1, 4.0, 0.25);
        assert_eq!(table.read(1), 1.0);
        assert_eq!(table.visited().collect::<Vec<_>>(), vec![(1, 1.0, 1)]);
    }

    #[test]
    fn test_full_step_lands_on_target() {
        for initial in [3.0, -7.5, 1e9] {
            let mut table = EstimateTable::new(1, initial);
            table.step_toward(0, 0.3, 1.0);
            assert_eq!(table.read(0), 0.3, "initial {initial}");
        }
    }

    #[test]
    #[should_panic(expected = "outside estimate table")]
    fn test_update_outside_table_panics() {
        let mut table = EstimateTable::new(2, 0.0);
        table.set(2, 1.0);
    }
}
