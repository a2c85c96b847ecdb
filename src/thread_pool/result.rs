use crate::error::{Error, Result};

/// Per-worker outcomes, slot `i` belonging to worker `i`.
#[derive(Debug)]
pub struct PoolResult<T> {
    slots: Vec<Result<T>>,
}

impl<T> PoolResult<T> {
    pub(crate) fn new(slots: Vec<Result<T>>) -> Self {
        PoolResult { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Result<T>> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Result<T>> {
        self.slots.iter()
    }

    /// number of workers that completed with a value
    pub fn succeeded(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().err().map(|err| (index, err)))
    }

    /// All values in worker order, or the first failure.
    pub fn into_values(self) -> Result<Vec<T>> {
        self.slots.into_iter().collect()
    }

    pub fn into_inner(self) -> Vec<Result<T>> {
        self.slots
    }
}

impl<T> IntoIterator for PoolResult<T> {
    type Item = Result<T>;
    type IntoIter = std::vec::IntoIter<Result<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PoolResult<u32> {
        PoolResult::new(vec![
            Ok(1),
            Err(Error::worker_failure(1, "bad".to_string())),
            Ok(3),
        ])
    }

    #[test]
    fn counts_and_failures() {
        let result = sample();
        assert_eq!(result.len(), 3);
        assert_eq!(result.succeeded(), 2);
        let failed: Vec<usize> = result.failures().map(|(index, _)| index).collect();
        assert_eq!(failed, vec![1]);
    }

    #[test]
    fn into_values_stops_at_failure() {
        let err = sample().into_values().unwrap_err();
        assert_eq!(err.to_string(), "worker 1 failed: bad");

        let ok = PoolResult::new(vec![Ok(1), Ok(2)]).into_values().unwrap();
        assert_eq!(ok, vec![1, 2]);
    }
}
