use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::catalog::Catalog;
use crate::error::BotError;

/// Source of uniform indices for [`pick`].
pub trait RandomSource: Send {
    /// Returns an index in `[0, len)`. Only called with `len > 0`.
    fn index(&mut self, len: usize) -> usize;
}

/// Production random source backed by [`StdRng`].
pub struct StdRandom(StdRng);

impl StdRandom {
    /// Seeds from the wall clock, once per invocation.
    pub fn from_clock() -> Self {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self::with_seed(nanos as u64)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for StdRandom {
    fn index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Picks one disease from the catalog.
pub fn pick<'a>(catalog: &'a Catalog, rng: &mut dyn RandomSource) -> Result<&'a str, BotError> {
    info!("Getting random disease from list of diseases");

    let len = catalog.len();
    if len == 0 {
        return Err(BotError::EmptyCatalog {
            origin: catalog.origin().to_string(),
        });
    }

    let index = rng.index(len);
    catalog
        .entries()
        .get(index)
        .map(String::as_str)
        .ok_or(BotError::SelectionOutOfRange { index, len })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(usize);

    impl RandomSource for Fixed {
        fn index(&mut self, _len: usize) -> usize {
            self.0
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_entries(vec!["foo".into(), "bar".into(), "baz".into()])
    }

    #[test]
    fn test_pick_uses_drawn_index() {
        let catalog = catalog();
        assert_eq!(pick(&catalog, &mut Fixed(0)).unwrap(), "foo");
        assert_eq!(pick(&catalog, &mut Fixed(2)).unwrap(), "baz");
    }

    #[test]
    fn test_pick_empty_catalog() {
        let catalog = Catalog::from_entries(Vec::new());
        let err = pick(&catalog, &mut Fixed(0)).unwrap_err();

        assert!(matches!(err, BotError::EmptyCatalog { .. }));
    }

    #[test]
    fn test_pick_rejects_out_of_range_index() {
        let catalog = catalog();
        let err = pick(&catalog, &mut Fixed(3)).unwrap_err();

        assert!(matches!(
            err,
            BotError::SelectionOutOfRange { index: 3, len: 3 }
        ));
    }

    #[test]
    fn test_std_random_stays_in_catalog() {
        let catalog = catalog();
        let mut rng = StdRandom::from_clock();

        for _ in 0..200 {
            let disease = pick(&catalog, &mut rng).unwrap();
            assert!(catalog.entries().iter().any(|d| d == disease));
        }
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let mut a = StdRandom::with_seed(42);
        let mut b = StdRandom::with_seed(42);

        let draws_a: Vec<usize> = (0..20).map(|_| a.index(10)).collect();
        let draws_b: Vec<usize> = (0..20).map(|_| b.index(10)).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn test_std_random_covers_every_entry() {
        let mut rng = StdRandom::with_seed(7);
        let mut seen = [false; 3];

        for _ in 0..300 {
            seen[rng.index(3)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
