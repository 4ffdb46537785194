//! Synthetic `people` rows
//!
//! The payload is illustrative: names from two fixed lists, an email derived
//! from them and a UTC creation timestamp.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Environment variable holding an optional RNG seed
pub const SEED_ENV_VAR: &str = "SQLSHIP_SEED";

const FIRST_NAMES: [&str; 10] = [
    "Anna", "David", "Maya", "Liam", "Sophie", "Alex", "Nora", "Arman", "Karen", "Sara",
];

const LAST_NAMES: [&str; 10] = [
    "Petrosyan",
    "Smith",
    "Johnson",
    "Grigoryan",
    "Brown",
    "Martirosian",
    "Lee",
    "Garcia",
    "Ivanov",
    "Khan",
];

/// One row of the `people` table, before the primary key is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: String,
}

/// Produces synthetic `Person` rows
pub struct RowGenerator {
    rng: StdRng,
}

impl RowGenerator {
    /// Deterministic generator: the same seed yields the same names
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded from `SQLSHIP_SEED` when it holds a valid integer
    pub fn from_env() -> Self {
        match std::env::var(SEED_ENV_VAR) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(seed) => {
                    tracing::info!(seed, "Using deterministic RNG seed from {}", SEED_ENV_VAR);
                    Self::seeded(seed)
                }
                Err(_) => {
                    tracing::warn!(value = %raw, "Ignoring non-numeric {}", SEED_ENV_VAR);
                    Self::from_entropy()
                }
            },
            Err(_) => Self::from_entropy(),
        }
    }

    /// Next synthetic row, stamped with the current UTC time
    pub fn next_person(&mut self) -> Person {
        let first = FIRST_NAMES[self.rng.gen_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[self.rng.gen_range(0..LAST_NAMES.len())];
        let suffix: u32 = self.rng.gen_range(0..=9999);
        Person {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}.{}{}@example.com", first, last, suffix),
            created_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_generator_is_deterministic() {
        let mut a = RowGenerator::seeded(42);
        let mut b = RowGenerator::seeded(42);

        for _ in 0..20 {
            let (pa, pb) = (a.next_person(), b.next_person());
            assert_eq!(pa.first_name, pb.first_name);
            assert_eq!(pa.last_name, pb.last_name);
            assert_eq!(pa.email, pb.email);
        }
    }

    #[test]
    fn test_email_is_derived_from_names() {
        let mut generator = RowGenerator::seeded(7);
        let person = generator.next_person();

        let prefix = format!("{}.{}", person.first_name, person.last_name);
        assert!(person.email.starts_with(&prefix));
        assert!(person.email.ends_with("@example.com"));
        assert!(FIRST_NAMES.contains(&person.first_name.as_str()));
        assert!(LAST_NAMES.contains(&person.last_name.as_str()));
    }

    #[test]
    fn test_created_at_is_utc_iso8601() {
        let person = RowGenerator::seeded(1).next_person();

        assert_eq!(person.created_at.len(), "2024-01-01T00:00:00Z".len());
        assert!(person.created_at.ends_with('Z'));
        assert!(chrono::NaiveDateTime::parse_from_str(&person.created_at, "%Y-%m-%dT%H:%M:%SZ")
            .is_ok());
    }
}
