//! Sortable identifiers for to-do items.
//!
//! # Design
//! Ids are ULIDs: a 48-bit millisecond timestamp followed by 80 random bits,
//! rendered as 26 lowercase Crockford base32 characters. Because the
//! timestamp leads and the alphabet is in ascending ASCII order, byte-wise
//! string comparison of two ids follows creation order whenever they were
//! minted at least one millisecond apart. Ids minted within the same
//! millisecond are unique but not ordered relative to each other.
//!
//! The clock is a port so tests can pin the timestamp half of an id.

use chrono::{DateTime, Utc};
use ulid::Ulid;

/// Length of a rendered id.
pub const ID_LEN: usize = 26;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

/// Produces primary keys for newly created items.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}

/// ULID-based generator driven by a [`Clock`].
#[derive(Debug, Clone, Default)]
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn new_id(&self) -> String {
        // Pre-epoch clocks clamp to zero rather than wrapping.
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        ulid.to_string().to_lowercase()
    }
}

/// Mint an id from the system clock.
pub fn new_id() -> String {
    UlidGenerator::new(SystemClock).new_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const ALPHABET: &str = "0123456789abcdefghjkmnpqrstvwxyz";

    #[test]
    fn ids_are_fixed_length_lowercase_crockford() {
        let id = new_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| ALPHABET.contains(c)), "{id}");
    }

    #[test]
    fn ids_are_unique() {
        let ids: std::collections::HashSet<String> = (0..1000).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn later_millisecond_sorts_after_earlier() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut previous = UlidGenerator::new(FixedClock::new(t0)).new_id();
        for step in 1..200 {
            let clock = FixedClock::new(t0 + Duration::milliseconds(step));
            let next = UlidGenerator::new(clock).new_id();
            assert!(next > previous, "{next} should sort after {previous}");
            previous = next;
        }
    }

    #[test]
    fn fixed_clock_pins_timestamp_prefix() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(FixedClock::new(at));

        let a = id_gen.new_id();
        let b = id_gen.new_id();
        assert_ne!(a, b);

        // The first 10 characters encode the 48-bit timestamp.
        assert_eq!(a[..10], b[..10]);
        let decoded = Ulid::from_string(&a.to_uppercase()).unwrap();
        assert_eq!(decoded.timestamp_ms(), at.timestamp_millis() as u64);
    }
}
