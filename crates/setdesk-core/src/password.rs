//! Rotation-cycle passwords.
//!
//! Every date inside the same cycle maps to the same password, so a reset
//! and the notice announcing it agree without storing the secret. The
//! format is `AAAAA-XXXXX-XXXXX`: five uppercase letters, then two groups
//! of five uppercase letters or digits.

use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collab::PasswordSource;

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LETTERS_DIGITS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotatingPassword {
    anchor: NaiveDate,
    interval_weeks: u32,
}

impl RotatingPassword {
    /// `interval_weeks` below one is treated as one.
    pub fn new(anchor: NaiveDate, interval_weeks: u32) -> Self {
        Self {
            anchor,
            interval_weeks: interval_weeks.max(1),
        }
    }

    /// Cycle index of `date`. Dates before the anchor get negative cycles.
    pub fn cycle_on(&self, date: NaiveDate) -> i64 {
        let weeks = (date - self.anchor).num_days().div_euclid(7);
        weeks.div_euclid(i64::from(self.interval_weeks))
    }

    pub fn password_on(&self, date: NaiveDate) -> String {
        let mut rng = StdRng::seed_from_u64(self.cycle_on(date) as u64);
        let mut pick = |charset: &[u8]| -> String {
            (0..5)
                .map(|_| charset[rng.gen_range(0..charset.len())] as char)
                .collect()
        };
        let head = pick(LETTERS);
        let mid = pick(LETTERS_DIGITS);
        let tail = pick(LETTERS_DIGITS);
        format!("{head}-{mid}-{tail}")
    }
}

impl PasswordSource for RotatingPassword {
    fn current_password(&self) -> String {
        self.password_on(Utc::now().date_naive())
    }
}
