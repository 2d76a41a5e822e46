//! Order numbers
//!
//! Human-readable order references of the form `ORD-<epoch millis>-<0..=999>`.
//! Because the number doubles as a lookup key, generation re-rolls while the
//! candidate is already taken instead of trusting the timestamp+random pair
//! to be unique.

use chrono::Utc;
use rand::Rng;

/// Prefix shared by all order numbers.
pub const ORDER_NUMBER_PREFIX: &str = "ORD";

/// Generate a fresh order number, re-rolling on collision.
pub fn generate(mut is_taken: impl FnMut(&str) -> bool) -> String {
    let mut rng = rand::thread_rng();

    loop {
        let millis = Utc::now().timestamp_millis();
        let suffix: u16 = rng.gen_range(0..1000);
        let candidate = format!("{ORDER_NUMBER_PREFIX}-{millis}-{suffix}");
        if !is_taken(&candidate) {
            return candidate;
        }
    }
}
