//! Chronologically ordered child keys.
//!
//! Keys are 20 characters: 8 encode the millisecond timestamp, 12 are
//! random. Within one millisecond the random part is incremented so keys
//! generated by one store always sort in insertion order.

use crate::task::domain::{ChildKey, TaskDomainError};

const PUSH_ALPHABET: &[u8; 64] =
    b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";
const TIMESTAMP_CHARS: usize = 8;
const RANDOM_CHARS: usize = 12;
const DIGIT_MASK: u8 = 63;

#[derive(Debug, Default)]
pub(crate) struct PushKeyGenerator {
    last_millis: Option<u64>,
    last_random: [u8; RANDOM_CHARS],
}

impl PushKeyGenerator {
    /// Produces the key for a child inserted at `millis`, drawing the random
    /// part from `entropy` when the millisecond changes.
    pub(crate) fn next_key(
        &mut self,
        millis: u64,
        entropy: &[u8; 16],
    ) -> Result<ChildKey, TaskDomainError> {
        if self.last_millis == Some(millis) {
            increment(&mut self.last_random);
        } else {
            for (digit, byte) in self.last_random.iter_mut().zip(entropy) {
                *digit = byte & DIGIT_MASK;
            }
            self.last_millis = Some(millis);
        }

        let mut stamp = [0_u8; TIMESTAMP_CHARS];
        let mut remaining = millis;
        for digit in stamp.iter_mut().rev() {
            *digit = u8::try_from(remaining & u64::from(DIGIT_MASK)).unwrap_or_default();
            remaining >>= 6;
        }

        let key: String = stamp
            .iter()
            .chain(self.last_random.iter())
            .map(|digit| encode(*digit))
            .collect();
        ChildKey::new(key)
    }
}

fn increment(digits: &mut [u8; RANDOM_CHARS]) {
    for digit in digits.iter_mut().rev() {
        if *digit == DIGIT_MASK {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
}

fn encode(digit: u8) -> char {
    PUSH_ALPHABET
        .get(usize::from(digit & DIGIT_MASK))
        .map_or('-', |byte| char::from(*byte))
}
