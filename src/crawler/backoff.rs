//! Jittered delay between listing pages
//!
//! The delay recurrence is
//!
//! ```text
//! new_seed = SubtractiveRng::from_seed(seed).next_u32() % 100
//! delay    = new_seed * unit
//! ```
//!
//! The generator is rebuilt from the current seed on every step instead of
//! being advanced, so the whole delay sequence is a function of the initial
//! seed alone. With the default seed of 42 the seeds run 10, 1, 18, 18, ...
//! This is pacing, not randomness; nothing here is suitable for security use.

use rand::{Error, RngCore, SeedableRng};
use std::time::Duration;

use crate::config::{DEFAULT_BACKOFF_SEED, DEFAULT_DELAY_UNIT_MS};

/// Delays are drawn from `0..MODULUS` units
const MODULUS: u32 = 100;

const MBIG: i32 = i32::MAX;
const MSEED: i32 = 161_803_398;

/// Knuth's subtractive generator, seeded the way the legacy .NET
/// `System.Random(int)` constructor seeds it
///
/// Outputs are in `0..i32::MAX`, so the top bit of `next_u32` is always zero.
#[derive(Debug, Clone)]
pub struct SubtractiveRng {
    seed_array: [i32; 56],
    inext: usize,
    inextp: usize,
}

impl SubtractiveRng {
    fn from_i32(seed: i32) -> Self {
        let subtraction = if seed == i32::MIN {
            MBIG
        } else {
            seed.wrapping_abs()
        };

        let mut seed_array = [0i32; 56];
        let mut mj = MSEED.wrapping_sub(subtraction);
        seed_array[55] = mj;
        let mut mk: i32 = 1;

        for i in 1..55 {
            let ii = (21 * i) % 55;
            seed_array[ii] = mk;
            mk = mj.wrapping_sub(mk);
            if mk < 0 {
                mk = mk.wrapping_add(MBIG);
            }
            mj = seed_array[ii];
        }

        for _ in 1..5 {
            for i in 1..56 {
                seed_array[i] = seed_array[i].wrapping_sub(seed_array[1 + (i + 30) % 55]);
                if seed_array[i] < 0 {
                    seed_array[i] = seed_array[i].wrapping_add(MBIG);
                }
            }
        }

        Self {
            seed_array,
            inext: 0,
            inextp: 21,
        }
    }

    fn sample(&mut self) -> i32 {
        self.inext += 1;
        if self.inext >= 56 {
            self.inext = 1;
        }
        self.inextp += 1;
        if self.inextp >= 56 {
            self.inextp = 1;
        }

        let mut value = self.seed_array[self.inext].wrapping_sub(self.seed_array[self.inextp]);
        if value == MBIG {
            value -= 1;
        }
        if value < 0 {
            value = value.wrapping_add(MBIG);
        }

        self.seed_array[self.inext] = value;
        value
    }
}

impl RngCore for SubtractiveRng {
    fn next_u32(&mut self) -> u32 {
        self.sample() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SubtractiveRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::from_i32(i32::from_le_bytes(seed))
    }
}

/// Computes the pause before each follow-up page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    initial_seed: u32,
    unit: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial_seed: DEFAULT_BACKOFF_SEED,
            unit: Duration::from_millis(DEFAULT_DELAY_UNIT_MS),
        }
    }
}

impl Backoff {
    /// Creates a backoff with a starting seed and the length of one step
    pub fn new(initial_seed: u32, unit: Duration) -> Self {
        Self { initial_seed, unit }
    }

    /// Seed a fresh crawl starts from
    pub fn initial_seed(&self) -> u32 {
        self.initial_seed
    }

    /// Derives the next seed from `seed`
    pub fn next_seed(seed: u32) -> u32 {
        let mut rng = SubtractiveRng::from_seed(seed.to_le_bytes());
        rng.next_u32() % MODULUS
    }

    /// Returns the delay to wait and the seed to carry forward
    ///
    /// The delay is the new seed expressed in units.
    pub fn next_delay(&self, seed: u32) -> (Duration, u32) {
        let new_seed = Self::next_seed(seed);
        (self.unit * new_seed, new_seed)
    }

    /// The first `count` delays of a crawl starting at the initial seed
    pub fn delay_sequence(&self, count: usize) -> Vec<Duration> {
        let mut seed = self.initial_seed;
        (0..count)
            .map(|_| {
                let (delay, next) = self.next_delay(seed);
                seed = next;
                delay
            })
            .collect()
    }
}
