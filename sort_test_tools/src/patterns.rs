use std::env;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use rand::prelude::*;

use zipf::ZipfDistribution;

use parsort_comp::Record;

/// Provides a set of key patterns useful for testing and benchmarking the
/// sorting strategies. Every record's payload is stamped with its position
/// in the generated buffer, so tests can tell equal-keyed records apart.

// --- Public ---

pub fn random(len: usize) -> Vec<Record> {
    //     .
    // : . : :
    // :.:::.::

    let mut rng = new_rng();
    stamp((0..len).map(|_| rng.gen::<i32>() as f64))
}

pub fn random_unit(len: usize) -> Vec<Record> {
    // :.:.:.::
    // Uniform keys in [0, 1), the distribution the original record
    // generator produced.

    let mut rng = new_rng();
    stamp((0..len).map(|_| rng.gen::<f64>()))
}

pub fn random_uniform<R>(len: usize, range: R) -> Vec<Record>
where
    R: Into<rand::distributions::Uniform<i32>>,
{
    // :.:.:.::
    let mut rng = new_rng();

    // Abstracting over ranges in Rust :(
    let dist: rand::distributions::Uniform<i32> = range.into();

    stamp((0..len).map(|_| dist.sample(&mut rng) as f64))
}

pub fn random_zipf(len: usize, exponent: f64) -> Vec<Record> {
    // https://en.wikipedia.org/wiki/Zipf's_law
    let mut rng = new_rng();

    let dist = ZipfDistribution::new(len.max(1), exponent).unwrap();

    stamp((0..len).map(|_| dist.sample(&mut rng) as f64))
}

pub fn random_sorted(len: usize, sorted_percent: f64) -> Vec<Record> {
    //     .:
    //   .:::. :
    // .::::::.::
    // [----][--]
    //  ^      ^
    //  |      |
    // sorted  |
    //     unsorted

    let mut v = random(len);
    let sorted_len = ((len as f64) * (sorted_percent / 100.0)).round() as usize;

    v[0..sorted_len].sort_unstable_by(|a, b| a.key.total_cmp(&b.key));

    v
}

pub fn all_equal(len: usize) -> Vec<Record> {
    // ......
    // ::::::

    stamp((0..len).map(|_| 66.0))
}

pub fn ascending(len: usize) -> Vec<Record> {
    //     .:
    //   .:::
    // .:::::

    stamp((0..len).map(|i| i as f64))
}

pub fn descending(len: usize) -> Vec<Record> {
    // :.
    // :::.
    // :::::.

    stamp((0..len).rev().map(|i| i as f64))
}

pub fn saw_ascending(len: usize, saw_count: usize) -> Vec<Record> {
    //   .:  .:
    // .:::.:::

    if len == 0 {
        return Vec::new();
    }

    let mut vals = random(len);
    let chunks_size = (len / saw_count.max(1)).max(1);

    for chunk in vals.chunks_mut(chunks_size) {
        chunk.sort_unstable_by(|a, b| a.key.total_cmp(&b.key));
    }

    vals
}

pub fn saw_descending(len: usize, saw_count: usize) -> Vec<Record> {
    // :.  :.
    // :::.:::.

    if len == 0 {
        return Vec::new();
    }

    let mut vals = random(len);
    let chunks_size = (len / saw_count.max(1)).max(1);

    for chunk in vals.chunks_mut(chunks_size) {
        chunk.sort_unstable_by(|a, b| b.key.total_cmp(&a.key));
    }

    vals
}

pub fn saw_mixed(len: usize, saw_count: usize) -> Vec<Record> {
    // :.  :.    .::.    .:
    // :::.:::..::::::..:::

    if len == 0 {
        return Vec::new();
    }

    let mut vals = random(len);
    let chunks_size = (len / saw_count.max(1)).max(1);
    let saw_directions = random_ints(len / chunks_size + 1, 0..=1);

    for (i, chunk) in vals.chunks_mut(chunks_size).enumerate() {
        if saw_directions[i] == 0 {
            chunk.sort_unstable_by(|a, b| a.key.total_cmp(&b.key));
        } else {
            chunk.sort_unstable_by(|a, b| b.key.total_cmp(&a.key));
        }
    }

    vals
}

pub fn pipe_organ(len: usize) -> Vec<Record> {
    //   .:.
    // .:::::.

    let mut vals = random(len);

    let (first_half, second_half) = vals.split_at_mut(len / 2);
    first_half.sort_unstable_by(|a, b| a.key.total_cmp(&b.key));
    second_half.sort_unstable_by(|a, b| b.key.total_cmp(&a.key));

    vals
}

/// The per-process seed all patterns derive from. Overridable with the
/// `OVERRIDE_SEED` env var for reproducing failures.
pub fn random_init_seed() -> u64 {
    *SEED.get_or_init(|| {
        if let Some(override_seed) = env::var("OVERRIDE_SEED")
            .ok()
            .map(|seed| u64::from_str(&seed).unwrap())
        {
            override_seed
        } else {
            thread_rng().gen()
        }
    })
}

// --- Private ---

static SEED: OnceCell<u64> = OnceCell::new();

fn new_rng() -> StdRng {
    rand::SeedableRng::seed_from_u64(random_init_seed())
}

fn stamp(keys: impl Iterator<Item = f64>) -> Vec<Record> {
    keys.enumerate()
        .map(|(i, key)| Record::with_payload(key, i as u64))
        .collect()
}

fn random_ints(len: usize, range: std::ops::RangeInclusive<i32>) -> Vec<i32> {
    let mut rng = new_rng();
    let dist = rand::distributions::Uniform::from(range);
    (0..len).map(|_| dist.sample(&mut rng)).collect()
}
