use rand::Rng;

/// Returns a uniformly random permutation of `pool`'s characters.
/// An empty pool is a valid input and yields an empty permutation.
pub fn shuffle<R: Rng>(rng: &mut R, pool: &str) -> String {
    let chars: Vec<char> = pool.chars().collect();
    random_indexes(rng, chars.len())
        .into_iter()
        .map(|i| chars[i])
        .collect()
}

/// Draws `len` distinct indices in `[0, len)` by rejection sampling: keep
/// drawing uniform indices, keep only first sightings. Worst case unbounded
/// but fine for pools of at most a couple hundred characters.
fn random_indexes<R: Rng>(rng: &mut R, len: usize) -> Vec<usize> {
    let mut indexes: Vec<usize> = Vec::with_capacity(len);
    while indexes.len() < len {
        let candidate = rng.gen_range(0..len);
        if !indexes.contains(&candidate) {
            indexes.push(candidate);
        }
    }
    indexes
}
