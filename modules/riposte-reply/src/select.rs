use rand::seq::SliceRandom;
use rand::Rng;
use riposte_core::Image;

/// Upper bound on images attached to one reply.
pub const MAX_SELECTED_IMAGES: usize = 3;

/// Pick a randomized subset of candidate images: uniform shuffle, then a
/// count drawn uniformly from 1..=min(3, n). No candidates, no selection.
/// Repeated runs over identical input may select different subsets.
pub fn select_images(candidates: Vec<Image>, rng: &mut impl Rng) -> Vec<Image> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut shuffled = candidates;
    shuffled.shuffle(rng);

    let cap = shuffled.len().min(MAX_SELECTED_IMAGES);
    let count = rng.random_range(1..=cap);
    shuffled.truncate(count);
    shuffled
}
