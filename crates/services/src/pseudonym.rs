//! Random "Adjective_Noun" handles for anonymous authorship.
//!
//! Handles are not unique. Anything that needs a stable handle (a chat
//! session participant, a post) stores the generated value.

use rand::seq::IndexedRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "Silent", "Crimson", "Wandering", "Hidden", "Lucky", "Brave", "Clever", "Gentle",
    "Swift", "Curious", "Mellow", "Rusty", "Velvet", "Cosmic", "Frosty", "Golden",
    "Hollow", "Jolly", "Misty", "Nimble", "Quiet", "Restless", "Sleepy", "Witty",
];

const NOUNS: &[&str] = &[
    "Otter", "Falcon", "Lantern", "Comet", "Badger", "Willow", "Pebble", "Raven",
    "Harbor", "Fox", "Maple", "Nomad", "Panda", "Quill", "Sparrow", "Tiger",
    "Voyager", "Walrus", "Yeti", "Zephyr", "Cactus", "Dolphin", "Ember", "Heron",
];

/// Picks one adjective and one noun uniformly at random.
pub fn generate_pseudonym() -> String {
    generate_pseudonym_with(&mut rand::rng())
}

/// Same as [`generate_pseudonym`] with a caller-supplied source of randomness.
pub fn generate_pseudonym_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    // Both lists are non-empty constants, so `choose` always yields a word.
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Anonymous");
    let noun = NOUNS.choose(rng).copied().unwrap_or("User");
    format!("{}_{}", adjective, noun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pseudonym_is_adjective_underscore_noun() {
        for _ in 0..50 {
            let handle = generate_pseudonym();
            let (adjective, noun) = handle.split_once('_').expect("separator");
            assert!(ADJECTIVES.contains(&adjective), "unknown adjective {adjective}");
            assert!(NOUNS.contains(&noun), "unknown noun {noun}");
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_pseudonym_with(&mut StdRng::seed_from_u64(7));
        let b = generate_pseudonym_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
