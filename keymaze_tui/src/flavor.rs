use keymaze_core::Outcome;
use rand::{Rng, seq::IndexedRandom};

const KEY_COLLECTED: &[&str] = &[
    "A key! Heavier than it looks.",
    "Got one. The lock is listening.",
    "Another key jingles in your pocket.",
];

const ALL_KEYS: &[&str] = &[
    "Somewhere a bolt slides back. The door is open.",
    "Every key found. Head for the door!",
];

const DOOR_LOCKED: &[&str] = &[
    "Locked tight. Find the remaining keys.",
    "The door does not budge.",
    "Rattle all you like, it needs keys.",
];

const DEATH: &[&str] = &[
    "Caught! Back to the start.",
    "The patrol got you.",
    "Ouch. Watch their rounds next time.",
];

const WIN: &[&str] = &[
    "You escaped the maze!",
    "Out into daylight. Well played.",
];

const RESET: &[&str] = &["The maze rearranges itself."];

/// Picks a status line for an outcome, or `None` when there is nothing to say.
pub fn message_for<R: Rng + ?Sized>(outcome: Outcome, rng: &mut R) -> Option<&'static str> {
    let lines = match outcome {
        Outcome::None => return None,
        Outcome::KeyCollected => KEY_COLLECTED,
        Outcome::AllKeysCollected => ALL_KEYS,
        Outcome::DoorLocked => DOOR_LOCKED,
        Outcome::Death => DEATH,
        Outcome::Win => WIN,
        Outcome::LevelReset => RESET,
    };
    lines.choose(rng).copied()
}
