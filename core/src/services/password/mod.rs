//! Password strength helpers sharing the token subsystem's concurrency
//! idioms.

mod sequence;

pub use sequence::{contains_keyboard_sequence, MIN_SEQUENCE_LEN};
