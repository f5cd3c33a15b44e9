use proptest::prelude::*;
use crate::{Dice, Die, RollResult, Sequence};


pub(crate) fn dice_strategy() -> impl Strategy<Value = Dice> {
    (1..=20usize, 2..=100usize)
        .prop_map(|(count, sides)| Dice::new(count, Die::numbered(sides).unwrap()).unwrap())
}

/// Results of rolling a handful of d6 with known faces.
pub(crate) fn roll_result_strategy() -> impl Strategy<Value = RollResult> {
    prop::collection::vec(1..=6usize, 1..12)
        .prop_map(|values| {
            let mut rng = Sequence::faces(values.iter().copied());
            Dice::new(values.len(), Die::d6()).unwrap().roll(&mut rng)
        })
}
