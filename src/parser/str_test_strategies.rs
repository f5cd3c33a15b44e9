use proptest::prelude::*;


fn value_list(max: i64, len: usize) -> impl Strategy<Value = String> {
    prop::collection::btree_set(1..=max, 1..=len)
        .prop_map(|values| {
            values.into_iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",")
        })
}

pub(crate) fn dice_strategy() -> impl Strategy<Value = (usize, usize, String)> {
    (1usize..=20, 2usize..=20)
        .prop_map(|(count, faces)| (count, faces, format!("{count}d{faces}")))
}

pub(crate) fn operation_strategy(faces: usize) -> impl Strategy<Value = String> {
    let faces = faces as i64;
    let list_len = (faces - 1) as usize;

    prop_oneof![
        (prop_oneof!["K", "D"], prop_oneof!["h", "l"], 0usize..=3)
            .prop_map(|(op, side, n)| format!("{op}{side}{n}")),
        (prop_oneof!["Kn", "Dn", "X"], value_list(faces, list_len))
            .prop_map(|(op, list)| format!("{op}{list}")),
    ]
}

/// Well formed notation: one dice token followed by up to four operations.
/// Counts and lists are not checked against the roll, so evaluation may still
/// reject them.
pub(crate) fn notation_strategy() -> impl Strategy<Value = String> {
    dice_strategy()
        .prop_flat_map(|(_, faces, dice)| {
            prop::collection::vec(operation_strategy(faces), 0..=4)
                .prop_map(move |ops| format!("{dice}{}", ops.concat()))
        })
}
