#![no_main]

use libfuzzer_sys::fuzz_target;
use tbf::brackets::{find_backward_match, find_forward_match, validate, JumpTable};

fuzz_target!(|code: Vec<u8>| {
    let table = JumpTable::build(&code);
    let mut all_matched = true;
    for (pos, c) in code.iter().enumerate() {
        match c {
            b'[' => {
                let found = find_forward_match(&code, pos);
                assert_eq!(found, table.forward(&code, pos));
                match found {
                    Ok(end) => assert_eq!(find_backward_match(&code, end), Ok(pos)),
                    Err(_) => all_matched = false,
                }
            }
            b']' => {
                let found = find_backward_match(&code, pos);
                assert_eq!(found, table.backward(&code, pos));
                all_matched &= found.is_ok();
            }
            _ => assert_eq!(table.partner(pos), None),
        }
    }
    assert_eq!(validate(&code).is_ok(), all_matched);
});
