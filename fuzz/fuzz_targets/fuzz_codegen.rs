#![no_main]

use libfuzzer_sys::fuzz_target;
use tbf::settings::CodegenOptions;
use tbf::{generate_c, validate};
use tbf_fuzz::FuzzInputSrc;

fuzz_target!(|data: FuzzInputSrc| {
    let generated = generate_c(&data.code, &CodegenOptions::default());
    assert_eq!(generated.is_ok(), validate(&data.code).is_ok());
    if let Ok(c) = generated {
        assert_eq!(c.matches('{').count(), c.matches('}').count());
    }
});
