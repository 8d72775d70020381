#![no_main]

use libfuzzer_sys::fuzz_target;
use tbf::settings::{MatchStrategy, Settings};
use tbf::test_utils::{compare_runs, test_execute};
use tbf_fuzz::FuzzInputProgram;

fuzz_target!(|data: FuzzInputProgram| {
    let source = data.source();
    let scan = Settings {
        eof: data.eof,
        strategy: MatchStrategy::Scan,
    };
    let table = Settings {
        eof: data.eof,
        strategy: MatchStrategy::JumpTable,
    };
    let exec1 = test_execute(&source, &mut data.input.clone(), &scan, 500);
    let exec2 = test_execute(&source, &mut data.input.clone(), &table, 500);
    compare_runs(&exec1, &exec2);
});
