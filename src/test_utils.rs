use crate::{
    settings::Settings,
    tape::{Tape, VecTape},
    ExecuteCallbackResult, ExecutionError,
};

/// Everything observable after a run
#[derive(Debug, PartialEq)]
pub struct ExecutionState {
    pub result: Option<Result<(), ExecutionError>>,
    pub tape: VecTape,
    pub output: Vec<u8>,
    /// Number of instructions executed
    pub steps: usize,
}

impl Default for ExecutionState {
    fn default() -> Self {
        Self {
            result: None,
            tape: Default::default(),
            output: Default::default(),
            steps: 0,
        }
    }
}

/// Compare two tapes cell by cell, treating missing cells as zero.
pub fn compare_tapes(tape1: &VecTape, tape2: &VecTape) -> bool {
    (0..std::cmp::max(tape1.len(), tape2.len())).all(|i| tape1.cell(i) == tape2.cell(i))
}

/// Check that two runs of the same program are indistinguishable.
pub fn compare_runs(exec1: &ExecutionState, exec2: &ExecutionState) {
    assert_eq!(exec1.result, exec2.result);
    assert_eq!(exec1.output, exec2.output);
    assert_eq!(exec1.steps, exec2.steps);
    assert_eq!(exec1.tape.cursor(), exec2.tape.cursor());
    assert!(compare_tapes(&exec1.tape, &exec2.tape));
}

/// Run a program, aborting after `max_steps` instructions.
pub fn test_execute(
    source: &[u8],
    input: &mut impl std::io::Read,
    settings: &Settings,
    max_steps: usize,
) -> ExecutionState {
    let mut steps = 0;
    let mut exec = ExecutionState::default();
    exec.result = Some(crate::execute(
        source,
        &mut exec.tape,
        settings,
        input,
        &mut exec.output,
        &mut |_, _| {
            steps += 1;
            if steps > max_steps {
                ExecuteCallbackResult::Abort
            } else {
                ExecuteCallbackResult::Continue
            }
        },
    ));
    exec.steps = steps;

    exec
}
