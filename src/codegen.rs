//! Code generation
//!
//! The generated program carries its own copy of the tape: it starts with
//! [`DEFAULT_TAPE_SIZE`] cells, grows by [`TAPE_GROWTH_SIZE`] and exits with
//! status 1 on underflow or a failed allocation, the same as the interpreter.

use crate::{
    brackets::validate,
    lexer::{instructions, Instruction},
    settings::{CodegenOptions, EofBehaviour},
    tape::{TapeError, DEFAULT_TAPE_SIZE, TAPE_GROWTH_SIZE},
    BracketError, SourcePos,
};

/// Generate C code
///
/// Brackets are validated before anything is emitted. Tracing adds `#line`
/// directives so the C compiler and debuggers refer to lines of the BF
/// source.
pub fn generate_c(source: &[u8], options: &CodegenOptions) -> Result<String, BracketError> {
    validate(source)?;

    let mut s = prelude(options.eof);
    s += "int main(void) {\n";
    s += "    tape = calloc(DEFAULT_TAPE_SIZE, 1);\n";
    s += "    if (tape == NULL) {\n";
    s += format!("        {}\n", fatal(TapeError::AllocationError)).as_str();
    s += "        return EXIT_FAILURE;\n";
    s += "    }\n\n";
    s += generate_c_body(source, options.trace).as_str();
    s += "\n    fflush(stdout);\n";
    s += "    free(tape);\n";
    s += "    return 0;\n";
    s += "}\n";
    Ok(s)
}

/// Tape declaration and the helpers implementing the tape policy.
fn prelude(eof: EofBehaviour) -> String {
    let mut s: String = "#include <stdio.h>\n#include <stdlib.h>\n#include <string.h>\n\n".into();
    s += format!("#define DEFAULT_TAPE_SIZE {DEFAULT_TAPE_SIZE}\n").as_str();
    s += format!("#define TAPE_GROWTH_SIZE {TAPE_GROWTH_SIZE}\n\n").as_str();
    s += "static unsigned char *tape = NULL;\n";
    s += "static size_t tape_size = DEFAULT_TAPE_SIZE;\n";
    s += "static size_t ptr = 0;\n\n";

    s += "static void advance(void) {\n";
    s += "    if (ptr + 1 == tape_size) {\n";
    s += "        unsigned char *grown = realloc(tape, tape_size + TAPE_GROWTH_SIZE);\n";
    s += "        if (grown == NULL) {\n";
    s += format!("            {}\n", fatal(TapeError::AllocationError)).as_str();
    s += "            free(tape);\n";
    s += "            exit(EXIT_FAILURE);\n";
    s += "        }\n";
    s += "        memset(grown + tape_size, 0, TAPE_GROWTH_SIZE);\n";
    s += "        tape = grown;\n";
    s += "        tape_size += TAPE_GROWTH_SIZE;\n";
    s += "    }\n";
    s += "    ++ptr;\n";
    s += "}\n\n";

    s += "static void retreat(void) {\n";
    s += "    if (ptr == 0) {\n";
    s += format!("        {}\n", fatal(TapeError::StackUnderflow)).as_str();
    s += "        free(tape);\n";
    s += "        exit(EXIT_FAILURE);\n";
    s += "    }\n";
    s += "    --ptr;\n";
    s += "}\n\n";

    s += "static void input(void) {\n";
    s += "    int c;\n";
    s += "    fflush(stdout);\n";
    s += "    c = getchar();\n";
    s += "    if (c != EOF) {\n";
    s += "        tape[ptr] = (unsigned char)c;\n";
    s += "    }\n";
    match eof {
        EofBehaviour::AllOnes => s += "    else {\n        tape[ptr] = 0xff;\n    }\n",
        EofBehaviour::Zero => s += "    else {\n        tape[ptr] = 0;\n    }\n",
        EofBehaviour::Unchanged => (),
    }
    s += "}\n\n";
    s
}

/// One statement sequence per instruction, loops nest as `while` loops.
fn generate_c_body(source: &[u8], trace: bool) -> String {
    let mut s = String::new();
    let mut depth = 1;
    let mut last_line = 0;
    for (pos, instr) in instructions(source) {
        if instr == Instruction::EndLoop {
            depth -= 1;
        }
        if trace {
            let line = SourcePos::locate(source, pos).line;
            if line != last_line {
                s += format!("#line {line}\n").as_str();
                last_line = line;
            }
        }
        s += indent(depth).as_str();
        match instr {
            Instruction::Add => s += "++tape[ptr];\n",
            Instruction::Subtract => s += "--tape[ptr];\n",
            Instruction::Right => s += "advance();\n",
            Instruction::Left => s += "retreat();\n",
            Instruction::Input => s += "input();\n",
            Instruction::Output => s += "putchar(tape[ptr]);\n",
            Instruction::BeginLoop => {
                s += "while (tape[ptr] != 0) {\n";
                depth += 1;
            }
            Instruction::EndLoop => s += "}\n",
        }
    }
    s
}

/// C statement reporting a fatal tape error on stderr.
fn fatal(err: TapeError) -> String {
    format!("fprintf(stderr, \"ERROR: {err}\\n\");")
}

/// Compute the indentation string for a given indentation level.
fn indent(i: usize) -> String {
    "    ".repeat(i)
}

#[cfg(test)]
mod tests {
    use super::{generate_c, indent};
    use crate::settings::{CodegenOptions, EofBehaviour};
    use crate::BracketError;

    #[test]
    fn test_indent() {
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn test_rejects_unbalanced() {
        let options = CodegenOptions::default();
        assert!(matches!(
            generate_c(b"]", &options),
            Err(BracketError::UnbalancedBrackets { .. })
        ));
        assert!(matches!(
            generate_c(b"[", &options),
            Err(BracketError::UnbalancedBrackets { .. })
        ));
    }

    #[test]
    fn test_nested_loops() {
        let c = generate_c(b"+[>[-]<]", &CodegenOptions::default()).unwrap();
        let expected = concat!(
            "    ++tape[ptr];\n",
            "    while (tape[ptr] != 0) {\n",
            "        advance();\n",
            "        while (tape[ptr] != 0) {\n",
            "            --tape[ptr];\n",
            "        }\n",
            "        retreat();\n",
            "    }\n",
        );
        assert!(c.contains(expected), "{c}");
        assert!(c.contains("#define DEFAULT_TAPE_SIZE 1024\n"));
        assert!(c.contains("#define TAPE_GROWTH_SIZE 256\n"));
        assert!(c.contains("\"ERROR: Stack underflow\\n\""));
        assert_eq!(c.matches('{').count(), c.matches('}').count());
    }

    #[test]
    fn test_comments_are_dropped() {
        let c = generate_c(b"hello, world.", &CodegenOptions::default()).unwrap();
        assert_eq!(c.matches("input();\n").count(), 1);
        assert_eq!(c.matches("putchar(tape[ptr]);\n").count(), 1);
    }

    #[test]
    fn test_eof_and_trace() {
        let options = CodegenOptions {
            eof: EofBehaviour::Zero,
            trace: true,
        };
        let c = generate_c(b"+\n\n,.", &options).unwrap();
        assert!(c.contains("tape[ptr] = 0;"));
        assert!(!c.contains("tape[ptr] = 0xff;"));
        assert!(c.contains("#line 1\n    ++tape[ptr];\n#line 3\n    input();\n"));

        let c = generate_c(b",", &CodegenOptions::default()).unwrap();
        assert!(c.contains("tape[ptr] = 0xff;"));
        assert!(!c.contains("#line"));
    }
}
