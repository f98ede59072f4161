use super::*;

fn lines(asm: &str) -> Vec<String> {
    asm.lines().map(str::to_string).collect()
}

fn run(asm: &str) -> Machine {
    let program = Program::assemble(&lines(asm)).unwrap();
    let mut machine = Machine::new(program);
    machine.run(10_000).unwrap();
    machine
}

#[test]
fn test_predefined_symbols() {
    let program = Program::assemble(&lines("@SP\n@THAT\n@R15\n@SCREEN\n@KBD")).unwrap();
    assert_eq!(program.symbol("SP"), Some(0));
    assert_eq!(program.symbol("THAT"), Some(4));
    assert_eq!(program.symbol("R15"), Some(15));
    assert_eq!(program.symbol("SCREEN"), Some(0x4000));
    assert_eq!(program.symbol("KBD"), Some(0x6000));
    assert_eq!(program.len(), 5);
}

#[test]
fn test_labels_bind_to_next_instruction() {
    let program =
        Program::assemble(&lines("// header\n@START\n0;JMP\n(START)\n(ALIAS)\nD=1\n")).unwrap();
    assert_eq!(program.symbol("START"), Some(2));
    assert_eq!(program.symbol("ALIAS"), Some(2));
    assert_eq!(program.len(), 3);
}

#[test]
fn test_variables_allocated_from_16() {
    let program = Program::assemble(&lines("@Foo.0\n@Bar.1\n@Foo.0")).unwrap();
    assert_eq!(program.symbol("Foo.0"), Some(16));
    assert_eq!(program.symbol("Bar.1"), Some(17));
}

#[test]
fn test_forward_label_is_not_a_variable() {
    let program = Program::assemble(&lines("@LATER\n0;JMP\n@x\n(LATER)\nD=0")).unwrap();
    assert_eq!(program.symbol("LATER"), Some(3));
    assert_eq!(program.symbol("x"), Some(16));
}

#[test]
fn test_rejects_bad_instructions() {
    assert!(Program::assemble(&lines("D=Q")).is_err());
    assert!(Program::assemble(&lines("X=D")).is_err());
    assert!(Program::assemble(&lines("DD=1")).is_err());
    assert!(Program::assemble(&lines("0;JXX")).is_err());
    assert!(Program::assemble(&lines("@40000")).is_err());
    assert!(Program::assemble(&lines("(OPEN")).is_err());
    assert!(Program::assemble(&lines("(A)\n(A)")).is_err());
}

#[test]
fn test_dest_comp_jump_forms() {
    let machine = run("@7\nD=A\n@20\nM=D\nAM=M+1\nD=D+A\n@21\nM=D\nD;JEQ\n");
    assert_eq!(machine.peek(20), 8);
    // A was set to 8 by AM=M+1, so D = 7 + 8.
    assert_eq!(machine.peek(21), 15);
}

#[test]
fn test_complement_load() {
    let machine = run("@32767\nD=!A\n@16\nM=D\n@0\nD=!A\n@17\nM=D");
    assert_eq!(machine.peek(16), i16::MIN);
    assert_eq!(machine.peek(17), -1);
}

#[test]
fn test_wrapping_arithmetic() {
    let machine = run("@32767\nD=A\nD=D+1\n@16\nM=D\nD=0\nD=D-1\n@17\nM=D");
    assert_eq!(machine.peek(16), i16::MIN);
    assert_eq!(machine.peek(17), -1);
}

#[test]
fn test_signed_jumps() {
    // D = -1: JLT taken, JGT not.
    let machine = run(
        "D=-1\n@NEG\nD;JLT\n@16\nM=1\n(NEG)\n@17\nM=1\nD=-1\n@POS\nD;JGT\n@18\nM=1\n(POS)\n",
    );
    assert_eq!(machine.peek(16), 0);
    assert_eq!(machine.peek(17), 1);
    assert_eq!(machine.peek(18), 1);
}

#[test]
fn test_halt_loop_detected() {
    let program = Program::assemble(&lines("@5\nD=A\n(STOP)\n@STOP\n0;JMP\n")).unwrap();
    let mut machine = Machine::new(program);
    assert_eq!(machine.run(100).unwrap(), Exit::HaltLoop);
    assert_eq!(machine.cycle_count(), 4);
}

#[test]
fn test_end_of_program() {
    let program = Program::assemble(&lines("@1\nD=A")).unwrap();
    let mut machine = Machine::new(program);
    assert_eq!(machine.run(100).unwrap(), Exit::EndOfProgram);
}

#[test]
fn test_step_limit() {
    // A two-instruction loop that is not a self-jump.
    let program = Program::assemble(&lines("(LOOP)\nD=D+1\n@LOOP\n0;JMP")).unwrap();
    let mut machine = Machine::new(program);
    let err = machine.run(50).unwrap_err();
    assert!(err.contains("step limit of 50"), "got: {}", err);
}

#[test]
fn test_stack_view() {
    let mut machine = Machine::new(Program::assemble(&[]).unwrap());
    machine.poke(0, 259);
    machine.poke(256, 1);
    machine.poke(257, -2);
    machine.poke(258, 3);
    assert_eq!(machine.stack(256), vec![1, -2, 3]);
    machine.poke(0, 100);
    assert!(machine.stack(256).is_empty());
}

#[test]
fn test_jump_uses_a_before_write() {
    // A=A+1;JMP jumps to the old A (2) and only then A becomes 3.
    let program = Program::assemble(&lines("@2\nA=A+1;JMP\n@100\nM=1")).unwrap();
    let mut machine = Machine::new(program);
    assert_eq!(machine.run(100).unwrap(), Exit::EndOfProgram);
    assert_eq!(machine.peek(100), 1);
    assert_eq!(machine.peek(3), 0);
}

#[test]
fn test_variables_stop_at_screen() {
    let fits: Vec<String> = (0..0x4000 - 16).map(|i| format!("@v{}", i)).collect();
    let program = Program::assemble(&fits).unwrap();
    assert_eq!(program.symbol("v16367"), Some(0x3FFF));

    let mut overflow = fits;
    overflow.push("@one_too_many".to_string());
    let err = Program::assemble(&overflow).unwrap_err();
    assert!(err.contains("one_too_many"), "got: {}", err);
}
