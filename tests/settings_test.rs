//! Settings flowing into the virtual machine.

use std::io::Cursor;

use pretty_assertions::assert_eq;
use shorthand::{Settings, VirtualMachine};

fn run_with(settings: &Settings, interactive: bool, input: &str) -> (String, String) {
    let mut vm = VirtualMachine::with_config(settings.vm_config(interactive));
    let mut out = Vec::new();
    let mut err = Vec::new();
    vm.run(Cursor::new(input), &mut out, &mut err).unwrap();
    (
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn piped_input_has_no_prompt() {
    let (out, err) = run_with(&Settings::default(), false, "@x :=: 1\n@x\n");
    assert_eq!(out, "1\n");
    assert_eq!(err, "");
}

#[test]
fn interactive_input_is_prompted() {
    let settings = Settings {
        prompt: "> ".to_string(),
        ..Settings::default()
    };
    let (out, _) = run_with(&settings, true, "hi\n");
    assert_eq!(out, "> hi\n> ");
}

#[test]
fn configured_shell_is_used() {
    let settings = Settings {
        shell: "sh".to_string(),
        ..Settings::default()
    };
    let (out, err) = run_with(&settings, false, "@v :!: echo from-sh\n@v");
    assert_eq!(err, "");
    assert_eq!(out, "from-sh\n");
}
