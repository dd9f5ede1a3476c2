//! Runs alone in its binary: the `log` backend is process-wide.
use kobj::ObjectTree;
use log::LevelFilter;
use machine::{Activation, Machine, MachineContext};
use spin::Mutex;

fn yes() -> bool {
    true
}

static BOARD: Machine = Machine::new("logged-board", "").with_detect(yes);

fn take(console: &Mutex<String>) -> String {
    core::mem::take(&mut *console.lock())
}

#[test]
fn activation_reports_through_the_console_logger() {
    let console: &'static Mutex<String> = Box::leak(Box::new(Mutex::new(String::new())));
    utils::logging::init(console, LevelFilter::Debug).unwrap();

    let tree = ObjectTree::new();
    let empty = MachineContext::new(&tree);
    assert_eq!(empty.run_activation(), Activation::NoneFound);
    assert!(take(console).contains("[WARN] Not found any machine"));

    assert_eq!(empty.run_activation(), Activation::NoneFound);
    let repeat = take(console);
    assert!(repeat.contains("[WARN] Machine detection already ran."));
    assert!(!repeat.contains("Not found any machine"));

    let tree = ObjectTree::new();
    let ctx = MachineContext::new(&tree);
    ctx.register(&BOARD).unwrap();
    assert_eq!(ctx.run_activation(), Activation::Selected(&BOARD));
    assert!(take(console).contains("[INFO] Found machine [logged-board]"));
}
