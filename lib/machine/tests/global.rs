//! The kernel-wide instance. Everything lives in one test because the state is shared.
use machine::{
    Activation, Machine, MachineKey, get_machine, machine_cleanup, machine_keygen,
    machine_poweroff, machine_reboot, machine_sleep, machine_uniqueid, register_machine,
    search_machine, subsys_init_machine, unregister_machine,
};
use std::ptr;

fn yes() -> bool {
    true
}

fn no() -> bool {
    false
}

fn serial() -> Option<String> {
    Some("SN-0042".to_string())
}

static NOT_THIS: Machine = Machine::new("not-this", "never detected").with_detect(no);
static THIS: Machine = Machine::new("this", "the running board")
    .with_detect(yes)
    .with_power_off(yes)
    .with_unique_id(serial);

#[test]
fn boot_sequence() {
    assert!(get_machine().is_none());
    assert!(!machine_reboot());
    assert_eq!(machine_uniqueid(), "0123456789");

    assert!(register_machine(&NOT_THIS));
    assert!(register_machine(&THIS));
    assert!(!register_machine(&THIS));
    assert!(ptr::eq(search_machine("this").unwrap(), &THIS));
    assert_eq!(
        kobj::kobj_root()
            .read("/class/machine/this/description")
            .unwrap(),
        "the running board"
    );

    assert_eq!(subsys_init_machine(), Activation::Selected(&THIS));
    assert!(ptr::eq(get_machine().unwrap(), &THIS));
    assert!(machine_poweroff());
    assert!(!machine_sleep());
    assert!(!machine_cleanup());
    assert_eq!(machine_uniqueid(), "SN-0042");

    let mut key: MachineKey = [0; 32];
    assert_eq!(machine_keygen(b"hello", &mut key), 32);

    assert!(unregister_machine(&NOT_THIS));
    assert!(!unregister_machine(&NOT_THIS));
    assert!(get_machine().is_some());
    assert!(unregister_machine(&THIS));
    assert!(get_machine().is_none());
    assert!(!machine_poweroff());
}
