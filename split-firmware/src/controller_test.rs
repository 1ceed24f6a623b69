extern crate std;

use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use split_common::link_format::QUEUE_CAPACITY;
use std::vec::Vec;

use super::*;

use crate::{
    key_table,
    layout::{KeyTable, Side},
    reflash::NoReflashButton,
    serial_test_stub::SerialLog,
    switch_test_stub::{KeyMatrix, NoDelay},
    time_driver_test_stub,
    usb_test_stub::StubHid,
};

type Queue = LinkQueue<NoopRawMutex, QUEUE_CAPACITY>;

const DEBOUNCE: u8 = 5;

const LEFT: KeyTable<5, 6> = key_table![
    [PAGE_DOWN, N0, N1, N2, N3, N4],
    [BACKSPACE, Q, W, E, R, T],
    [ALT_LEFT, A, S, D, F, G],
    [CONTROL_LEFT, Z, X, C, V, B],
    [NONE, NONE, GUI_LEFT, SHIFT_LEFT, SPACE, TAB],
];

const RIGHT: KeyTable<5, 6> = key_table![
    [N5, N6, N7, N8, N9, PAGE_UP],
    [Y, U, I, O, P, DELETE],
    [H, J, K, L, SEMICOLON, ALT_RIGHT],
    [N, M, COMMA, PERIOD, SLASH, CONTROL_RIGHT],
    [ESCAPE, ENTER, SHIFT_RIGHT, GUI_RIGHT, NONE, NONE],
];

macro_rules! setup {
    ($ctl:ident, $km:ident, $hid:ident, $serial:ident, $queue:ident: $b:block) => {
        setup!($ctl, $km, $hid, $serial, $queue: Side::Left, RoleSelect::Auto, NoReflashButton, $b)
    };
    ($ctl:ident, $km:ident, $hid:ident, $serial:ident, $queue:ident:
     $side:expr, $role:expr, $button:expr, $b:block) => {{
        let $km = KeyMatrix::new(5, 6);
        let $hid = StubHid::default();
        let $serial = SerialLog::default();
        let $queue = Queue::default();
        let scanner = KeyScanner::new($km.row_pins(), $km.column_pins(), NoDelay::default(), DEBOUNCE);
        #[allow(unused_mut)]
        let mut $ctl = SplitController::new(
            scanner,
            HalfLayout::for_side($side, &LEFT, &RIGHT),
            &$queue,
            $hid.clone(),
            $serial.clone(),
            $button,
            $role,
            Some(MagicChord::corners(3, 5)),
        );

        #[allow(unused_macros)]
        macro_rules! tick {
            () => {
                block_on($ctl.tick())
            };
            ($n:expr) => {
                for _ in 0..$n {
                    assert_eq!(tick!(), Flow::Continue);
                }
            };
        }

        $b
    }};
}

fn report_of<const N: usize>(keys: [crate::KeyCode; N]) -> Vec<u8> {
    KeyboardReport::from_keys(keys).as_bytes().to_vec()
}

#[test]
fn role_resolve() {
    assert_eq!(RoleSelect::Auto.resolve(true), Role::Master);
    assert_eq!(RoleSelect::Auto.resolve(false), Role::Slave);
    assert_eq!(RoleSelect::ForceSlave.resolve(true), Role::Slave);
    assert_eq!(RoleSelect::ForceSlave.resolve(false), Role::Slave);
    assert_eq!(RoleSelect::default(), RoleSelect::Auto);
}

#[test]
fn master_sends_initial_report_once() {
    setup!(ctl, _km, hid, _serial, _queue: {
        assert!(ctl.is_pending());
        tick!(1);
        assert_eq!(ctl.role(), Some(Role::Master));
        assert_eq!(hid.take_reports(), [[0u8; 14].to_vec()]);
        assert!(!ctl.is_pending());

        tick!(3);
        assert!(hid.reports().is_empty());
    });
}

#[test]
fn master_reports_local_key() {
    setup!(ctl, km, hid, _serial, _queue: {
        tick!(1);
        hid.take_reports();

        km.down(1, 1);
        tick!(1);
        let reports = hid.take_reports();
        assert_eq!(reports, [report_of([kc!("q")])]);
        // Q is usage 0x14: byte 3 bit 0
        assert_eq!(reports[0][3], 1);

        tick!(10);
        assert!(hid.reports().is_empty());

        km.up(1, 1);
        tick!(1);
        assert_eq!(hid.take_reports(), [report_of([])]);
    });
}

#[test]
fn master_merges_other_half() {
    setup!(ctl, km, hid, _serial, queue: {
        tick!(1);
        hid.take_reports();

        km.down(3, 0);
        queue.push(LinkEvent::new(15, true).encode());
        tick!(1);
        assert_eq!(
            hid.take_reports(),
            [report_of([kc!("control_left"), kc!("l")])]
        );
        assert!(queue.is_empty());

        queue.push(LinkEvent::new(15, false).encode());
        tick!(1);
        assert_eq!(hid.take_reports(), [report_of([kc!("control_left")])]);
    });
}

#[test]
fn right_half_as_master() {
    setup!(ctl, km, hid, _serial, queue: Side::Right, RoleSelect::Auto, NoReflashButton, {
        km.down(2, 3);
        queue.push(LinkEvent::new(7, true).encode());
        tick!(1);
        assert_eq!(hid.take_reports(), [report_of([kc!("l"), kc!("q")])]);
    });
}

#[test]
fn master_ignores_malformed_link_bytes() {
    setup!(ctl, _km, hid, _serial, queue: {
        tick!(1);
        hid.take_reports();

        queue.push(0x80 | 30);
        queue.push(0x7f);
        // row 4 column 4 maps to no key on the right table
        queue.push(0x80 | 28);
        tick!(1);
        assert!(hid.reports().is_empty());
        assert!(ctl.report().is_empty());
    });
}

#[test]
fn slave_forwards_transitions() {
    setup!(ctl, km, hid, serial, _queue: {
        hid.set_mounted(false);

        km.down(2, 3);
        tick!(1);
        assert_eq!(ctl.role(), Some(Role::Slave));
        assert_eq!(serial.take(), [0x8f]);

        km.up(2, 3);
        tick!(DEBOUNCE);
        assert!(serial.bytes().is_empty());
        tick!(1);
        assert_eq!(serial.take(), [0x0f]);

        km.down(0, 0);
        km.down(4, 5);
        tick!(1);
        assert_eq!(serial.take(), [0x80, 0x80 | 29]);

        assert!(hid.reports().is_empty());
    });
}

#[test]
fn slave_to_master_round_trip() {
    let slave_bytes = setup!(ctl, km, hid, serial, _queue: Side::Right, RoleSelect::Auto, NoReflashButton, {
        hid.set_mounted(false);
        km.down(2, 3);
        km.down(4, 0);
        tick!(1);
        serial.take()
    });

    setup!(ctl, _km, hid, _serial, queue: {
        tick!(1);
        hid.take_reports();

        for byte in slave_bytes {
            assert!(queue.push(byte));
        }
        tick!(1);
        assert_eq!(hid.take_reports(), [report_of([kc!("l"), kc!("escape")])]);
    });
}

#[test]
fn force_slave_while_mounted() {
    setup!(ctl, km, hid, serial, _queue: Side::Left, RoleSelect::ForceSlave, NoReflashButton, {
        km.down(1, 1);
        tick!(1);
        assert_eq!(ctl.role(), Some(Role::Slave));
        assert_eq!(serial.take(), [0x80 | 7]);
        assert!(hid.reports().is_empty());
    });
}

#[test]
fn slave_write_errors_are_not_fatal() {
    let km = KeyMatrix::new(5, 6);
    let queue = Queue::default();
    let scanner = KeyScanner::new(km.row_pins(), km.column_pins(), NoDelay::default(), DEBOUNCE);
    let mut ctl = SplitController::new(
        scanner,
        HalfLayout::for_side(Side::Left, &LEFT, &RIGHT),
        &queue,
        StubHid::unmounted(),
        crate::serial_test_stub::BrokenSerial,
        NoReflashButton,
        RoleSelect::Auto,
        None,
    );

    km.down(0, 1);
    assert_eq!(block_on(ctl.tick()), Flow::Continue);
    assert_eq!(block_on(ctl.tick()), Flow::Continue);
}

#[test]
fn magic_chord_reboots() {
    setup!(ctl, km, _hid, _serial, _queue: {
        tick!(1);
        km.down(0, 0);
        km.down(3, 0);
        km.down(0, 5);
        tick!(1);
        km.down(3, 5);
        assert_eq!(tick!(), Flow::Reboot);
    });
}

#[test]
fn magic_chord_needs_all_four_keys() {
    let corners = [(0, 0), (3, 0), (0, 5), (3, 5)];
    for missing in 0..corners.len() {
        setup!(ctl, km, _hid, _serial, _queue: {
            for (i, &(row, col)) in corners.iter().enumerate() {
                if i != missing {
                    km.down(row, col);
                }
            }
            tick!(20);
            assert!(!ctl.report().is_empty());
        });
    }
}

#[test]
fn magic_chord_blocked_by_other_keys() {
    setup!(ctl, km, _hid, _serial, queue: {
        km.down(0, 0);
        km.down(3, 0);
        km.down(0, 5);
        km.down(3, 5);
        queue.push(LinkEvent::new(0, true).encode());
        tick!(5);
    });

    setup!(ctl, km, _hid, _serial, _queue: {
        km.down(0, 0);
        km.down(3, 0);
        km.down(0, 5);
        km.down(3, 5);
        km.down(2, 2);
        tick!(5);
    });
}

#[test]
fn magic_chord_ignored_by_slave() {
    setup!(ctl, km, hid, serial, _queue: {
        hid.set_mounted(false);
        km.down(0, 0);
        km.down(3, 0);
        km.down(0, 5);
        km.down(3, 5);
        tick!(3);
        assert_eq!(serial.take().len(), 4);
    });
}

#[test]
fn magic_chord_disabled() {
    let km = KeyMatrix::new(5, 6);
    let hid = StubHid::default();
    let queue = Queue::default();
    let empty = KeyTable::<5, 6>::empty();
    let scanner = KeyScanner::new(km.row_pins(), km.column_pins(), NoDelay::default(), DEBOUNCE);
    let mut ctl = SplitController::new(
        scanner,
        HalfLayout::for_side(Side::Left, &empty, &RIGHT),
        &queue,
        hid.clone(),
        SerialLog::default(),
        NoReflashButton,
        RoleSelect::Auto,
        Some(MagicChord::corners(3, 5)),
    );

    // an empty report would match an all-none chord
    for _ in 0..3 {
        assert_eq!(block_on(ctl.tick()), Flow::Continue);
    }
    assert_eq!(hid.reports(), [report_of([])]);
}

#[test]
fn reflash_button_reboots_any_role() {
    let mut presses = [false, false, true].into_iter();
    setup!(ctl, _km, hid, _serial, _queue: Side::Left, RoleSelect::Auto, move || presses.next().unwrap_or(true), {
        tick!(1);
        hid.set_mounted(false);
        tick!(1);
        assert_eq!(tick!(), Flow::Reboot);
    });
}

#[test]
fn suspended_host_gets_remote_wakeup() {
    setup!(ctl, km, hid, _serial, _queue: {
        hid.set_suspended(true);
        tick!(3);
        assert_eq!(hid.wakeups(), 0);
        assert!(ctl.is_pending());

        km.down(1, 2);
        tick!(1);
        assert_eq!(hid.wakeups(), 1);
        assert!(hid.reports().is_empty());

        tick!(2);
        assert_eq!(hid.wakeups(), 1);

        hid.set_suspended(false);
        tick!(1);
        assert_eq!(hid.take_reports(), [report_of([kc!("w")])]);
        assert!(!ctl.is_pending());
    });
}

#[test]
fn rejected_report_is_retried() {
    setup!(ctl, km, hid, _serial, _queue: {
        tick!(1);
        hid.take_reports();

        hid.set_accept(false);
        km.down(2, 1);
        tick!(1);
        assert_eq!(hid.rejected(), 1);
        assert!(ctl.is_pending());

        tick!(1);
        assert_eq!(hid.rejected(), 2);

        hid.set_accept(true);
        tick!(1);
        assert_eq!(hid.take_reports(), [report_of([kc!("a")])]);
        assert!(!ctl.is_pending());

        tick!(1);
        assert!(hid.reports().is_empty());
    });
}

#[test]
fn not_ready_defers_report() {
    setup!(ctl, km, hid, _serial, _queue: {
        hid.set_ready(false);
        km.down(2, 1);
        tick!(2);
        assert!(hid.reports().is_empty());
        assert!(ctl.is_pending());

        hid.set_ready(true);
        tick!(1);
        assert_eq!(hid.take_reports(), [report_of([kc!("a")])]);
    });
}

#[test]
fn becoming_master_resyncs_held_keys() {
    setup!(ctl, km, hid, serial, _queue: {
        hid.set_mounted(false);
        km.down(1, 3);
        tick!(1);
        assert_eq!(serial.take(), [0x80 | 9]);

        hid.set_mounted(true);
        tick!(1);
        assert_eq!(ctl.role(), Some(Role::Master));
        assert_eq!(hid.take_reports(), [report_of([kc!("e")])]);
    });
}

#[test]
fn run_ticks_on_schedule() {
    let mut stamps = Vec::new();
    {
        let button = || {
            stamps.push(time_driver_test_stub::now());
            stamps.len() == 5
        };
        setup!(ctl, _km, _hid, _serial, _queue: Side::Left, RoleSelect::Auto, button, {
            time_driver_test_stub::set_now(10_000);
            block_on(ctl.run(Duration::from_micros(1_000)));
        });
    }

    assert_eq!(stamps, [10_000, 11_000, 12_000, 13_000, 14_000]);
}
