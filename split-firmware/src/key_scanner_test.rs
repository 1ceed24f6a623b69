extern crate std;

use embassy_futures::block_on;
use std::vec::Vec;

use super::*;

use crate::switch_test_stub::{ColumnPin, KeyMatrix, NoDelay, RowPin};

macro_rules! setup {
    ($km:ident, $scanner:ident, $delay:ident: $debounce:literal $b:block) => {{
        let $km = KeyMatrix::new(3, 4);
        let $delay = NoDelay::default();
        #[allow(unused_mut)]
        let mut $scanner: KeyScanner<ColumnPin, RowPin, NoDelay, 3, 4> =
            KeyScanner::new($km.row_pins(), $km.column_pins(), $delay.clone(), $debounce);

        #[allow(unused_macros)]
        macro_rules! scan {
            () => {{
                let mut keys = Vec::new();
                block_on($scanner.scan(|k| keys.push(k)));
                keys
            }};
        }

        $b
    }};
}

#[test]
fn scan_key() {
    let k = ScanKey::new(3, 5, true);
    assert_eq!(k.row(), 3);
    assert_eq!(k.column(), 5);
    assert_eq!(k.cell(), Cell::new(3, 5));
    assert!(k.is_down());

    let u = ScanKey::new(3, 5, false);
    assert!(!u.is_down());
    assert_eq!(u.cell(), k.cell());
    assert_ne!(u, k);
}

#[test]
fn idle_matrix_reports_nothing() {
    setup!(km, scanner, delay: 5 {
        for _ in 0..10 {
            assert!(scan!().is_empty());
        }
        assert_eq!(km.rows_driven(), 0);
        assert_eq!(delay.count(), 30);
    });
}

#[test]
fn press_and_release() {
    setup!(km, scanner, _delay: 2 {
        km.down(1, 2);
        assert_eq!(scan!(), [ScanKey::new(1, 2, true)]);
        assert!(scanner.is_down(Cell::new(1, 2)));

        km.up(1, 2);
        assert!(scan!().is_empty());
        assert!(scan!().is_empty());
        assert_eq!(scan!(), [ScanKey::new(1, 2, false)]);
        assert!(!scanner.is_down(Cell::new(1, 2)));
    });
}

#[test]
fn row_major_order() {
    setup!(km, scanner, _delay: 5 {
        km.down(2, 0);
        km.down(0, 3);
        km.down(0, 1);
        assert_eq!(
            scan!(),
            [
                ScanKey::new(0, 1, true),
                ScanKey::new(0, 3, true),
                ScanKey::new(2, 0, true),
            ]
        );
        assert_eq!(
            scanner.down_cells().collect::<Vec<_>>(),
            [Cell::new(0, 1), Cell::new(0, 3), Cell::new(2, 0)]
        );
    });
}

#[test]
fn drives_one_row_at_a_time() {
    setup!(km, scanner, _delay: 0 {
        km.down(0, 0);
        km.down(1, 0);
        km.down(2, 0);
        // no ghosting across rows when only one is driven
        assert_eq!(
            scan!(),
            [
                ScanKey::new(0, 0, true),
                ScanKey::new(1, 0, true),
                ScanKey::new(2, 0, true),
            ]
        );
        assert_eq!(km.max_rows_driven(), 1);
        assert_eq!(km.rows_driven(), 0);
    });
}

#[test]
fn bounce_is_filtered() {
    setup!(km, scanner, _delay: 3 {
        km.down(2, 3);
        assert_eq!(scan!(), [ScanKey::new(2, 3, true)]);
        km.up(2, 3);
        assert!(scan!().is_empty());
        km.down(2, 3);
        assert!(scan!().is_empty());
        km.up(2, 3);
        assert!(scan!().is_empty());
        km.down(2, 3);
        assert!(scan!().is_empty());
        assert!(scan!().is_empty());
        assert!(scanner.is_down(Cell::new(2, 3)));
    });
}
