//! Hardware tests against a real relay board.
//!
//! These tests click physical relays and are therefore doubly gated:
//! build with `--features hardware-tests`, set `USBRELAY_TEST_PORT` to
//! the board's serial port, and run `cargo test -- --ignored`.

#![cfg(feature = "hardware-tests")]

use serial_test::serial;
use usbrelay_ctl::{BoardVariant, RelayController};

fn test_port() -> Option<String> {
    std::env::var("USBRELAY_TEST_PORT").ok()
}

#[test]
#[ignore = "requires a relay board on USBRELAY_TEST_PORT"]
#[serial]
fn identify_real_board() {
    let Some(port) = test_port() else {
        eprintln!("USBRELAY_TEST_PORT not set, skipping");
        return;
    };

    let mut board = RelayController::new(port, BoardVariant::TwoRelay);
    board.open().expect("port opens");

    let variant = board.init_board().expect("handshake completes");
    assert_ne!(
        variant,
        BoardVariant::Unknown,
        "board did not identify itself"
    );
    assert!(matches!(board.relay_count(), 2 | 4 | 8));

    board.close().expect("port closes");
}

#[test]
#[ignore = "requires a relay board on USBRELAY_TEST_PORT"]
#[serial]
fn toggle_relay_one() {
    let Some(port) = test_port() else {
        eprintln!("USBRELAY_TEST_PORT not set, skipping");
        return;
    };

    let mut board = RelayController::new(port, BoardVariant::TwoRelay);
    board.open().expect("port opens");
    let variant = board.init_board().expect("handshake completes");
    assert_ne!(variant, BoardVariant::Unknown);

    board.set_state(0b1).expect("relay 1 switches on");
    assert_eq!(board.state(), Some(0b1));

    board.set_state(0).expect("relays switch off");
    assert_eq!(board.state(), Some(0));

    board.close().expect("port closes");
}
