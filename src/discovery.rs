//! Candidate-port discovery.
//!
//! A brute-force scan over platform-specific candidate names: try to open
//! each one, record the names that open, close immediately. Purely
//! advisory — a name appearing in the result means only that the open
//! succeeded, not that a relay board is attached.

use std::ops::Range;
use tracing::debug;

/// Baud rate used for the open-probe during scanning.
///
/// Unrelated to the protocol's 9600 baud; the scan only checks that the
/// port can be opened at all.
pub const SCAN_BAUD: u32 = 115_200;

/// Index range covered by the default scan.
pub const SCAN_RANGE: Range<usize> = 0..98;

/// Platform-default candidate name for a scan index.
///
/// Windows counts COM ports from 1; Unix ACM devices from 0.
#[cfg(windows)]
pub fn candidate_name(index: usize) -> String {
    format!(r"\\.\COM{}", index + 1)
}

/// Platform-default candidate name for a scan index.
#[cfg(not(windows))]
pub fn candidate_name(index: usize) -> String {
    format!("/dev/ttyACM{index}")
}

/// Scan the default candidate range with the platform naming scheme.
pub fn scan() -> Vec<String> {
    scan_with(candidate_name, SCAN_RANGE, SCAN_BAUD)
}

/// Scan a candidate range with a caller-supplied naming strategy.
///
/// Each candidate that opens is recorded and closed again before the next
/// attempt, so at most one port is held at a time.
pub fn scan_with(
    naming: impl Fn(usize) -> String,
    range: Range<usize>,
    baud_rate: u32,
) -> Vec<String> {
    let mut found = Vec::new();

    for index in range {
        let name = naming(index);
        match serialport::new(&name, baud_rate).open() {
            Ok(port) => {
                debug!(port = %name, "candidate port opened");
                drop(port);
                found.push(name);
            }
            Err(_) => {}
        }
    }

    found
}

/// Ports the OS itself reports, with their metadata.
///
/// Complements the brute-force scan: this asks the platform enumeration
/// API instead of probing device names blindly.
pub fn enumerate() -> Result<Vec<serialport::SerialPortInfo>, serialport::Error> {
    serialport::available_ports()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(windows))]
    fn test_candidate_names_unix() {
        assert_eq!(candidate_name(0), "/dev/ttyACM0");
        assert_eq!(candidate_name(7), "/dev/ttyACM7");
    }

    #[test]
    #[cfg(windows)]
    fn test_candidate_names_windows() {
        assert_eq!(candidate_name(0), r"\\.\COM1");
        assert_eq!(candidate_name(7), r"\\.\COM8");
    }

    #[test]
    fn test_scan_with_custom_strategy() {
        // Names that cannot exist, so the scan finds nothing but walks
        // the whole range.
        let names =
            scan_with(|i| format!("/dev/usbrelay_test_bogus{i}"), 0..3, SCAN_BAUD);
        assert!(names.is_empty());
    }

    #[test]
    fn test_scan_range_is_bounded() {
        assert_eq!(SCAN_RANGE.len(), 98);
    }
}
