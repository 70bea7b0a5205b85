//! Read-only checks for an applied raid patch.
//!
//! Both checks look for the patched raid getter, `mov eax, imm32; nop`
//! (`B8 xx xx xx xx 90`). The same six-byte shape may occur elsewhere in the
//! image by coincidence, so a hit is a hint rather than proof.

use std::ops::RangeInclusive;

use memchr::memmem;

use super::set::{MOV_EAX_IMM32, NOP, encode_parameter};

/// prefix + 4 parameter bytes + suffix
pub const MARKER_LEN: usize = 6;

fn marker(parameter: u32) -> [u8; MARKER_LEN] {
    let mut bytes = [NOP; MARKER_LEN];
    bytes[0] = MOV_EAX_IMM32;
    bytes[1..5].copy_from_slice(&encode_parameter(parameter));
    bytes
}

/// Whether `image` contains the getter patch for `parameter`.
pub fn contains_parameter(image: &[u8], parameter: u32) -> bool {
    memmem::find(image, &marker(parameter)).is_some()
}

/// First parameter in `valid` encoded in a getter-shaped window of `image`.
pub fn detect_in_buffer(image: &[u8], valid: RangeInclusive<u32>) -> Option<u32> {
    image.windows(MARKER_LEN).find_map(|window| {
        if window[0] != MOV_EAX_IMM32 || window[5] != NOP {
            return None;
        }
        let value = u32::from_le_bytes([window[1], window[2], window[3], window[4]]);
        valid.contains(&value).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_layout() {
        assert_eq!(marker(5), [0xB8, 0x05, 0x00, 0x00, 0x00, 0x90]);
        assert_eq!(marker(300), [0xB8, 0x2C, 0x01, 0x00, 0x00, 0x90]);
    }

    #[test]
    fn test_contains_parameter() {
        let image = [0x00, 0xB8, 0x05, 0x00, 0x00, 0x00, 0x90, 0xCC];
        assert!(contains_parameter(&image, 5));
        assert!(!contains_parameter(&image, 6));
        assert!(!contains_parameter(&image[..6], 5));
    }

    #[test]
    fn test_detect_example_buffer() {
        let image = [0xB8, 0x05, 0x00, 0x00, 0x00, 0x90];
        assert_eq!(detect_in_buffer(&image, 1..=38), Some(5));
    }

    #[test]
    fn test_detect_skips_out_of_range_windows() {
        // First window decodes to 0x1000, second to 21
        let image = [
            0xB8, 0x00, 0x10, 0x00, 0x00, 0x90, 0xCC, 0xB8, 0x15, 0x00, 0x00, 0x00, 0x90,
        ];
        assert_eq!(detect_in_buffer(&image, 1..=38), Some(21));
        assert_eq!(detect_in_buffer(&image, 1..=0x2000), Some(0x1000));
    }

    #[test]
    fn test_detect_returns_first_valid_window() {
        let image = [
            0xB8, 0x03, 0x00, 0x00, 0x00, 0x90, 0xB8, 0x04, 0x00, 0x00, 0x00, 0x90,
        ];
        assert_eq!(detect_in_buffer(&image, 1..=38), Some(3));
    }

    #[test]
    fn test_detect_nothing() {
        assert_eq!(detect_in_buffer(&[], 1..=38), None);
        assert_eq!(detect_in_buffer(&[0xB8, 0x01, 0x00, 0x00, 0x00], 1..=38), None);
        assert_eq!(
            detect_in_buffer(&[0xB8, 0x01, 0x00, 0x00, 0x00, 0xC3], 1..=38),
            None
        );
    }

    #[test]
    fn test_detect_large_parameter() {
        let image = marker(300);
        assert_eq!(detect_in_buffer(&image, 1..=u32::MAX), Some(300));
    }
}
