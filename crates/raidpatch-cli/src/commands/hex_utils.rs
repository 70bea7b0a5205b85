//! Hex offset formatting utilities.

/// Format a file offset as a hex string with 0x prefix.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_hex_offset(0x1000), "0x1000");
/// ```
pub fn format_hex_offset(offset: usize) -> String {
    format!("0x{:X}", offset)
}

/// Format bytes as space-separated uppercase hex.
pub fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
