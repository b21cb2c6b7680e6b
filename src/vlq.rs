//! Base-128 variable-length quantities, most significant group first.

/// Largest value that fits in the four encoded bytes SMF allows.
pub(crate) const MAX: u32 = 0x0FFF_FFFF;

/// Number of bytes `value` occupies once encoded. Zero still takes one byte.
///
/// Values above [`MAX`] report `None`.
pub(crate) const fn encoded_len(value: u32) -> Option<usize> {
    match value {
        0..=0x7F => Some(1),
        0x80..=0x3FFF => Some(2),
        0x4000..=0x1F_FFFF => Some(3),
        0x20_0000..=MAX => Some(4),
        _ => None,
    }
}

/// Encode `value` into a scratch buffer, returning the used prefix length.
pub(crate) fn encode(value: u32, buf: &mut [u8; 4]) -> Option<usize> {
    let len = encoded_len(value)?;
    for (i, slot) in buf[..len].iter_mut().enumerate() {
        let shift = 7 * (len - 1 - i);
        let group = ((value >> shift) & 0x7F) as u8;
        *slot = if i + 1 < len { group | 0x80 } else { group };
    }
    Some(len)
}

#[cfg(test)]
fn encode_vec(value: u32) -> alloc::vec::Vec<u8> {
    let mut buf = [0; 4];
    let len = encode(value, &mut buf).unwrap();
    buf[..len].to_vec()
}

#[test]
fn encodes_canonical_lengths() {
    use pretty_assertions::assert_eq;
    assert_eq!(encode_vec(0), [0x00]);
    assert_eq!(encode_vec(0x40), [0x40]);
    assert_eq!(encode_vec(0x7F), [0x7F]);
    assert_eq!(encode_vec(0x80), [0x81, 0x00]);
    assert_eq!(encode_vec(480), [0x83, 0x60]);
    assert_eq!(encode_vec(0x2000), [0xC0, 0x00]);
    assert_eq!(encode_vec(0x3FFF), [0xFF, 0x7F]);
    assert_eq!(encode_vec(0x4000), [0x81, 0x80, 0x00]);
    assert_eq!(encode_vec(0x10_0000), [0xC0, 0x80, 0x00]);
    assert_eq!(encode_vec(0x20_0000), [0x81, 0x80, 0x80, 0x00]);
    assert_eq!(encode_vec(MAX), [0xFF, 0xFF, 0xFF, 0x7F]);
}

#[test]
fn rejects_values_past_four_bytes() {
    let mut buf = [0; 4];
    assert!(encode(MAX + 1, &mut buf).is_none());
    assert!(encoded_len(u32::MAX).is_none());
}
