//! Initial-byte layout and sentinel bytes of the profile.

/// Major types from RFC 7049 section 2.1, as stored in the top 3 bits of an
/// initial byte.
pub const MAJOR_UNSIGNED: u8 = 0;
pub const MAJOR_NEGATIVE: u8 = 1;
pub const MAJOR_BYTE_STRING: u8 = 2;
pub const MAJOR_STRING: u8 = 3;
pub const MAJOR_ARRAY: u8 = 4;
pub const MAJOR_MAP: u8 = 5;
pub const MAJOR_TAG: u8 = 6;
pub const MAJOR_SIMPLE: u8 = 7;

/// Bits to shift the initial byte right to recover the major type.
pub(crate) const MAJOR_TYPE_BIT_SHIFT: u8 = 5;
/// Selects the low 5 bits, where the additional info lives.
pub(crate) const ADDITIONAL_INFO_MASK: u8 = 0x1f;
/// Selects the high 3 bits, where the major type lives.
pub(crate) const MAJOR_TYPE_MASK: u8 = 0xe0;

/// Additional info 24..=27: the value follows in 1, 2, 4 or 8 bytes.
pub(crate) const ADDITIONAL_1_BYTE: u8 = 24;
pub(crate) const ADDITIONAL_2_BYTES: u8 = 25;
pub(crate) const ADDITIONAL_4_BYTES: u8 = 26;
pub(crate) const ADDITIONAL_8_BYTES: u8 = 27;
/// Additional info 31: indefinite length (containers) or, under major type
/// 7, the stop code.
pub(crate) const ADDITIONAL_INDEFINITE: u8 = 31;

/// `false`, RFC 7049 section 2.3, table 2.
pub const FALSE_BYTE: u8 = 0xf4;
/// `true`.
pub const TRUE_BYTE: u8 = 0xf5;
/// `null`.
pub const NULL_BYTE: u8 = 0xf6;
/// 64-bit float marker (major 7, additional info 27), followed by 8 bytes
/// big-endian.
pub const DOUBLE_BYTE: u8 = 0xfb;
/// Indefinite-length map start (major 5, additional info 31).
pub const INDEFINITE_MAP_START: u8 = 0xbf;
/// Indefinite-length array start (major 4, additional info 31).
pub const INDEFINITE_ARRAY_START: u8 = 0x9f;
/// Terminates an indefinite-length container.
pub const STOP_BYTE: u8 = 0xff;
/// Tag 22 (major 6): the following byte string should be base64-encoded when
/// rendered as JSON. Marks binary blobs in the profile.
pub const BASE64_HINT_TAG: u8 = 0xd6;

/// Packs a major type and additional info into an initial byte.
#[inline]
pub(crate) fn initial_byte(major: u8, additional_info: u8) -> u8 {
    (major << MAJOR_TYPE_BIT_SHIFT) | (additional_info & ADDITIONAL_INFO_MASK)
}

#[inline]
pub(crate) fn major_type(initial: u8) -> u8 {
    (initial & MAJOR_TYPE_MASK) >> MAJOR_TYPE_BIT_SHIFT
}

#[inline]
pub(crate) fn additional_info(initial: u8) -> u8 {
    initial & ADDITIONAL_INFO_MASK
}
