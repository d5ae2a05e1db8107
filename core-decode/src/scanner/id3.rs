//! Metadata tag detection: a leading ID3v2 tag, and trailing ID3v1 or APE
//! tags after the last frame.

/// Length of the fixed ID3v2 header (and footer).
pub(crate) const ID3V2_HEADER_BYTES: usize = 10;

const FOOTER_PRESENT: u8 = 0x10;

/// Total length of an ID3v2 tag starting at `data[0]`, header and footer
/// included, or `None` if no well-formed tag header is there.
pub(crate) fn id3v2_tag_len(data: &[u8]) -> Option<u64> {
    let header = data.get(..ID3V2_HEADER_BYTES)?;
    if &header[..3] != b"ID3" || header[3] == 0xFF || header[4] == 0xFF {
        return None;
    }

    // Size is a 28-bit syncsafe integer
    let size_bytes = &header[6..10];
    if size_bytes.iter().any(|b| b & 0x80 != 0) {
        return None;
    }
    let size = size_bytes
        .iter()
        .fold(0u64, |acc, &b| (acc << 7) | u64::from(b));

    let footer = if header[5] & FOOTER_PRESENT != 0 {
        ID3V2_HEADER_BYTES as u64
    } else {
        0
    };

    Some(ID3V2_HEADER_BYTES as u64 + size + footer)
}

/// Length of an ID3v1 tag.
pub(crate) const ID3V1_TAG_BYTES: u64 = 128;

/// Length of the "TAG+" extended block that may precede an ID3v1 tag.
pub(crate) const ID3V1_EXTENDED_BYTES: u64 = 227;

/// Length of an APE tag header or footer.
pub(crate) const APE_FOOTER_BYTES: u64 = 32;

const APE_HEADER_PRESENT: u32 = 1 << 31;

/// Whether `tail`, the last bytes before the current end, begins an ID3v1 tag.
pub(crate) fn is_id3v1_tag(tail: &[u8]) -> bool {
    tail.starts_with(b"TAG")
}

/// Whether `tail` begins an extended ID3v1 block.
pub(crate) fn is_id3v1_extended(tail: &[u8]) -> bool {
    tail.starts_with(b"TAG+")
}

/// Total length of the APE tag whose 32-byte footer is `footer`, header
/// included when the flags announce one, or `None` if `footer` is not an
/// APE footer.
pub(crate) fn ape_tag_len(footer: &[u8]) -> Option<u64> {
    let footer = footer.get(..APE_FOOTER_BYTES as usize)?;
    if &footer[..8] != b"APETAGEX" {
        return None;
    }

    let le = |at: usize| u32::from_le_bytes([footer[at], footer[at + 1], footer[at + 2], footer[at + 3]]);
    // Size covers the items and the footer, not the header
    let size = u64::from(le(12));
    if size < APE_FOOTER_BYTES {
        return None;
    }
    let header = if le(20) & APE_HEADER_PRESENT != 0 {
        APE_FOOTER_BYTES
    } else {
        0
    };

    Some(size + header)
}
