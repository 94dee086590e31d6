//! Store file framing
//!
//! The backing file holds exactly one frame:
//!
//! ```text
//! +------------------+
//! | Magic "ABLG"     | (4 bytes)
//! +------------------+
//! | Format Version   | (u32 LE)
//! +------------------+
//! | Payload Length   | (u32 LE)
//! +------------------+
//! | Payload          | (JSON document)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself. The whole document
//! is rewritten on every commit, so there is never more than one frame.

use crc32fast::Hasher;

/// File magic
pub const MAGIC: [u8; 4] = *b"ABLG";

/// Current frame format version
pub const FORMAT_VERSION: u32 = 1;

/// Magic + version + payload length
pub const HEADER_LEN: usize = 12;

/// Trailing CRC32
pub const CHECKSUM_LEN: usize = 4;

/// Why a frame was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer bytes than header + checksum
    Truncated { len: usize },
    /// First four bytes are not the store magic
    BadMagic,
    /// Frame written by an unknown format version
    UnsupportedVersion(u32),
    /// Declared payload length disagrees with the file size
    LengthMismatch { declared: usize, actual: usize },
    /// Stored checksum does not match the frame bytes
    ChecksumMismatch { stored: u32, computed: u32 },
    /// Payload larger than the u32 length field can describe
    PayloadTooLarge(usize),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::Truncated { len } => write!(f, "frame truncated at {} bytes", len),
            FrameError::BadMagic => write!(f, "bad magic, not a store file"),
            FrameError::UnsupportedVersion(v) => write!(f, "unsupported format version {}", v),
            FrameError::LengthMismatch { declared, actual } => write!(
                f,
                "payload length mismatch: declared {}, found {}",
                declared, actual
            ),
            FrameError::ChecksumMismatch { stored, computed } => write!(
                f,
                "checksum mismatch: stored {:08x}, computed {:08x}",
                stored, computed
            ),
            FrameError::PayloadTooLarge(len) => {
                write!(f, "payload of {} bytes exceeds frame limit", len)
            }
        }
    }
}

/// Wraps a payload in a checksummed frame.
pub fn encode_frame(payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    let payload_len =
        u32::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge(payload.len()))?;

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len() + CHECKSUM_LEN);
    frame.extend_from_slice(&MAGIC);
    frame.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    frame.extend_from_slice(&payload_len.to_le_bytes());
    frame.extend_from_slice(payload);

    let checksum = frame_checksum(&frame);
    frame.extend_from_slice(&checksum.to_le_bytes());

    Ok(frame)
}

/// Verifies a frame and returns its payload.
pub fn decode_frame(data: &[u8]) -> Result<&[u8], FrameError> {
    if data.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(FrameError::Truncated { len: data.len() });
    }

    let (covered, trailer) = data.split_at(data.len() - CHECKSUM_LEN);
    let stored = read_u32(trailer, 0).ok_or(FrameError::Truncated { len: data.len() })?;
    let computed = frame_checksum(covered);
    if computed != stored {
        return Err(FrameError::ChecksumMismatch { stored, computed });
    }

    if covered.get(..4) != Some(&MAGIC[..]) {
        return Err(FrameError::BadMagic);
    }

    let version = read_u32(covered, 4).ok_or(FrameError::Truncated { len: data.len() })?;
    if version != FORMAT_VERSION {
        return Err(FrameError::UnsupportedVersion(version));
    }

    let declared = read_u32(covered, 8).ok_or(FrameError::Truncated { len: data.len() })? as usize;
    let payload = covered.get(HEADER_LEN..).unwrap_or_default();
    if payload.len() != declared {
        return Err(FrameError::LengthMismatch {
            declared,
            actual: payload.len(),
        });
    }

    Ok(payload)
}

/// CRC32 (IEEE) over the frame bytes preceding the checksum.
fn frame_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}
