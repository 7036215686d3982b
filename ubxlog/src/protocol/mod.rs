/// Sync characters at the start of every UBX frame.
pub const FRAME_SYNC: [u8; 2] = [0xb5, 0x62];

/// Bytes a frame wraps around its body: sync, class, id, length, checksum.
pub const FRAME_OVERHEAD: usize = 8;

pub mod checksum;
pub use checksum::Checksum;

pub mod parse;
pub use parse::{scan, ScanResult};
