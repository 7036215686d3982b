/// Running digest for the UBX two-byte checksum.
///
/// Two accumulating sums, each mod 256, over class, id, the length bytes
/// and the body. The sync characters are never included.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Checksum {
    ca: u8,
    cb: u8,
}

impl Checksum {
    pub fn new() -> Self {
        Self { ca: 0, cb: 0 }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.ca = self.ca.wrapping_add(*b);
            self.cb = self.cb.wrapping_add(self.ca);
        }
    }

    pub fn finalize(self) -> (u8, u8) {
        (self.ca, self.cb)
    }
}

/// One-shot checksum over a byte slice.
pub fn checksum(bytes: &[u8]) -> (u8, u8) {
    let mut digest = Checksum::new();
    digest.update(bytes);
    digest.finalize()
}
