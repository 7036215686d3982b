use crate::protocol;
use crate::protocol::checksum;

/// One complete UBX message: sync characters, class, id, little-endian
/// body length, body, two checksum bytes.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Frame {
    data: Vec<u8>,
}

impl Frame {
    /// The "no frame produced" value; the driver never writes one out.
    pub fn empty() -> Self {
        Self { data: Vec::new() }
    }

    /// Wrap bytes that already form a frame, untouched.
    pub fn from_raw(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Assemble a frame from its fields, computing the checksum.
    ///
    /// `declared_len` goes into the length field verbatim and is allowed
    /// to disagree with `body.len()`; the checksum then covers only the
    /// bytes actually present.
    pub fn from_parts(class: u8, id: u8, declared_len: u16, body: &[u8]) -> Self {
        let mut data = Vec::with_capacity(protocol::FRAME_OVERHEAD + body.len());
        data.extend_from_slice(&protocol::FRAME_SYNC);
        data.push(class);
        data.push(id);
        data.extend_from_slice(&declared_len.to_le_bytes());
        data.extend_from_slice(body);

        let (ca, cb) = checksum::checksum(&data[2..]);
        data.push(ca);
        data.push(cb);
        Self { data }
    }

    pub fn class(&self) -> Option<u8> {
        self.data.get(2).copied()
    }

    pub fn id(&self) -> Option<u8> {
        self.data.get(3).copied()
    }

    /// Body length the header declares, which may exceed the body
    /// actually carried (see [crate::decode_response_line]).
    pub fn declared_len(&self) -> Option<u16> {
        Some(u16::from_le_bytes([
            *self.data.get(4)?,
            *self.data.get(5)?,
        ]))
    }

    /// Body bytes between header and checksum.
    pub fn body(&self) -> Option<&[u8]> {
        if self.data.len() < protocol::FRAME_OVERHEAD {
            return None;
        }
        Some(&self.data[6..self.data.len() - 2])
    }

    /// Recompute the checksum over everything between the sync characters
    /// and the trailing checksum bytes, and compare.
    pub fn check(&self) -> bool {
        if self.data.len() < protocol::FRAME_OVERHEAD {
            return false;
        }
        let (ca, cb) = checksum::checksum(&self.data[2..self.data.len() - 2]);
        self.data[self.data.len() - 2..] == [ca, cb]
    }

    pub fn write_to<W>(&self, writer: &mut W) -> std::io::Result<()>
    where
        W: std::io::Write,
    {
        writer.write_all(&self.data)
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl std::ops::Deref for Frame {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
