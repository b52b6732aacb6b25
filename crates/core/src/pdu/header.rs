use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use super::PduError;

/// IEEE 1278.1-1995.
pub const PROTOCOL_VERSION: u8 = 6;
pub const FAMILY_ENTITY_INFORMATION: u8 = 1;
pub const FAMILY_WARFARE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduKind {
    EntityState,
    Fire,
    Detonation,
    Other(u8),
}

impl From<u8> for PduKind {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::EntityState,
            2 => Self::Fire,
            3 => Self::Detonation,
            other => Self::Other(other),
        }
    }
}

impl From<PduKind> for u8 {
    fn from(kind: PduKind) -> Self {
        match kind {
            PduKind::EntityState => 1,
            PduKind::Fire => 2,
            PduKind::Detonation => 3,
            PduKind::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PduHeader {
    pub protocol_version: u8,
    pub exercise_id: u8,
    pub kind: PduKind,
    pub protocol_family: u8,
    pub timestamp: u32,
    /// Total PDU length in bytes, header included.
    pub length: u16,
}

impl PduHeader {
    pub const SIZE: usize = 12;

    pub fn new(kind: PduKind, exercise_id: u8) -> Self {
        let protocol_family = match kind {
            PduKind::Fire | PduKind::Detonation => FAMILY_WARFARE,
            _ => FAMILY_ENTITY_INFORMATION,
        };

        Self {
            protocol_version: PROTOCOL_VERSION,
            exercise_id,
            kind,
            protocol_family,
            timestamp: 0,
            length: Self::SIZE as u16,
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PduError> {
        if bytes.len() < Self::SIZE {
            return Err(PduError::Truncated {
                needed: Self::SIZE,
                available: bytes.len(),
            });
        }

        let mut cursor = bytes;
        let protocol_version = cursor.read_u8()?;
        let exercise_id = cursor.read_u8()?;
        let kind = PduKind::from(cursor.read_u8()?);
        let protocol_family = cursor.read_u8()?;
        let timestamp = cursor.read_u32::<BigEndian>()?;
        let length = cursor.read_u16::<BigEndian>()?;
        let _padding = cursor.read_u16::<BigEndian>()?;

        Ok(Self {
            protocol_version,
            exercise_id,
            kind,
            protocol_family,
            timestamp,
            length,
        })
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), PduError> {
        out.write_u8(self.protocol_version)?;
        out.write_u8(self.exercise_id)?;
        out.write_u8(self.kind.into())?;
        out.write_u8(self.protocol_family)?;
        out.write_u32::<BigEndian>(self.timestamp)?;
        out.write_u16::<BigEndian>(self.length)?;
        out.write_u16::<BigEndian>(0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_big_endian_fields() {
        let bytes = [6, 3, 1, 1, 0x00, 0x00, 0x01, 0x02, 0x00, 0x90, 0, 0];
        let header = PduHeader::decode(&bytes).unwrap();

        assert_eq!(header.protocol_version, 6);
        assert_eq!(header.exercise_id, 3);
        assert_eq!(header.kind, PduKind::EntityState);
        assert_eq!(header.timestamp, 0x0102);
        assert_eq!(header.length, 144);
    }

    #[test]
    fn short_buffer_is_truncated() {
        let err = PduHeader::decode(&[6, 1, 1]).unwrap_err();

        assert!(matches!(
            err,
            PduError::Truncated {
                needed: 12,
                available: 3
            }
        ));
    }

    #[test]
    fn unknown_kind_is_preserved() {
        let mut header = PduHeader::new(PduKind::from(26), 1);
        header.length = 40;

        let mut bytes = Vec::new();
        header.encode_into(&mut bytes).unwrap();

        assert_eq!(bytes.len(), PduHeader::SIZE);
        assert_eq!(PduHeader::decode(&bytes).unwrap().kind, PduKind::Other(26));
    }
}
