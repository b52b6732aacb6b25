mod entity_state;
mod header;

pub use entity_state::{DeadReckoningParameters, EntityId, EntityStatePdu};
pub use header::{
    FAMILY_ENTITY_INFORMATION, FAMILY_WARFARE, PROTOCOL_VERSION, PduHeader, PduKind,
};

#[derive(Debug, thiserror::Error)]
pub enum PduError {
    #[error("truncated PDU: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },
    #[error("PDU declares length {declared} with {remaining} bytes remaining in datagram")]
    Length { declared: u16, remaining: usize },
    #[error("PDU i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pdu {
    EntityState(EntityStatePdu),
    Unsupported(PduHeader),
}

impl Pdu {
    pub fn header(&self) -> &PduHeader {
        match self {
            Pdu::EntityState(pdu) => &pdu.header,
            Pdu::Unsupported(header) => header,
        }
    }
}

/// Splits a datagram into its PDUs using each header's length field.
///
/// Datagrams may carry several PDUs back to back. Any framing or body error
/// fails the whole datagram.
pub fn decode_datagram(bytes: &[u8]) -> Result<Vec<Pdu>, PduError> {
    let mut pdus = Vec::new();
    let mut rest = bytes;

    while !rest.is_empty() {
        let header = PduHeader::decode(rest)?;
        let length = header.length as usize;
        if length < PduHeader::SIZE || length > rest.len() {
            return Err(PduError::Length {
                declared: header.length,
                remaining: rest.len(),
            });
        }

        let (current, tail) = rest.split_at(length);
        let body = &current[PduHeader::SIZE..];
        let pdu = match header.kind {
            PduKind::EntityState => Pdu::EntityState(EntityStatePdu::decode(header, body)?),
            _ => Pdu::Unsupported(header),
        };
        pdus.push(pdu);
        rest = tail;
    }

    Ok(pdus)
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;
    use crate::catalog::EntityTypeDescriptor;

    fn entity_state(entity: u16) -> EntityStatePdu {
        let mut pdu = EntityStatePdu::new(
            EntityId::new(1, 1, entity),
            EntityTypeDescriptor::new(1, 1, 225, 1, 1, 3, 0),
        );
        pdu.location = DVec3::new(6_378_137.0, 0.0, 0.0);
        pdu
    }

    fn unsupported(kind: u8, length: u16) -> Vec<u8> {
        let mut header = PduHeader::new(PduKind::from(kind), 1);
        header.length = length;
        let mut bytes = Vec::new();
        header.encode_into(&mut bytes).unwrap();
        bytes.resize(length as usize, 0xAA);
        bytes
    }

    #[test]
    fn empty_datagram_has_no_pdus() {
        assert!(decode_datagram(&[]).unwrap().is_empty());
    }

    #[test]
    fn packed_datagram_yields_every_pdu() {
        let mut bytes = Vec::new();
        entity_state(1).encode_into(&mut bytes).unwrap();
        bytes.extend(unsupported(2, 96));
        entity_state(2).encode_into(&mut bytes).unwrap();

        let pdus = decode_datagram(&bytes).unwrap();

        assert_eq!(pdus.len(), 3);
        assert!(matches!(&pdus[0], Pdu::EntityState(p) if p.entity_id.entity == 1));
        assert_eq!(pdus[1].header().kind, PduKind::Fire);
        assert!(matches!(pdus[1], Pdu::Unsupported(_)));
        assert!(matches!(&pdus[2], Pdu::EntityState(p) if p.entity_id.entity == 2));
    }

    #[test]
    fn length_past_end_of_datagram_fails() {
        let mut bytes = entity_state(1).encode().unwrap();
        bytes.truncate(100);

        let err = decode_datagram(&bytes).unwrap_err();

        assert!(matches!(
            err,
            PduError::Length {
                declared: 144,
                remaining: 100
            }
        ));
    }

    #[test]
    fn length_shorter_than_header_fails() {
        let mut broken = unsupported(1, 12);
        broken[8..10].copy_from_slice(&4u16.to_be_bytes());

        assert!(matches!(
            decode_datagram(&broken),
            Err(PduError::Length { declared: 4, .. })
        ));
    }

    #[test]
    fn trailing_garbage_fails_whole_datagram() {
        let mut bytes = entity_state(1).encode().unwrap();
        bytes.extend_from_slice(&[1, 2, 3]);

        assert!(matches!(
            decode_datagram(&bytes),
            Err(PduError::Truncated { needed: 12, available: 3 })
        ));
    }

    #[test]
    fn entity_state_with_short_body_fails() {
        // header claims an entity state PDU of only 20 bytes
        let bytes = unsupported(1, 20);

        assert!(matches!(
            decode_datagram(&bytes),
            Err(PduError::Truncated { .. })
        ));
    }
}
