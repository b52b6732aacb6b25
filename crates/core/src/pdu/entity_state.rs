use std::fmt;
use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use glam::{DVec3, Vec3};

use crate::catalog::EntityTypeDescriptor;

use super::PduError;
use super::header::{PduHeader, PduKind};

const MARKING_LENGTH: usize = 11;
const MARKING_CHARSET_ASCII: u8 = 1;
const DEAD_RECKONING_OTHER_LENGTH: usize = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId {
    pub site: u16,
    pub application: u16,
    pub entity: u16,
}

impl EntityId {
    pub const fn new(site: u16, application: u16, entity: u16) -> Self {
        Self {
            site,
            application,
            entity,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.site, self.application, self.entity)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeadReckoningParameters {
    pub algorithm: u8,
    pub other: [u8; DEAD_RECKONING_OTHER_LENGTH],
    pub linear_acceleration: Vec3,
    /// Radians per second about the entity's own axes.
    pub angular_velocity: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityStatePdu {
    pub header: PduHeader,
    pub entity_id: EntityId,
    pub force_id: u8,
    pub entity_type: EntityTypeDescriptor,
    pub alternative_type: EntityTypeDescriptor,
    pub linear_velocity: Vec3,
    /// Geocentric (earth-centred, earth-fixed) metres.
    pub location: DVec3,
    /// Euler angles psi, theta, phi in radians.
    pub orientation: Vec3,
    pub appearance: u32,
    pub dead_reckoning: DeadReckoningParameters,
    pub marking: String,
    pub capabilities: u32,
    /// Articulation parameters are skipped on decode and never encoded.
    pub articulation_count: u8,
}

impl EntityStatePdu {
    pub const SIZE: usize = 144;
    pub const ARTICULATION_PARAMETER_SIZE: usize = 16;

    pub fn new(entity_id: EntityId, entity_type: EntityTypeDescriptor) -> Self {
        Self {
            header: PduHeader::new(PduKind::EntityState, 1),
            entity_id,
            force_id: 0,
            entity_type,
            alternative_type: EntityTypeDescriptor::UNKNOWN,
            linear_velocity: Vec3::ZERO,
            location: DVec3::ZERO,
            orientation: Vec3::ZERO,
            appearance: 0,
            dead_reckoning: DeadReckoningParameters::default(),
            marking: String::new(),
            capabilities: 0,
            articulation_count: 0,
        }
    }

    /// Decodes the body following `header`. `body` excludes the header bytes.
    pub fn decode(header: PduHeader, body: &[u8]) -> Result<Self, PduError> {
        let fixed = Self::SIZE - PduHeader::SIZE;
        if body.len() < fixed {
            return Err(PduError::Truncated {
                needed: fixed,
                available: body.len(),
            });
        }

        let mut cursor = body;
        let entity_id = EntityId {
            site: cursor.read_u16::<BigEndian>()?,
            application: cursor.read_u16::<BigEndian>()?,
            entity: cursor.read_u16::<BigEndian>()?,
        };
        let force_id = cursor.read_u8()?;
        let articulation_count = cursor.read_u8()?;

        let required = fixed + articulation_count as usize * Self::ARTICULATION_PARAMETER_SIZE;
        if body.len() < required {
            return Err(PduError::Truncated {
                needed: required,
                available: body.len(),
            });
        }

        let entity_type = read_entity_type(&mut cursor)?;
        let alternative_type = read_entity_type(&mut cursor)?;
        let linear_velocity = read_vec3(&mut cursor)?;
        let location = DVec3::new(
            cursor.read_f64::<BigEndian>()?,
            cursor.read_f64::<BigEndian>()?,
            cursor.read_f64::<BigEndian>()?,
        );
        let orientation = read_vec3(&mut cursor)?;
        let appearance = cursor.read_u32::<BigEndian>()?;

        let algorithm = cursor.read_u8()?;
        let mut other = [0u8; DEAD_RECKONING_OTHER_LENGTH];
        cursor.read_exact(&mut other)?;
        let dead_reckoning = DeadReckoningParameters {
            algorithm,
            other,
            linear_acceleration: read_vec3(&mut cursor)?,
            angular_velocity: read_vec3(&mut cursor)?,
        };

        let _charset = cursor.read_u8()?;
        let mut marking = [0u8; MARKING_LENGTH];
        cursor.read_exact(&mut marking)?;
        let capabilities = cursor.read_u32::<BigEndian>()?;

        Ok(Self {
            header,
            entity_id,
            force_id,
            entity_type,
            alternative_type,
            linear_velocity,
            location,
            orientation,
            appearance,
            dead_reckoning,
            marking: decode_marking(&marking),
            capabilities,
            articulation_count,
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, PduError> {
        let mut out = Vec::with_capacity(Self::SIZE);
        self.encode_into(&mut out)?;
        Ok(out)
    }

    /// Appends this PDU to `out`, so several calls build a packed datagram.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), PduError> {
        let mut header = self.header;
        header.kind = PduKind::EntityState;
        header.length = Self::SIZE as u16;
        header.encode_into(out)?;

        out.write_u16::<BigEndian>(self.entity_id.site)?;
        out.write_u16::<BigEndian>(self.entity_id.application)?;
        out.write_u16::<BigEndian>(self.entity_id.entity)?;
        out.write_u8(self.force_id)?;
        out.write_u8(0)?;

        write_entity_type(out, &self.entity_type)?;
        write_entity_type(out, &self.alternative_type)?;
        write_vec3(out, self.linear_velocity)?;
        out.write_f64::<BigEndian>(self.location.x)?;
        out.write_f64::<BigEndian>(self.location.y)?;
        out.write_f64::<BigEndian>(self.location.z)?;
        write_vec3(out, self.orientation)?;
        out.write_u32::<BigEndian>(self.appearance)?;

        out.write_u8(self.dead_reckoning.algorithm)?;
        out.extend_from_slice(&self.dead_reckoning.other);
        write_vec3(out, self.dead_reckoning.linear_acceleration)?;
        write_vec3(out, self.dead_reckoning.angular_velocity)?;

        out.write_u8(MARKING_CHARSET_ASCII)?;
        let mut marking = [0u8; MARKING_LENGTH];
        for (slot, byte) in marking.iter_mut().zip(self.marking.bytes()) {
            *slot = byte;
        }
        out.extend_from_slice(&marking);
        out.write_u32::<BigEndian>(self.capabilities)?;

        Ok(())
    }
}

fn read_entity_type(cursor: &mut &[u8]) -> Result<EntityTypeDescriptor, PduError> {
    Ok(EntityTypeDescriptor {
        kind: cursor.read_u8()?,
        domain: cursor.read_u8()?,
        country: cursor.read_u16::<BigEndian>()?,
        category: cursor.read_u8()?,
        subcategory: cursor.read_u8()?,
        specific: cursor.read_u8()?,
        extra: cursor.read_u8()?,
    })
}

fn write_entity_type(out: &mut Vec<u8>, descriptor: &EntityTypeDescriptor) -> Result<(), PduError> {
    out.write_u8(descriptor.kind)?;
    out.write_u8(descriptor.domain)?;
    out.write_u16::<BigEndian>(descriptor.country)?;
    out.write_u8(descriptor.category)?;
    out.write_u8(descriptor.subcategory)?;
    out.write_u8(descriptor.specific)?;
    out.write_u8(descriptor.extra)?;
    Ok(())
}

fn read_vec3(cursor: &mut &[u8]) -> Result<Vec3, PduError> {
    Ok(Vec3::new(
        cursor.read_f32::<BigEndian>()?,
        cursor.read_f32::<BigEndian>()?,
        cursor.read_f32::<BigEndian>()?,
    ))
}

fn write_vec3(out: &mut Vec<u8>, value: Vec3) -> Result<(), PduError> {
    out.write_f32::<BigEndian>(value.x)?;
    out.write_f32::<BigEndian>(value.y)?;
    out.write_f32::<BigEndian>(value.z)?;
    Ok(())
}

fn decode_marking(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}
