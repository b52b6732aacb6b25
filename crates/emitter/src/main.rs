use std::f64::consts::FRAC_PI_2;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use glam::{DVec3, Vec3};

use disgate::config::{DEFAULT_HOST_PORT, DEFAULT_LOCAL_PORT};
use disgate::net::MAX_DATAGRAM_SIZE;
use disgate::{
    ClientConfig, DeadReckoningModel, EntityId, EntityStatePdu, EntityTypeDescriptor, Transport,
    UdpTransport,
};

const EARTH_RADIUS: f64 = 6_378_137.0;

const ENTITY_TYPES: [EntityTypeDescriptor; 4] = [
    EntityTypeDescriptor::new(1, 3, 225, 1, 0, 0, 0),
    EntityTypeDescriptor::new(1, 1, 225, 1, 0, 0, 0),
    EntityTypeDescriptor::new(1, 2, 71, 20, 1, 0, 0),
    EntityTypeDescriptor::new(1, 2, 225, 20, 2, 10, 0),
];

#[derive(Parser)]
#[command(name = "disgate-emit")]
#[command(about = "Sends synthetic DIS entity state traffic")]
struct Args {
    #[arg(long, default_value = "localhost")]
    target: String,

    #[arg(long, default_value_t = DEFAULT_LOCAL_PORT)]
    target_port: u16,

    #[arg(short, long, default_value_t = DEFAULT_HOST_PORT)]
    local_port: u16,

    #[arg(short, long, default_value_t = 4)]
    count: u16,

    #[arg(short, long, default_value_t = 5.0, help = "Updates per second")]
    rate: f64,

    #[arg(long, default_value_t = 0, help = "Stop after this many updates (0 runs forever)")]
    updates: u64,

    #[arg(long, help = "Pack several PDUs into each datagram")]
    packed: bool,

    #[arg(long, default_value_t = 51.5)]
    latitude: f64,

    #[arg(long, default_value_t = -1.0)]
    longitude: f64,
}

/// Synthetic entity flying east along a parallel.
struct Track {
    id: EntityId,
    entity_type: EntityTypeDescriptor,
    origin: DVec3,
    east: DVec3,
    speed: f64,
    model: DeadReckoningModel,
}

impl Track {
    fn new(index: u16, latitude: f64, longitude: f64) -> Self {
        let latitude = (latitude + index as f64 * 0.01).to_radians();
        let longitude = longitude.to_radians();
        let altitude = 500.0 + index as f64 * 250.0;
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let (sin_lon, cos_lon) = longitude.sin_cos();

        let radius = EARTH_RADIUS + altitude;
        let model = if index % 2 == 0 {
            DeadReckoningModel::Fpw
        } else {
            DeadReckoningModel::Fvw
        };

        Self {
            id: EntityId::new(1, 1, index + 1),
            entity_type: ENTITY_TYPES[index as usize % ENTITY_TYPES.len()],
            origin: DVec3::new(
                radius * cos_lat * cos_lon,
                radius * cos_lat * sin_lon,
                radius * sin_lat,
            ),
            east: DVec3::new(-sin_lon, cos_lon, 0.0),
            speed: 40.0 + index as f64 * 20.0,
            model,
        }
    }

    fn state_at(&self, elapsed_secs: f64) -> EntityStatePdu {
        let mut pdu = EntityStatePdu::new(self.id, self.entity_type);
        pdu.location = self.origin + self.east * self.speed * elapsed_secs;
        pdu.linear_velocity = (self.east * self.speed).as_vec3();
        pdu.orientation = Vec3::new(FRAC_PI_2 as f32, 0.0, 0.0);
        pdu.dead_reckoning.algorithm = self.model.into();
        pdu.marking = format!("EMIT{}", self.id.entity);
        pdu
    }
}

/// Encodes one frame of traffic into datagrams.
fn build_datagrams(tracks: &[Track], elapsed_secs: f64, packed: bool) -> Result<Vec<Vec<u8>>> {
    let per_datagram = if packed {
        (MAX_DATAGRAM_SIZE / EntityStatePdu::SIZE).max(1)
    } else {
        1
    };

    let mut datagrams = Vec::new();
    for chunk in tracks.chunks(per_datagram) {
        let mut datagram = Vec::with_capacity(chunk.len() * EntityStatePdu::SIZE);
        for track in chunk {
            track.state_at(elapsed_secs).encode_into(&mut datagram)?;
        }
        datagrams.push(datagram);
    }
    Ok(datagrams)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ClientConfig {
        host_address: args.target.clone(),
        host_port: args.target_port,
        local_port: args.local_port,
        ..Default::default()
    };
    let mut transport = UdpTransport::bind(&config)?;

    let tracks: Vec<Track> = (0..args.count)
        .map(|index| Track::new(index, args.latitude, args.longitude))
        .collect();
    let interval = Duration::from_secs_f64(1.0 / args.rate.max(0.1));

    log::info!(
        "Emitting {} entities to {} every {:?}",
        tracks.len(),
        transport.remote_addr(),
        interval
    );

    let start = Instant::now();
    let mut sent = 0u64;
    while args.updates == 0 || sent < args.updates {
        let elapsed = start.elapsed().as_secs_f64();
        for datagram in build_datagrams(&tracks, elapsed, args.packed)? {
            if let Err(e) = transport.send(&datagram) {
                log::warn!("Send failed: {e}");
            }
        }
        sent += 1;
        log::debug!("Update {sent} at {elapsed:.2}s");
        thread::sleep(interval);
    }

    log::info!("Sent {sent} updates");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_move_east() {
        let track = Track::new(0, 0.0, 0.0);

        let start = track.state_at(0.0);
        let later = track.state_at(2.0);

        assert!((later.location - start.location - DVec3::new(0.0, 80.0, 0.0)).length() < 1e-6);
        assert_eq!(later.dead_reckoning.algorithm, 2);
    }

    #[test]
    fn packing_respects_datagram_limit() {
        let tracks: Vec<Track> = (0..25).map(|i| Track::new(i, 10.0, 20.0)).collect();

        let datagrams = build_datagrams(&tracks, 0.0, true).unwrap();

        assert_eq!(datagrams.len(), 3);
        assert!(datagrams.iter().all(|d| d.len() <= MAX_DATAGRAM_SIZE));
        assert_eq!(disgate::pdu::decode_datagram(&datagrams[0]).unwrap().len(), 10);
    }

    #[test]
    fn unpacked_sends_one_pdu_per_datagram() {
        let tracks: Vec<Track> = (0..3).map(|i| Track::new(i, 10.0, 20.0)).collect();

        let datagrams = build_datagrams(&tracks, 0.0, false).unwrap();

        assert_eq!(datagrams.len(), 3);
        assert!(datagrams.iter().all(|d| d.len() == EntityStatePdu::SIZE));
    }
}
