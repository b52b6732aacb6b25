use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use disgate::config::build_catalog;
use disgate::net::MAX_DATAGRAM_SIZE;
use disgate::{
    CatalogEntry, ClientConfig, DisClient, EntityId, EntityStatePdu, EntityTypeDescriptor,
    SimWorld, Transport, UdpTransport, World,
};
use glam::DVec3;

static PORT_COUNTER: AtomicU16 = AtomicU16::new(41000);

fn next_port() -> u16 {
    PORT_COUNTER.fetch_add(10, Ordering::SeqCst)
}

fn loopback(local_port: u16, host_port: u16) -> ClientConfig {
    ClientConfig {
        host_address: "127.0.0.1".to_string(),
        host_port,
        local_address: "127.0.0.1".to_string(),
        local_port,
    }
}

fn catalog() -> Arc<disgate::TypeCatalog> {
    Arc::new(
        build_catalog(vec![
            CatalogEntry::new(EntityTypeDescriptor::new(1, 3, 0, 0, 0, 0, 0), "Frigate"),
            CatalogEntry::new(EntityTypeDescriptor::new(1, 2, 0, 20, 0, 0, 0), "SepecatJaguar"),
        ])
        .unwrap(),
    )
}

fn wait_for_entities(
    client: &mut DisClient<SimWorld>,
    world: &mut SimWorld,
    count: usize,
    timeout_ms: u64,
) -> bool {
    let start = Instant::now();
    while start.elapsed() < Duration::from_millis(timeout_ms) {
        client.update(world, 0.001);
        if client.entities().len() >= count {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

fn jaguar(entity: u16) -> EntityStatePdu {
    let mut pdu = EntityStatePdu::new(
        EntityId::new(7, 3, entity),
        EntityTypeDescriptor::new(1, 2, 225, 20, 2, 10, 0),
    );
    pdu.location = DVec3::new(4_000_000.0, 3_000_000.0, 3_500_000.0);
    pdu.marking = format!("JAG{entity}");
    pdu
}

#[test]
fn test_entity_state_over_udp_creates_entity() {
    let port = next_port();
    let mut client: DisClient<SimWorld> =
        DisClient::connect(&loopback(port, port + 1), catalog()).unwrap();
    let mut sender = UdpTransport::bind(&loopback(port + 1, port)).unwrap();
    let mut world = SimWorld::new();

    sender.send(&jaguar(1).encode().unwrap()).unwrap();

    assert!(wait_for_entities(&mut client, &mut world, 1, 500), "No entity created");
    let tracked = client.entities().get(&EntityId::new(7, 3, 1)).unwrap();
    assert_eq!(tracked.template.as_str(), "SepecatJaguar");
    assert_eq!(tracked.marking, "JAG1");
    assert_eq!(
        world.position(tracked.handle),
        Some(DVec3::new(4_000_000.0, 3_000_000.0, 3_500_000.0))
    );
}

#[test]
fn test_packed_datagram_over_udp() {
    let port = next_port();
    let mut client: DisClient<SimWorld> =
        DisClient::connect(&loopback(port, port + 1), catalog()).unwrap();
    let mut sender = UdpTransport::bind(&loopback(port + 1, port)).unwrap();
    let mut world = SimWorld::new();

    let mut datagram = Vec::new();
    for entity in 1..=3 {
        jaguar(entity).encode_into(&mut datagram).unwrap();
    }
    sender.send(&datagram).unwrap();

    assert!(wait_for_entities(&mut client, &mut world, 3, 500), "Entities missing");
    assert_eq!(client.stats().datagrams_received, 1);
    assert_eq!(client.stats().entities_created, 3);
    assert_eq!(world.entity_count(), 3);
}

#[test]
fn test_oversize_datagram_is_dropped() {
    let port = next_port();
    let mut client: DisClient<SimWorld> =
        DisClient::connect(&loopback(port, port + 1), catalog()).unwrap();
    let sender = std::net::UdpSocket::bind(("127.0.0.1", port + 1)).unwrap();
    let mut world = SimWorld::new();

    sender
        .send_to(&vec![0u8; MAX_DATAGRAM_SIZE + 100], ("127.0.0.1", port))
        .unwrap();

    let start = Instant::now();
    while client.stats().datagrams_oversize == 0 && start.elapsed() < Duration::from_millis(500) {
        client.update(&mut world, 0.001);
        thread::sleep(Duration::from_millis(1));
    }

    assert_eq!(client.stats().datagrams_oversize, 1);
    assert_eq!(client.stats().datagrams_received, 0);
    assert!(client.entities().is_empty());
}
