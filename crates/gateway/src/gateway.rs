use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use disgate::{
    ClientError, ClientStats, DeadReckoningModel, DisClient, DispatchSummary, EntityId, SimWorld,
    World,
};
use glam::DVec3;

use crate::config::GatewayConfig;

/// Row shown in the monitor's entity table.
#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub id: EntityId,
    pub template: String,
    pub marking: String,
    pub model: DeadReckoningModel,
    pub position: Option<DVec3>,
    pub age_secs: f64,
}

#[derive(Debug, Clone, Default)]
pub struct GatewayStats {
    pub tick: u64,
    pub uptime_secs: u64,
    pub entity_count: usize,
    pub catalog_size: usize,
    pub client: ClientStats,
}

pub struct Gateway {
    client: DisClient<SimWorld>,
    world: SimWorld,
    tick: u64,
    tick_duration: Duration,
    last_tick_time: Instant,
    start_time: Instant,
    running: Arc<AtomicBool>,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Result<Self, ClientError> {
        let client = DisClient::from_entries(&config.client, config.templates)?;
        let tick_rate = config.tick_rate.max(1);

        Ok(Self {
            client,
            world: SimWorld::new(),
            tick: 0,
            tick_duration: Duration::from_secs_f64(1.0 / tick_rate as f64),
            last_tick_time: Instant::now(),
            start_time: Instant::now(),
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.client.transport().local_addr()
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.client.transport().remote_addr()
    }

    pub fn running(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    pub fn run(&mut self) {
        while self.running.load(Ordering::SeqCst) {
            self.tick_once();
            std::thread::sleep(self.tick_duration);
        }
        self.shutdown();
    }

    /// Advances the client by the wall time since the previous tick.
    pub fn tick_once(&mut self) -> DispatchSummary {
        let now = Instant::now();
        let dt = (now - self.last_tick_time).as_secs_f64();
        self.last_tick_time = now;
        self.tick += 1;

        self.client.update(&mut self.world, dt)
    }

    pub fn shutdown(&mut self) {
        self.client.shutdown(&mut self.world);
    }

    pub fn stats(&self) -> GatewayStats {
        GatewayStats {
            tick: self.tick,
            uptime_secs: self.start_time.elapsed().as_secs(),
            entity_count: self.client.entities().len(),
            catalog_size: self.client.catalog().len(),
            client: self.client.stats().clone(),
        }
    }

    pub fn entity_infos(&self) -> Vec<EntityInfo> {
        let now = self.client.clock_secs();
        self.client
            .entities()
            .iter()
            .map(|(id, entity)| EntityInfo {
                id: *id,
                template: entity.template.to_string(),
                marking: entity.marking.clone(),
                model: entity.dead_reckoning,
                position: self.world.position(entity.handle),
                age_secs: now - entity.last_update_secs,
            })
            .collect()
    }
}
