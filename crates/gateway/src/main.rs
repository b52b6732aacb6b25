mod config;
mod gateway;
mod tui;

use std::io;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use config::GatewayConfig;
use gateway::Gateway;
use tui::TuiState;

#[derive(Parser)]
#[command(name = "disgate")]
#[command(about = "Mirrors DIS entities into a local simulation")]
struct Args {
    #[arg(short, long, help = "JSON gateway configuration")]
    config: Option<PathBuf>,

    #[arg(long, help = "Remote DIS host")]
    host: Option<String>,

    #[arg(long)]
    host_port: Option<u16>,

    #[arg(short, long)]
    local_port: Option<u16>,

    #[arg(short, long)]
    tick_rate: Option<u32>,

    #[arg(long)]
    headless: bool,
}

impl Args {
    fn gateway_config(&self) -> Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::load(path)?,
            None => GatewayConfig::default(),
        };

        if let Some(host) = &self.host {
            config.client.host_address.clone_from(host);
        }
        if let Some(port) = self.host_port {
            config.client.host_port = port;
        }
        if let Some(port) = self.local_port {
            config.client.local_port = port;
        }
        if let Some(tick_rate) = self.tick_rate {
            config.tick_rate = tick_rate;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.gateway_config()?;

    if args.headless {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let mut gateway = Gateway::new(config)?;

    if args.headless {
        log::info!(
            "Gateway listening on {}, remote {}",
            gateway.local_addr(),
            gateway.remote_addr()
        );
        gateway.run();
        log::info!("Gateway shutting down");
    } else {
        run_with_tui(&mut gateway)?;
    }

    Ok(())
}

fn run_with_tui(gateway: &mut Gateway) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let running = gateway.running();
    let mut tui_state = TuiState::new();

    tui_state.log_info(format!(
        "Listening on {}, remote {}",
        gateway.local_addr(),
        gateway.remote_addr()
    ));

    let mut last_stats = gateway.stats().client;

    while running.load(Ordering::SeqCst) {
        let frame_start = Instant::now();
        let summary = gateway.tick_once();

        if summary.created > 0 {
            tui_state.log_info(format!("{} new entities", summary.created));
        }
        let stats = gateway.stats();
        if stats.client.datagrams_dropped > last_stats.datagrams_dropped {
            tui_state.log_warn("Dropped malformed datagram");
        }
        if stats.client.datagrams_oversize > last_stats.datagrams_oversize {
            tui_state.log_error("Dropped oversize datagram");
        }
        last_stats = stats.client.clone();

        let timeout = gateway.tick_duration().saturating_sub(frame_start.elapsed());
        if event::poll(timeout.max(Duration::from_millis(1)))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => {
                            running.store(false, Ordering::SeqCst);
                        }
                        KeyCode::PageUp => tui_state.scroll_up(),
                        KeyCode::PageDown => tui_state.scroll_down(),
                        KeyCode::End => tui_state.scroll_to_bottom(),
                        _ => {}
                    }
                }
            }
        }

        let entities = gateway.entity_infos();
        terminal.draw(|frame| {
            tui::render(frame, &tui_state, &stats, &entities);
        })?;
    }

    tui_state.log_info("Shutting down...");
    gateway.shutdown();

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;

    Ok(())
}
