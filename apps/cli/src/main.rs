use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nfc_host_core::caps::{self, TagTechnology};
use nfc_host_core::{
    DiscoveryParameters, HostConfig, HostEvent, NativeP2pDevice, NativeTag, NfcDeviceHost,
    SimulatedDriver, TechMask, TomlPreferenceStore, TracingListener,
};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "NFC device host tool (simulated controller)", long_about = None)]
struct Args {
    /// Path to host configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the controller capability table
    Caps,
    /// Run the firmware currency check
    CheckFirmware {
        /// Number of download attempts the simulated controller rejects
        #[arg(long, default_value_t = 0)]
        fail_downloads: usize,
    },
    /// Scripted bring-up: firmware, init, discovery, sockets and a burst of events
    Simulate,
    /// Write a default configuration file
    InitConfig {
        /// Output path
        #[arg(default_value = "nfchost.toml")]
        path: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(if args.verbose {
                    tracing::Level::DEBUG.into()
                } else {
                    tracing::Level::INFO.into()
                })
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(e) = run(args) {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => HostConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => HostConfig::default(),
    };

    match args.command {
        Commands::Caps => {
            print_caps();
            Ok(())
        }
        Commands::CheckFirmware { fail_downloads } => check_firmware(&config, fail_downloads),
        Commands::Simulate => simulate(&config),
        Commands::InitConfig { path } => {
            HostConfig::default().save_to_file(&path)?;
            info!(path = %path.display(), "Wrote default configuration");
            Ok(())
        }
    }
}

fn print_caps() {
    println!("{:<18} {:>8}", "Technology", "MaxLen");
    for tech in TagTechnology::ALL {
        println!(
            "{:<18} {:>8}",
            tech.to_string(),
            caps::max_transceive_length(tech)
        );
    }
    println!();
    println!("Default LLCP MIU:          {}", caps::default_llcp_miu());
    println!("Default LLCP RW:           {}", caps::default_llcp_rw_size());
    println!(
        "Extended length APDUs:     {}",
        caps::extended_length_apdus_supported()
    );
    println!(
        "Screen-off suspend:        {}",
        caps::enable_screen_off_suspend()
    );
    println!("AID table size:            {}", caps::aid_table_size());
    println!("LF T3T identifiers:        {}", caps::lf_t3t_max());
}

fn open_host(
    config: &HostConfig,
    driver: SimulatedDriver,
) -> Result<NfcDeviceHost<SimulatedDriver, TomlPreferenceStore, TracingListener>> {
    let prefs = TomlPreferenceStore::open(&config.preferences_path)
        .with_context(|| format!("opening preferences {}", config.preferences_path.display()))?;
    Ok(NfcDeviceHost::new(
        config,
        driver,
        prefs,
        Arc::new(TracingListener),
    ))
}

fn check_firmware(config: &HostConfig, fail_downloads: usize) -> Result<()> {
    let driver = SimulatedDriver::new();
    driver.queue_downloads(&vec![false; fail_downloads]);
    let mut host = open_host(config, driver.clone())?;

    let status = host.check_firmware()?;
    info!(?status, downloads = driver.download_count(), "Firmware check complete");
    Ok(())
}

fn simulate(config: &HostConfig) -> Result<()> {
    let driver = SimulatedDriver::new();
    let mut host = open_host(config, driver.clone())?;

    // Not fatal: NFC stays usable with stale firmware
    if let Err(e) = host.check_firmware() {
        warn!(error = %e, "Firmware check failed, continuing");
    }

    host.initialize()?;
    let nci = host.nci_version();
    info!(name = host.name(), nci = %format!("0x{:02X}", nci), "Controller ready");

    let params = DiscoveryParameters::builder()
        .tech_mask(TechMask::ALL)
        .p2p(true)
        .build();
    host.enable_discovery(&params, false);

    let server = host.create_llcp_server_socket(0x04, Some("urn:nfc:sn:snep"), 248, 1, 1024)?;
    info!(sap = server.sap, handle = server.handle.0, "SNEP server listening");

    // Events arrive from the driver's notification thread
    let dispatcher = host.dispatcher();
    std::thread::spawn(move || {
        let peer = NativeP2pDevice {
            handle: 1,
            initiator: false,
            general_bytes: vec![0x46, 0x66, 0x6D, 0x01, 0x01, 0x11],
        };
        let events = [
            HostEvent::FieldActivated,
            HostEvent::TagDiscovered(NativeTag {
                handle: 2,
                technologies: vec![TagTechnology::NfcA as u32, TagTechnology::IsoDep as u32],
                uid: vec![0x04, 0x52, 0x7C, 0xA2, 0x4F, 0x5C, 0x80],
            }),
            HostEvent::PeerLinkActivated(peer.clone()),
            HostEvent::PeerLinkDeactivated(peer),
            HostEvent::HostEmulationActivated { technology: 1 },
            HostEvent::HostEmulationData {
                technology: 1,
                data: vec![0x00, 0xA4, 0x04, 0x00, 0x07, 0xD2, 0x76, 0x00, 0x00, 0x85, 0x01, 0x01],
            },
            HostEvent::HostEmulationDeactivated { technology: 1 },
            HostEvent::FieldDeactivated,
        ];
        for event in events {
            dispatcher.dispatch(event);
        }
    })
    .join()
    .map_err(|_| anyhow::anyhow!("notification thread panicked"))?;

    host.disable_discovery();
    host.deinitialize()?;
    info!(commands = driver.commands().len(), "Simulation complete");
    Ok(())
}
