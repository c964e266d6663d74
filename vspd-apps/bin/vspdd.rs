use anyhow::{Context, Result};
use clap::{crate_version, App, Arg, ArgMatches};
use std::{net::IpAddr, sync::Arc};
use vspd::{default_checks, DetectorConfig, DetectorServer, FileInventory, StagingBuffer, YamlConfig};

#[macro_use]
extern crate log;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = get_matches();

    let config_path = matches
        .value_of("config")
        .context("expect detector config, use -h for help")?;
    println!("Detector config: {:?}", config_path);
    let config: DetectorConfig = YamlConfig::get(config_path)?;

    log4rs::init_file(config.log_config(), Default::default())
        .with_context(|| format!("can't init logger from {}", config.log_config()))?;

    let http_api_address = match matches.value_of("http_api_address") {
        Some(v) => v
            .parse::<IpAddr>()
            .with_context(|| format!("bad http api address: {}", v))?,
        None => config.http_api_address(),
    };
    let http_api_port = match matches.value_of("http_api_port") {
        Some(v) => v
            .parse::<u16>()
            .with_context(|| format!("bad http api port: {}", v))?,
        None => config.http_api_port(),
    };

    let buffer = Arc::new(StagingBuffer::new());
    let detector = DetectorServer::new(buffer)?;

    info!("Start API server");
    detector.run_api_server(http_api_address, http_api_port)?;

    create_signal_handlers()?;

    info!("Start check runner, inventory: {}", config.inventory());
    let runner = detector.run_periodic_tasks(
        Arc::new(FileInventory::new(config.inventory())),
        default_checks(),
        config.check_interval(),
    );
    runner.await.context("check runner stopped")?;
    Ok(())
}

fn create_signal_handlers() -> Result<()> {
    use tokio::signal::unix::SignalKind;
    let signals = [SignalKind::terminate(), SignalKind::interrupt()];
    for s in signals.iter() {
        spawn_signal_handler(*s)?;
    }
    Ok(())
}

fn spawn_signal_handler(s: tokio::signal::unix::SignalKind) -> Result<()> {
    use tokio::signal::unix::signal;
    let mut task = signal(s)?;
    tokio::spawn(async move {
        task.recv().await;
        info!("Got signal {:?}, shutting down", s);
        std::process::exit(0);
    });
    Ok(())
}

fn get_matches<'a>() -> ArgMatches<'a> {
    App::new("vspdd")
        .version(crate_version!())
        .arg(
            Arg::with_name("config")
                .help("detector config file")
                .takes_value(true)
                .required(true)
                .short("c")
                .long("config"),
        )
        .arg(
            Arg::with_name("http_api_address")
                .help("http api address")
                .short("h")
                .long("host")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("http_api_port")
                .help("http api port")
                .short("p")
                .long("port")
                .takes_value(true),
        )
        .get_matches()
}
