use std::io::{self, Write};

use dotenv::dotenv;

use config::Config;
use map::MapRenderer;
use resolver::Resolver;

mod config;
mod error;
mod geolocations;
mod logger;
mod map;
mod public_ip;
mod resolver;
mod reverse;
mod structs;
mod tracker;

fn prompt() -> io::Result<String> {
    print!("Enter an IP address to look up or press Enter to use your own IP: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let resolver = Resolver::new(config)?;
    let renderer = MapRenderer::new(resolver.config().output.clone());

    println!(" Welcome to the IP Geolocation Tracker! ");
    let ip = prompt()?;
    tracker::track(&resolver, &renderer, Some(ip.as_str())).await;

    Ok(())
}

// Failures are reported on stdout; the exit status is always success.
#[tokio::main]
async fn main() {
    dotenv().ok();
    if let Err(e) = logger::init_logger() {
        eprintln!("logger: {}", e);
    }

    if let Err(e) = run().await {
        log::warn!("{:#}", e);
        println!("Error: {:#}", e);
    }
}
