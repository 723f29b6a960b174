//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The CLI entry point: parses construction-time configuration, seeds the book, spawns the
// synthetic-flow simulator on its own thread, and serves the HTTP API on the main tokio runtime.
// Equivalent to the Python original's `main.py` starting a server thread and a client thread —
// here the "client" half (the reference market-maker) is out of scope, so only the service and
// the simulator run.
//--------------------------------------------------------------------------------------------------

use std::net::SocketAddr;

use clap::Parser;
use tracing::{error, info, Level};

use sim_lob::api::Api;
use sim_lob::{AppGate, Book, Config, Simulator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = Config::parse();
    info!(?config, "starting sim-lob server");

    let book = Book::new(config.tick_size, config.max_order_volume);
    let gate = AppGate::new(book);

    let simulator_config = config.simulator_config();
    let simulator_gate = gate.clone();
    std::thread::Builder::new()
        .name("simulator".to_string())
        .spawn(move || {
            let mut simulator = Simulator::new(simulator_gate, simulator_config);
            simulator.run_forever();
        })
        .expect("failed to spawn simulator thread");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let api = Api::new(addr, gate);
    if let Err(err) = api.serve().await {
        error!(%err, "API server exited with an error");
        return Err(Box::new(err));
    }

    Ok(())
}
