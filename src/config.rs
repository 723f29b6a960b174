//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Construction-time configuration for the server binary, parsed from CLI flags. Defaults mirror
// the Python original's `Server.__init__`/`run_market_simulator` keyword defaults so the two
// systems behave the same out of the box.
//--------------------------------------------------------------------------------------------------

use std::time::Duration;

use clap::Parser;
use rust_decimal::Decimal;

use crate::simulator::SimulatorConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "sim-lob-server", about = "Simulated limit-order-book venue")]
pub struct Config {
    /// Port the HTTP service listens on.
    #[arg(long, env = "SIM_LOB_PORT", default_value_t = 5001)]
    pub port: u16,

    /// Minimum price increment.
    #[arg(long, env = "SIM_LOB_TICK_SIZE", default_value = "0.1")]
    pub tick_size: Decimal,

    /// Initial mid price the simulator seeds the book with.
    #[arg(long, env = "SIM_LOB_INIT_PRICE", default_value = "100.0")]
    pub init_price: Decimal,

    /// Hard cap on any single order's volume.
    #[arg(long, env = "SIM_LOB_MAX_ORDER_VOLUME", default_value = "100.0")]
    pub max_order_volume: Decimal,

    /// Approximate ceiling on one side's resting volume before the simulator garbage-collects it.
    #[arg(long, env = "SIM_LOB_MAX_LADDER_VOLUME", default_value_t = 1000.0)]
    pub max_ladder_volume: f64,

    /// Base volume for simulated market orders.
    #[arg(long, env = "SIM_LOB_TAKE_VOLUME", default_value_t = 25.0)]
    pub take_volume: f64,

    /// Base volume for simulated limit orders.
    #[arg(long, env = "SIM_LOB_MAKE_VOLUME", default_value_t = 10.0)]
    pub make_volume: f64,

    /// Probability that a simulated market order is a bid.
    #[arg(long, env = "SIM_LOB_BID_PROB", default_value_t = 0.5)]
    pub bid_prob: f64,

    /// Simulator tick length in milliseconds.
    #[arg(long, env = "SIM_LOB_SLEEP_MS", default_value_t = 50)]
    pub sleep_ms: u64,

    /// Poisson rate (λ) for simulated market-order arrivals, per second.
    #[arg(long, env = "SIM_LOB_MARKET_ORDER_RATE", default_value_t = 15.0)]
    pub market_order_rate: f64,

    /// Number of ladder levels refreshed on each side per tick.
    #[arg(long, env = "SIM_LOB_LEVELS", default_value_t = 15)]
    pub levels: usize,
}

impl Config {
    pub fn simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig {
            init_price: self.init_price,
            tick_size: self.tick_size,
            take_volume: self.take_volume,
            make_volume: self.make_volume,
            bid_prob: self.bid_prob,
            sleep: Duration::from_millis(self.sleep_ms),
            market_order_rate: self.market_order_rate,
            levels: self.levels,
            max_ladder_volume: self.max_ladder_volume,
            ..SimulatorConfig::default()
        }
    }
}
