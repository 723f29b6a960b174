//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The synthetic order-flow generator. Drives the book through the one gate it shares with the
// HTTP service: Poisson-arriving market orders, a periodic limit-ladder refresh shaped like a
// normal distribution around the mid price, rare multiplicative price spikes, and FIFO garbage
// collection of the liquidity the simulator itself placed.
//
// | Name             | Description                                           | Key Methods |
// |------------------|----------------------------------------------------------|------------|
// | SimulatorConfig  | Construction-time parameters, one field per CLI flag       | —          |
// | Simulator        | Owns the FIFO id history and drives the book each tick     | run_forever, step |
//--------------------------------------------------------------------------------------------------

use std::collections::VecDeque;
use std::f64::consts::PI;
use std::time::Duration;

use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::book::OrderRequest;
use crate::gate::AppGate;
use crate::types::OrderId;

/// Construction-time parameters for the simulator loop, named after the Python original's
/// `Server.__init__`/`MarketSimulator.run` keyword arguments.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub init_price: Decimal,
    pub tick_size: Decimal,
    pub take_volume: f64,
    pub make_volume: f64,
    pub bid_prob: f64,
    pub sleep: Duration,
    pub market_order_rate: f64,
    pub levels: usize,
    pub price_std: f64,
    pub volume_noise: f64,
    pub max_ladder_volume: f64,
    pub spike_probability: f64,
    pub spike_refresh_count: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            init_price: Decimal::new(1000, 1), // 100.0
            tick_size: Decimal::new(1, 1),      // 0.1
            take_volume: 25.0,
            make_volume: 10.0,
            bid_prob: 0.5,
            sleep: Duration::from_millis(50),
            market_order_rate: 15.0,
            levels: 15,
            price_std: 0.10,
            volume_noise: 10.0,
            max_ladder_volume: 1000.0,
            spike_probability: 0.002,
            spike_refresh_count: 8,
        }
    }
}

fn normal_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    (-0.5 * z * z).exp() / (sigma * (2.0 * PI).sqrt())
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn from_f64(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or(Decimal::ZERO)
}

/// Drives a book with synthetic order flow. Every mutation goes through the shared `AppGate`
/// exactly like an HTTP client's would — the simulator has no privileged path into the book.
pub struct Simulator {
    gate: AppGate,
    config: SimulatorConfig,
    bid_id_history: VecDeque<OrderId>,
    ask_id_history: VecDeque<OrderId>,
    rng: rand::rngs::ThreadRng,
    elapsed: f64,
    next_market_order_time: f64,
    default_user: &'static str,
}

impl Simulator {
    pub fn new(gate: AppGate, config: SimulatorConfig) -> Self {
        let mut rng = rand::thread_rng();
        let next_market_order_time = Exp::new(config.market_order_rate)
            .expect("market_order_rate must be positive")
            .sample(&mut rng);
        Self {
            gate,
            config,
            bid_id_history: VecDeque::new(),
            ask_id_history: VecDeque::new(),
            rng,
            elapsed: 0.0,
            next_market_order_time,
            default_user: "basic-market-maker",
        }
    }

    /// Places one ladder refresh pass around `mid_price`, in the Python original's shape: a
    /// normal-pdf-weighted base volume plus Gaussian noise, floored at zero. When the computed
    /// bid and ask prices coincide (the innermost level with a zero tick), a coin flip decides
    /// which side receives the order instead of crossing the book against itself.
    fn refresh_ladder(&mut self, mid_price: f64) {
        let levels = self.config.levels;
        let tick = to_f64(self.config.tick_size);
        let bid_mu = mid_price - levels as f64 / 2.0 * tick;
        let ask_mu = mid_price + levels as f64 / 2.0 * tick;
        let noise = Normal::new(0.0, self.config.volume_noise).expect("finite noise std");

        for i in 0..levels {
            let bid_price = mid_price - i as f64 * tick;
            let ask_price = mid_price + i as f64 * tick;

            let bid_volume =
                (self.config.make_volume * normal_pdf(bid_price, bid_mu, self.config.price_std) + noise.sample(&mut self.rng)).max(0.0);
            let ask_volume =
                (self.config.make_volume * normal_pdf(ask_price, ask_mu, self.config.price_std) + noise.sample(&mut self.rng)).max(0.0);

            if (bid_price - ask_price).abs() < f64::EPSILON {
                if self.rng.gen_bool(0.5) {
                    self.place_bid(bid_price, bid_volume);
                } else {
                    self.place_ask(ask_price, ask_volume);
                }
            } else {
                self.place_bid(bid_price, bid_volume);
                self.place_ask(ask_price, ask_volume);
            }
        }
    }

    fn place_bid(&mut self, price: f64, volume: f64) {
        if let Ok(id) = self.gate.submit(OrderRequest {
            side: Some("bid".to_string()),
            price: Some(from_f64(price)),
            volume: Some(from_f64(volume)),
            kind: Some("limit".to_string()),
            user: None,
        }) {
            self.bid_id_history.push_back(id);
        }
    }

    fn place_ask(&mut self, price: f64, volume: f64) {
        if let Ok(id) = self.gate.submit(OrderRequest {
            side: Some("ask".to_string()),
            price: Some(from_f64(price)),
            volume: Some(from_f64(volume)),
            kind: Some("limit".to_string()),
            user: None,
        }) {
            self.ask_id_history.push_back(id);
        }
    }

    /// Draws a lognormal bump on top of the base take volume, clamped to `max_order_volume`, and
    /// submits a market order on a coin-weighted side. Anonymous: the Python original passes
    /// `user=None` for simulated flow, reserving `user` for real clients.
    fn place_random_market_order(&mut self) {
        let z: f64 = Normal::new(0.0_f64, 1.0).unwrap().sample(&mut self.rng);
        let bumped = self.config.take_volume / 4.0 * z.exp();
        let volume = (self.config.take_volume + bumped).min(to_f64(self.gate.max_order_volume()));
        let side = if self.rng.gen_bool(self.config.bid_prob) { "bid" } else { "ask" };
        let _ = self.gate.submit(OrderRequest {
            side: Some(side.to_string()),
            price: None,
            volume: Some(from_f64(volume)),
            kind: Some("market".to_string()),
            user: None,
        });
    }

    /// Cancels the oldest simulator-owned orders on each side while that side's resting volume
    /// exceeds `max_ladder_volume` plus a small noise margin — mirrors `del_old_orders`.
    fn garbage_collect(&mut self) {
        let margin = Normal::new(0.0, self.config.max_ladder_volume / 100.0)
            .expect("finite noise std")
            .sample(&mut self.rng)
            .abs();
        let threshold = from_f64(self.config.max_ladder_volume + margin);

        while to_f64(self.gate.bid_volume()) > to_f64(threshold) {
            let Some(id) = self.bid_id_history.pop_front() else {
                warn!("bid ladder over threshold with no tracked simulator orders left");
                break;
            };
            self.gate.cancel(id);
        }
        while to_f64(self.gate.ask_volume()) > to_f64(threshold) {
            let Some(id) = self.ask_id_history.pop_front() else {
                warn!("ask ladder over threshold with no tracked simulator orders left");
                break;
            };
            self.gate.cancel(id);
        }
    }

    /// Advances the simulation by one tick: possibly a market order, always a ladder refresh,
    /// possibly a spike, then garbage collection. Returns the mid price used this tick (after any
    /// spike), or `None` before the book has ever had two-sided liquidity.
    pub fn step(&mut self) -> Option<Decimal> {
        self.elapsed += self.config.sleep.as_secs_f64();
        if self.elapsed >= self.next_market_order_time {
            self.place_random_market_order();
            self.next_market_order_time += Exp::new(self.config.market_order_rate)
                .expect("market_order_rate must be positive")
                .sample(&mut self.rng);
        }

        let mut mid = to_f64(self.gate.mid_price().unwrap_or(self.config.init_price));
        self.refresh_ladder(mid);

        if self.rng.gen_bool(self.config.spike_probability) {
            let direction = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            let magnitude = self.rng.gen_range(1..=3) as f64 / 100.0;
            mid *= 1.0 + direction * magnitude;
            info!(new_mid = mid, "price spike");
            for _ in 0..self.config.spike_refresh_count {
                self.refresh_ladder(mid);
            }
        }

        self.garbage_collect();
        self.gate.mid_price()
    }

    /// Seeds the book with an initial ladder and the default market-maker placeholder account,
    /// then ticks forever at the configured sleep interval. Intended to run on a dedicated thread.
    pub fn run_forever(&mut self) {
        self.gate.touch_user(self.default_user);
        self.refresh_ladder(to_f64(self.config.init_price));
        loop {
            self.step();
            std::thread::sleep(self.config.sleep);
        }
    }
}
