//! Simulated stock ticker and the per-connection push loop.
//!
//! A connection is Active while [`stream_ticks`] runs and Closed once it returns. Every
//! exit path (peer close, receive error, failed delivery, cancellation) ends the loop,
//! which drops the interval timer with it.

use axum::extract::ws::Message;
use chrono::{SecondsFormat, Utc};
use futures::{Sink, SinkExt, Stream, StreamExt};
use rand::Rng;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{config::TickerConfig, models::StockTick};

/// Lowest generated price in cents (inclusive).
pub const PRICE_FLOOR_CENTS: u32 = 14_000;
/// Highest generated price in cents (exclusive).
pub const PRICE_CEILING_CENTS: u32 = 15_000;

#[derive(Debug, Clone)]
pub struct StockTicker {
    symbol: String,
    period: Duration,
}

impl StockTicker {
    pub fn new(symbol: impl Into<String>, period: Duration) -> Self {
        Self {
            symbol: symbol.into(),
            period,
        }
    }

    pub fn from_config(config: &TickerConfig) -> Self {
        Self::new(config.symbol.clone(), config.interval())
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_tick(&self) -> StockTick {
        let cents = rand::rng().random_range(PRICE_FLOOR_CENTS..PRICE_CEILING_CENTS);
        StockTick {
            symbol: self.symbol.clone(),
            price: format_cents(cents),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Renders whole cents as a decimal string with exactly two fractional digits.
pub fn format_cents(cents: u32) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Why a connection left the Active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    /// The peer sent a close frame, hung up, or the read side errored.
    PeerClosed,
    /// A tick could not be written to the peer.
    DeliveryFailed,
    /// The registry cancelled the connection.
    Cancelled,
}

/// Pushes one tick per period into `sink` until the connection goes away.
///
/// The first tick fires one full period after the call. Late ticks are delayed, never
/// bunched up to catch up. Frames read from `incoming` are only inspected for closure.
/// On cancellation a close frame is sent before returning.
pub async fn stream_ticks<S, R, E>(
    sink: &mut S,
    incoming: &mut R,
    ticker: &StockTicker,
    cancel: &CancellationToken,
) -> Teardown
where
    S: Sink<Message> + Unpin,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: std::fmt::Display,
{
    let period = ticker.period();
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                // Best effort; the peer may already be gone.
                let _ = sink.send(Message::Close(None)).await;
                return Teardown::Cancelled;
            }

            frame = incoming.next() => match frame {
                None | Some(Ok(Message::Close(_))) => return Teardown::PeerClosed,
                Some(Err(e)) => {
                    debug!("Realtime read failed: {}", e);
                    return Teardown::PeerClosed;
                }
                Some(Ok(_)) => continue,
            },

            _ = interval.tick() => {
                let payload = match serde_json::to_string(&ticker.next_tick()) {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!("Failed to encode stock tick: {}", e);
                        continue;
                    }
                };
                if sink.send(Message::Text(payload.into())).await.is_err() {
                    return Teardown::DeliveryFailed;
                }
            }
        }
    }
}
