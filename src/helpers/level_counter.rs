//! A `tracing` layer tallying events per level for end-of-run summaries.
//!
//! The layer only observes; it never filters or alters events, so it can sit
//! beside the formatting layer in any subscriber stack.

use getset::CopyGetters;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

const LEVELS: [Level; 5] = [
    Level::ERROR,
    Level::WARN,
    Level::INFO,
    Level::DEBUG,
    Level::TRACE,
];

fn slot(level: &Level) -> usize {
    match *level {
        Level::ERROR => 0,
        Level::WARN => 1,
        Level::INFO => 2,
        Level::DEBUG => 3,
        _ => 4,
    }
}

/// Clones share the same counters, so keep one handle and install another.
#[derive(Clone, Debug, Default)]
pub struct LevelCounter {
    counts: Arc<[AtomicU64; 5]>,
}

impl LevelCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, level: Level) -> u64 {
        self.counts[slot(&level)].load(Ordering::Relaxed)
    }

    pub fn counts(&self) -> LevelCounts {
        LevelCounts {
            error: self.count(Level::ERROR),
            warn: self.count(Level::WARN),
            info: self.count(Level::INFO),
            debug: self.count(Level::DEBUG),
            trace: self.count(Level::TRACE),
        }
    }
}

impl<S: Subscriber> Layer<S> for LevelCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.counts[slot(event.metadata().level())].fetch_add(1, Ordering::Relaxed);
    }
}

/// Snapshot of a [`LevelCounter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct LevelCounts {
    error: u64,
    warn: u64,
    info: u64,
    debug: u64,
    trace: u64,
}

impl LevelCounts {
    pub fn get(&self, level: Level) -> u64 {
        match level {
            Level::ERROR => self.error,
            Level::WARN => self.warn,
            Level::INFO => self.info,
            Level::DEBUG => self.debug,
            _ => self.trace,
        }
    }

    pub fn total(&self) -> u64 {
        LEVELS.iter().map(|l| self.get(*l)).sum()
    }

    /// `(level, count)` for every level seen at least once, most severe first.
    pub fn iter(&self) -> impl Iterator<Item = (Level, u64)> + '_ {
        LEVELS
            .iter()
            .map(|l| (*l, self.get(*l)))
            .filter(|(_, n)| *n > 0)
    }
}

impl Display for LevelCounts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.total() == 0 {
            return f.write_str("no log records");
        }
        let parts = self.iter().map(|(level, n)| format!("{level}: {n}"));
        f.write_str(&itertools::join(parts, ", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, error, info, warn};
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_counts_events_per_level() {
        let counter = LevelCounter::new();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        tracing::subscriber::with_default(subscriber, || {
            warn!("first");
            warn!("second");
            error!("broken");
            info!("fyi");
        });

        let counts = counter.counts();
        assert_eq!(counts.warn(), 2);
        assert_eq!(counts.error(), 1);
        assert_eq!(counts.info(), 1);
        assert_eq!(counts.debug(), 0);
        assert_eq!(counts.total(), 4);
        assert_eq!(counter.count(Level::WARN), 2);
    }

    #[test]
    fn test_does_not_swallow_events_for_other_layers() {
        let seen = LevelCounter::new();
        let counter = LevelCounter::new();
        let subscriber = tracing_subscriber::registry()
            .with(counter.clone())
            .with(seen.clone());
        tracing::subscriber::with_default(subscriber, || {
            debug!("one");
            error!("two");
        });
        assert_eq!(counter.counts(), seen.counts());
        assert_eq!(seen.counts().total(), 2);
    }

    #[test]
    fn test_display_summary() {
        assert_eq!(LevelCounts::default().to_string(), "no log records");
        let counts = LevelCounts {
            error: 1,
            warn: 3,
            ..Default::default()
        };
        assert_eq!(counts.to_string(), "ERROR: 1, WARN: 3");
        assert_eq!(
            counts.iter().collect::<Vec<_>>(),
            vec![(Level::ERROR, 1), (Level::WARN, 3)]
        );
    }
}
