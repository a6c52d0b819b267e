use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

lazy_static! {
    static ref GLOBAL: MetricsRegistry = MetricsRegistry::new();
}

#[derive(Debug, Clone, Default)]
pub struct ValueStats {
    pub count: u64,
    pub sum: i64,
    pub min: i64,
    pub max: i64,
    pub last: i64,
}

/// in-process sink for named counters and value metrics
pub struct MetricsRegistry {
    counters: Mutex<HashMap<String, u64>>,
    values: Mutex<HashMap<String, ValueStats>>,
}

impl MetricsRegistry {
    pub fn new() -> MetricsRegistry {
        MetricsRegistry {
            counters: Mutex::new(HashMap::new()),
            values: Mutex::new(HashMap::new()),
        }
    }

    pub fn record_value(&self, metric: &str, value: i64) {
        let mut values = self.values.lock().expect("metrics lock poisoned");
        let stats = values.entry(metric.to_string()).or_default();
        if stats.count == 0 {
            stats.min = value;
            stats.max = value;
        } else {
            stats.min = stats.min.min(value);
            stats.max = stats.max.max(value);
        }
        stats.count += 1;
        stats.sum += value;
        stats.last = value;
    }

    pub fn record_event(&self, metric: &str) {
        self.record_events(metric, 1);
    }

    pub fn record_events(&self, metric: &str, count: u64) {
        let mut counters = self.counters.lock().expect("metrics lock poisoned");
        *counters.entry(metric.to_string()).or_insert(0) += count;
    }

    pub fn start_timer(&self, metric: &str) -> MetricsTimer {
        MetricsTimer {
            registry: self,
            metric: metric.to_string(),
            started: Instant::now(),
        }
    }

    pub fn counter(&self, metric: &str) -> u64 {
        let counters = self.counters.lock().expect("metrics lock poisoned");
        counters.get(metric).copied().unwrap_or(0)
    }

    pub fn value_stats(&self, metric: &str) -> Option<ValueStats> {
        let values = self.values.lock().expect("metrics lock poisoned");
        values.get(metric).cloned()
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        MetricsRegistry::new()
    }
}

/// records its elapsed time in milliseconds as a value when dropped
pub struct MetricsTimer<'a> {
    registry: &'a MetricsRegistry,
    metric: String,
    started: Instant,
}

impl<'a> Drop for MetricsTimer<'a> {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed().as_millis() as i64;
        self.registry.record_value(&self.metric, elapsed);
    }
}

pub fn registry() -> &'static MetricsRegistry {
    &GLOBAL
}

pub fn record_value(metric: &str, value: i64) {
    GLOBAL.record_value(metric, value)
}

pub fn record_event(metric: &str) {
    GLOBAL.record_event(metric)
}

pub fn record_events(metric: &str, count: u64) {
    GLOBAL.record_events(metric, count)
}

pub fn start_timer(metric: &str) -> MetricsTimer<'static> {
    GLOBAL.start_timer(metric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_accumulate() {
        let registry = MetricsRegistry::new();
        registry.record_event("jobs");
        registry.record_events("jobs", 4);
        assert_eq!(registry.counter("jobs"), 5);
        assert_eq!(registry.counter("unknown"), 0);
    }

    #[test]
    fn values_track_min_max_and_sum() {
        let registry = MetricsRegistry::new();
        registry.record_value("latency", 30);
        registry.record_value("latency", 10);
        registry.record_value("latency", 20);

        let stats = registry.value_stats("latency").unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.sum, 60);
        assert_eq!(stats.min, 10);
        assert_eq!(stats.max, 30);
        assert_eq!(stats.last, 20);
    }

    #[test]
    fn timer_records_on_drop() {
        let registry = MetricsRegistry::new();
        {
            let _timer = registry.start_timer("elapsed");
        }
        let stats = registry.value_stats("elapsed").unwrap();
        assert_eq!(stats.count, 1);
        assert!(stats.last >= 0);
    }
}
