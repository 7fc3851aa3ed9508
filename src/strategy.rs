//! Strategy selection for callers that measure the accumulators

use std::fmt;
use std::str::FromStr;

use crate::config::SumConfig;
use crate::error::Result;
use crate::isolated::compute_isolated;
use crate::range::SumRange;
use crate::serial::compute_serial_partitioned;
use crate::shared_array::{compute_padded, compute_shared_array};

/// One of the accumulator strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Single-threaded baseline
    Serial,
    /// Workers accumulate into adjacent slots of one array
    SharedArray,
    /// Workers keep private locals and send them over a channel
    Isolated,
    /// Workers accumulate into cache-line padded slots
    Padded,
}

impl Strategy {
    /// Every strategy, baseline first
    pub const ALL: [Strategy; 4] = [
        Strategy::Serial,
        Strategy::SharedArray,
        Strategy::Isolated,
        Strategy::Padded,
    ];

    /// Short name used on the command line and in reports
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Serial => "serial",
            Strategy::SharedArray => "shared-array",
            Strategy::Isolated => "isolated",
            Strategy::Padded => "padded",
        }
    }

    /// Run the strategy once
    ///
    /// `Serial` sums the elements the configured partition covers, so its
    /// result is comparable with the parallel strategies.
    pub fn run(self, range: SumRange, config: &SumConfig) -> Result<i64> {
        match self {
            Strategy::Serial => Ok(compute_serial_partitioned(
                range,
                config.resolved_workers(),
                config.partition,
            )),
            Strategy::SharedArray => compute_shared_array(range, config),
            Strategy::Isolated => compute_isolated(range, config),
            Strategy::Padded => compute_padded(range, config),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "serial" => Ok(Strategy::Serial),
            "shared" | "shared-array" | "concurrent" => Ok(Strategy::SharedArray),
            "isolated" | "channel" => Ok(Strategy::Isolated),
            "padded" => Ok(Strategy::Padded),
            other => Err(format!("unknown strategy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::PartitionMode;

    #[test]
    fn test_all_strategies_agree() {
        let ranges = [
            SumRange::new(0, 100),
            SumRange::new(0, 10),
            SumRange::new(-50, 1_001),
            SumRange::new(0, 3),
            SumRange::new(10, 0),
        ];

        for range in ranges {
            for workers in [1, 3, 4, 9] {
                for mode in [PartitionMode::Truncating, PartitionMode::Balanced] {
                    let config = SumConfig::new().with_workers(workers).with_partition(mode);
                    let baseline = Strategy::Serial.run(range, &config).unwrap();
                    for strategy in Strategy::ALL {
                        assert_eq!(
                            strategy.run(range, &config).unwrap(),
                            baseline,
                            "{} over {:?} with {} workers ({})",
                            strategy,
                            range,
                            workers,
                            mode
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_reference_scenarios() {
        let config = SumConfig::new().with_workers(4);
        for strategy in Strategy::ALL {
            assert_eq!(strategy.run(SumRange::new(0, 100), &config).unwrap(), 4950);
            assert_eq!(strategy.run(SumRange::new(0, 10), &config).unwrap(), 28);
        }
    }

    #[test]
    fn test_zero_workers() {
        let config = SumConfig::new().with_workers(0);
        for strategy in Strategy::ALL {
            assert_eq!(strategy.run(SumRange::new(0, 10), &config).unwrap(), 45);
        }
    }

    #[test]
    fn test_repeated_runs_are_stable() {
        let config = SumConfig::new().with_workers(4);
        let range = SumRange::new(0, 1_000);
        for _ in 0..1000 {
            for strategy in [Strategy::SharedArray, Strategy::Isolated, Strategy::Padded] {
                assert_eq!(strategy.run(range, &config).unwrap(), 499_500, "{}", strategy);
            }
        }
    }

    #[test]
    fn test_default_worker_count() {
        let config = SumConfig::new();
        let range = SumRange::new(0, 10_000);
        let expected = Strategy::Serial.run(range, &config).unwrap();
        assert_eq!(Strategy::Isolated.run(range, &config).unwrap(), expected);
        assert_eq!(Strategy::SharedArray.run(range, &config).unwrap(), expected);
    }

    #[test]
    fn test_parse_names() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!("Channel".parse::<Strategy>(), Ok(Strategy::Isolated));
        assert_eq!("shared".parse::<Strategy>(), Ok(Strategy::SharedArray));
        assert_eq!("concurrent".parse::<Strategy>(), Ok(Strategy::SharedArray));
        assert!("atomic".parse::<Strategy>().is_err());
    }
}
