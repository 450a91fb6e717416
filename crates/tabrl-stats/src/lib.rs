//! Summary statistics for learning curves and reward samples.
//!
//! # Modules
//!
//! - [`descriptive`]: min, max, mean, median and spread of a dataset
//! - [`series`]: windowed summaries of per-step time series
//!
//! # Examples
//!
//! ```
//! use tabrl_stats::{descriptive::DescriptiveStats, series};
//!
//! let rewards = [0.0, 1.0, 2.0, 3.0];
//! let stats = DescriptiveStats::new(rewards).unwrap();
//! assert_eq!(stats.mean, 1.5);
//!
//! assert_eq!(series::window_means(&rewards, 2), vec![0.5, 2.5]);
//! ```

pub mod descriptive;
pub mod series;
