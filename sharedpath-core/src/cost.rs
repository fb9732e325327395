//! Path cost evaluation.

use std::time::Duration;

use crate::{MetricsTable, MissingMetricError, StopId};

/// Total distance and duration of an ordering.
///
/// Costs order lexicographically: distance first, duration as tie-break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cost {
    /// Total distance in metres.
    pub distance_m: u64,
    /// Total travel duration.
    #[cfg_attr(feature = "serde", serde(rename = "duration_s", with = "crate::serde_secs"))]
    pub duration: Duration,
}

impl Cost {
    /// A cost of zero metres and zero seconds.
    pub const ZERO: Self = Self {
        distance_m: 0,
        duration: Duration::ZERO,
    };

    /// Construct a cost.
    #[must_use]
    pub const fn new(distance_m: u64, duration: Duration) -> Self {
        Self {
            distance_m,
            duration,
        }
    }

    /// Cost of the single hop `from -> to`.
    ///
    /// # Errors
    ///
    /// Returns [`MissingMetricError`] if either metric is unknown.
    pub fn of_hop(table: &MetricsTable, from: StopId, to: StopId) -> Result<Self, MissingMetricError> {
        Ok(Self::new(table.distance(from, to)?, table.duration(from, to)?))
    }

    /// Componentwise sum, saturating on overflow.
    #[must_use]
    pub fn plus(self, other: Self) -> Self {
        Self::new(
            self.distance_m.saturating_add(other.distance_m),
            self.duration.saturating_add(other.duration),
        )
    }
}

/// Sum the hop costs of consecutive pairs in `path`.
///
/// An empty or single-stop path costs [`Cost::ZERO`].
///
/// # Errors
///
/// Returns [`MissingMetricError`] for the first consecutive pair the table
/// cannot answer.
///
/// # Examples
/// ```
/// use sharedpath_core::{Cost, Group, MetricsTable, StopId, StopSet, TravelMetrics, path_cost};
/// use std::time::Duration;
///
/// let stops = StopSet::new(vec![Default::default()], vec![Default::default()]);
/// let secs = |s| Some(Duration::from_secs(s));
/// let metrics = TravelMetrics::new(
///     vec![vec![Some(0), Some(250)], vec![Some(300), Some(0)]],
///     vec![vec![secs(0), secs(40)], vec![secs(45), secs(0)]],
/// );
/// let table = MetricsTable::from_metrics(&stops, metrics)?;
/// let path = [StopId::new(Group::Second, 0), StopId::new(Group::First, 0)];
/// assert_eq!(path_cost(&path, &table)?, Cost::new(300, Duration::from_secs(45)));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn path_cost(path: &[StopId], table: &MetricsTable) -> Result<Cost, MissingMetricError> {
    path.windows(2).try_fold(Cost::ZERO, |acc, pair| match pair {
        [from, to] => Ok(acc.plus(Cost::of_hop(table, *from, *to)?)),
        _ => Ok(acc),
    })
}
