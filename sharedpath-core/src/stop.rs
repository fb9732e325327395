//! Stops, their identities and the per-computation stop set.
//!
//! A stop is identified by the traveler it belongs to ([`Group`]) and its
//! position within that traveler's original sequence. The identity renders as
//! `a0`, `b3` and so on, which is also the raw form accepted at the boundary.

use std::fmt;
use std::str::FromStr;

use geo::Coord;
use thiserror::Error;

/// The traveler a stop belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Group {
    /// Traveler one, rendered as `a`.
    #[cfg_attr(feature = "serde", serde(rename = "a"))]
    First,
    /// Traveler two, rendered as `b`.
    #[cfg_attr(feature = "serde", serde(rename = "b"))]
    Second,
}

impl Group {
    /// Both groups, traveler one first.
    pub const ALL: [Self; 2] = [Self::First, Self::Second];

    /// Return the other traveler.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Single-character prefix used by the textual stop identity.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::First => 'a',
            Self::Second => 'b',
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// Identity of a stop: its traveler and its position in that traveler's
/// original sequence.
///
/// Identities from different groups never compare equal, even when both
/// travelers visit the same physical place.
///
/// # Examples
/// ```
/// use sharedpath_core::{Group, StopId};
///
/// let id: StopId = "b1".parse()?;
/// assert_eq!(id, StopId::new(Group::Second, 1));
/// assert_eq!(id.to_string(), "b1");
/// # Ok::<(), sharedpath_core::ParseStopIdError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct StopId {
    /// Owning traveler.
    pub group: Group,
    /// Zero-based position within the traveler's sequence.
    pub index: usize,
}

impl StopId {
    /// Construct a stop identity.
    #[must_use]
    pub const fn new(group: Group, index: usize) -> Self {
        Self { group, index }
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.group, self.index)
    }
}

impl From<&Self> for StopId {
    fn from(id: &Self) -> Self {
        *id
    }
}

impl From<StopId> for String {
    fn from(id: StopId) -> Self {
        id.to_string()
    }
}

/// Errors returned when parsing a textual [`StopId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseStopIdError {
    /// The input was empty.
    #[error("stop identity is empty")]
    Empty,
    /// The first character was not a known group prefix.
    #[error("unknown group prefix {prefix:?} (expected 'a' or 'b')")]
    UnknownGroup {
        /// The offending prefix.
        prefix: char,
    },
    /// The remainder was not a non-negative integer.
    #[error("invalid stop index {raw:?}")]
    InvalidIndex {
        /// The text following the prefix.
        raw: String,
    },
}

impl FromStr for StopId {
    type Err = ParseStopIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let prefix = chars.next().ok_or(ParseStopIdError::Empty)?;
        let group = match prefix {
            'a' | 'A' => Group::First,
            'b' | 'B' => Group::Second,
            other => return Err(ParseStopIdError::UnknownGroup { prefix: other }),
        };
        let rest = chars.as_str();
        let index = rest
            .parse::<usize>()
            .map_err(|_| ParseStopIdError::InvalidIndex {
                raw: rest.to_owned(),
            })?;
        Ok(Self { group, index })
    }
}

impl TryFrom<String> for StopId {
    type Error = ParseStopIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A caller-supplied place.
///
/// The search never looks inside; metrics providers decide which fields
/// they need. Coordinates are WGS84 with `x = longitude` and `y = latitude`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Geographic position, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub coord: Option<Coord<f64>>,
    /// Free-form address or label.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Option<String>,
}

impl Location {
    /// A location known only by its coordinate.
    #[must_use]
    pub const fn at(coord: Coord<f64>) -> Self {
        Self {
            coord: Some(coord),
            address: None,
        }
    }

    /// A location known only by its address.
    #[must_use]
    pub fn addressed(address: impl Into<String>) -> Self {
        Self {
            coord: None,
            address: Some(address.into()),
        }
    }

    /// Attach an address or label.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// The union of both travelers' stops, assembled once per computation.
///
/// Matrix order lists traveler one's stops followed by traveler two's, which
/// is the order handed to [`crate::TravelMetricsProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct StopSet {
    locations: Vec<Location>,
    first_len: usize,
}

impl StopSet {
    /// Assemble the stop set from both travelers' sequences.
    #[must_use]
    pub fn new(first: Vec<Location>, second: Vec<Location>) -> Self {
        let first_len = first.len();
        let mut locations = first;
        locations.extend(second);
        Self {
            locations,
            first_len,
        }
    }

    /// Total number of stops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether neither traveler has any stop.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of stops belonging to `group`.
    #[must_use]
    pub fn group_len(&self, group: Group) -> usize {
        match group {
            Group::First => self.first_len,
            Group::Second => self.locations.len().saturating_sub(self.first_len),
        }
    }

    /// Identities of `group`'s stops in their original order.
    #[must_use]
    pub fn ids(&self, group: Group) -> Vec<StopId> {
        (0..self.group_len(group))
            .map(|index| StopId::new(group, index))
            .collect()
    }

    /// The traveler's first stop, if any.
    #[must_use]
    pub fn first_stop(&self, group: Group) -> Option<StopId> {
        (self.group_len(group) > 0).then_some(StopId::new(group, 0))
    }

    /// The traveler's last stop, if any.
    #[must_use]
    pub fn last_stop(&self, group: Group) -> Option<StopId> {
        self.group_len(group)
            .checked_sub(1)
            .map(|index| StopId::new(group, index))
    }

    /// Whether `id` names a stop in this set.
    #[must_use]
    pub fn contains(&self, id: StopId) -> bool {
        id.index < self.group_len(id.group)
    }

    /// Row/column of `id` in the metrics matrices.
    #[must_use]
    pub fn matrix_index(&self, id: StopId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        match id.group {
            Group::First => Some(id.index),
            Group::Second => self.first_len.checked_add(id.index),
        }
    }

    /// The caller's location for `id`.
    #[must_use]
    pub fn location(&self, id: StopId) -> Option<&Location> {
        self.matrix_index(id).and_then(|i| self.locations.get(i))
    }

    /// All locations in matrix order.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn stop_set() -> StopSet {
        StopSet::new(
            vec![
                Location::addressed("Koramangala"),
                Location::addressed("Indiranagar"),
            ],
            vec![
                Location::addressed("Domlur"),
                Location::addressed("M G Road"),
                Location::addressed("Ulsoor"),
            ],
        )
    }

    #[rstest]
    #[case("a0", Group::First, 0)]
    #[case("b12", Group::Second, 12)]
    #[case("A3", Group::First, 3)]
    fn parses_textual_identity(#[case] raw: &str, #[case] group: Group, #[case] index: usize) {
        let id: StopId = raw.parse().expect("valid identity");
        assert_eq!(id, StopId::new(group, index));
    }

    #[rstest]
    #[case("", ParseStopIdError::Empty)]
    #[case("c1", ParseStopIdError::UnknownGroup { prefix: 'c' })]
    #[case("a", ParseStopIdError::InvalidIndex { raw: String::new() })]
    #[case("b-1", ParseStopIdError::InvalidIndex { raw: "-1".into() })]
    fn rejects_malformed_identity(#[case] raw: &str, #[case] expected: ParseStopIdError) {
        let err = raw.parse::<StopId>().expect_err("identity should be rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn identity_includes_group() {
        assert_ne!(StopId::new(Group::First, 0), StopId::new(Group::Second, 0));
    }

    #[rstest]
    fn matrix_order_lists_first_traveler_first(stop_set: StopSet) {
        assert_eq!(stop_set.len(), 5);
        assert_eq!(stop_set.matrix_index(StopId::new(Group::First, 1)), Some(1));
        assert_eq!(stop_set.matrix_index(StopId::new(Group::Second, 0)), Some(2));
        assert_eq!(stop_set.matrix_index(StopId::new(Group::Second, 2)), Some(4));
        assert_eq!(stop_set.matrix_index(StopId::new(Group::Second, 3)), None);
        assert_eq!(
            stop_set.location(StopId::new(Group::Second, 1)),
            Some(&Location::addressed("M G Road"))
        );
    }

    #[rstest]
    fn first_and_last_stops(stop_set: StopSet) {
        assert_eq!(
            stop_set.first_stop(Group::Second),
            Some(StopId::new(Group::Second, 0))
        );
        assert_eq!(
            stop_set.last_stop(Group::Second),
            Some(StopId::new(Group::Second, 2))
        );
        let lonely = StopSet::new(vec![Location::default()], Vec::new());
        assert_eq!(lonely.first_stop(Group::Second), None);
        assert_eq!(lonely.last_stop(Group::Second), None);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn identity_serialises_as_text() {
        let ids = vec![StopId::new(Group::First, 0), StopId::new(Group::Second, 4)];
        let json = serde_json::to_string(&ids).expect("serialise ids");
        assert_eq!(json, r#"["a0","b4"]"#);
        let back: Vec<StopId> = serde_json::from_str(&json).expect("deserialise ids");
        assert_eq!(back, ids);
    }
}
