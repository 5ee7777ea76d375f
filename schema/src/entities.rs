use std::cmp::Ordering;
use std::fmt;

use crate::{comparator, QueueError};

/// Broad class of an aircraft. Passenger traffic is always served before cargo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AircraftType {
    Cargo,
    Passenger,
}

impl AircraftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cargo => "Cargo",
            Self::Passenger => "Passenger",
        }
    }
}

impl<'a> TryFrom<&'a str> for AircraftType {
    type Error = QueueError;

    fn try_from(s: &'a str) -> Result<Self, Self::Error> {
        match s {
            s if s == "Passenger" => Ok(Self::Passenger),
            s if s == "Cargo" => Ok(Self::Cargo),
            other => Err(QueueError::InvalidAircraftType(other.to_string())),
        }
    }
}

impl fmt::Display for AircraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size class of an aircraft. Within the same type, large aircraft go first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AircraftSize {
    Small,
    Large,
}

impl AircraftSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Large => "Large",
        }
    }
}

impl<'a> TryFrom<&'a str> for AircraftSize {
    type Error = QueueError;

    fn try_from(s: &'a str) -> Result<Self, Self::Error> {
        match s {
            s if s == "Large" => Ok(Self::Large),
            s if s == "Small" => Ok(Self::Small),
            other => Err(QueueError::InvalidAircraftSize(other.to_string())),
        }
    }
}

impl fmt::Display for AircraftSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moment an aircraft entered the system, in __milliseconds__ on the intake clock
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeAdded(pub u64);

impl fmt::Display for TimeAdded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

/// An `Aircraft` waiting for service. Records are immutable once constructed,
/// and `time_added` is assigned exactly once at intake.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Aircraft {
    aircraft_type: AircraftType,
    size: AircraftSize,
    time_added: TimeAdded,
}

impl Aircraft {
    pub fn new(aircraft_type: AircraftType, size: AircraftSize, time_added: TimeAdded) -> Self {
        Self {
            aircraft_type,
            size,
            time_added,
        }
    }

    /// Validate textual type & size values into an `Aircraft`
    pub fn parse(aircraft_type: &str, size: &str, time_added: TimeAdded) -> Result<Self, QueueError> {
        Ok(Self::new(
            aircraft_type.try_into()?,
            size.try_into()?,
            time_added,
        ))
    }

    pub fn aircraft_type(&self) -> AircraftType {
        self.aircraft_type
    }

    pub fn size(&self) -> AircraftSize {
        self.size
    }

    pub fn time_added(&self) -> TimeAdded {
        self.time_added
    }

    /// Loads sample aircraft, one `<type>, <size>, <time_added>` record per line
    pub fn from_csv(path: &str) -> Result<Vec<Self>, QueueError> {
        let csv_bytes = std::fs::read(path)?;
        let contents =
            String::from_utf8(csv_bytes).map_err(|e| QueueError::Parse(e.to_string()))?;

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(Self::from_csv_line)
            .collect()
    }

    fn from_csv_line(line: &str) -> Result<Self, QueueError> {
        let values = line.split(", ").map(str::trim).collect::<Vec<_>>();
        let &[aircraft_type, size, time_added] = values.as_slice() else {
            return Err(QueueError::Parse(format!("malformed aircraft record: {line}")));
        };
        let time_added = time_added
            .parse::<u64>()
            .map_err(|e| QueueError::Parse(format!("{time_added}: {e}")))?;

        Self::parse(aircraft_type, size, TimeAdded(time_added))
    }
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.aircraft_type, self.size, self.time_added)
    }
}

/// `a > b` means `a` is served before `b`
impl Ord for Aircraft {
    fn cmp(&self, other: &Self) -> Ordering {
        comparator::compare(Some(self), Some(other))
    }
}

impl PartialOrd for Aircraft {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Unvalidated aircraft details as submitted by an operator form.
/// Either field may be missing.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct AircraftSpecification {
    pub aircraft_type: Option<String>,
    pub size: Option<String>,
}

impl AircraftSpecification {
    pub fn new(aircraft_type: &str, size: &str) -> Self {
        Self {
            aircraft_type: Some(aircraft_type.to_string()),
            size: Some(size.to_string()),
        }
    }

    /// Validate the specification and stamp it with its arrival time
    pub fn into_aircraft(self, time_added: TimeAdded) -> Result<Aircraft, QueueError> {
        let aircraft_type = self
            .aircraft_type
            .ok_or_else(|| QueueError::InvalidArgument("missing aircraft type".to_string()))?;
        let size = self
            .size
            .ok_or_else(|| QueueError::InvalidArgument("missing aircraft size".to_string()))?;

        Aircraft::parse(&aircraft_type, &size, time_added)
    }
}
