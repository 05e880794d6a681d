use serde::{Deserialize, Serialize};

/// Raw slider value meaning "mark this day as the best of its year".
pub const BEST_DAY_SENTINEL: i64 = 15;
/// Raw slider value meaning "mark this day as the worst of its year".
pub const WORST_DAY_SENTINEL: i64 = -15;

/// How a day felt, on a closed seven-step scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Rating {
    Terrible = 0,
    Bad = 1,
    Meh = 2,
    Alright = 3,
    Good = 4,
    Great = 5,
    Awesome = 6,
}

impl Rating {
    pub const ALL: [Rating; 7] = [
        Rating::Terrible,
        Rating::Bad,
        Rating::Meh,
        Rating::Alright,
        Rating::Good,
        Rating::Great,
        Rating::Awesome,
    ];

    /// Value the rating sheet starts at for an unrated day.
    pub const DEFAULT: Rating = Rating::Alright;

    pub fn from_value(value: i64) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Terrible => "Terrible",
            Rating::Bad => "Bad",
            Rating::Meh => "Meh",
            Rating::Alright => "Alright",
            Rating::Good => "Good",
            Rating::Great => "Great",
            Rating::Awesome => "Awesome",
        }
    }

    /// Calendar cell colour, darkest purple for Terrible through green.
    pub fn color_hex(self) -> &'static str {
        match self {
            Rating::Terrible => "#4F2E73",
            Rating::Bad => "#455CB3",
            Rating::Meh => "#739BDB",
            Rating::Alright => "#BDB8DB",
            Rating::Good => "#B8E8BD",
            Rating::Great => "#99D68F",
            Rating::Awesome => "#61BF66",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::from_value(i64::from(value)).ok_or_else(|| format!("rating out of range: {value}"))
    }
}

/// A day pinned as the best or the worst of its year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pin {
    Best,
    Worst,
}

impl Pin {
    /// Rating a pinned day carries, and the rating a displaced holder keeps.
    pub fn boundary(self) -> Rating {
        match self {
            Pin::Best => Rating::Awesome,
            Pin::Worst => Rating::Terrible,
        }
    }

    /// Prefix of the year-scoped store key (`bestDay2025`).
    pub fn key_prefix(self) -> &'static str {
        match self {
            Pin::Best => "bestDay",
            Pin::Worst => "worstDay",
        }
    }

    pub fn other(self) -> Pin {
        match self {
            Pin::Best => Pin::Worst,
            Pin::Worst => Pin::Best,
        }
    }
}

/// One rating action from the UI: a rating and, optionally, a pin.
///
/// Pinning always carries the pin's boundary rating, so the two fields can
/// never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingCommand {
    rating: Rating,
    pin: Option<Pin>,
}

impl RatingCommand {
    pub fn rate(rating: Rating) -> Self {
        Self { rating, pin: None }
    }

    pub fn mark(pin: Pin) -> Self {
        Self {
            rating: pin.boundary(),
            pin: Some(pin),
        }
    }

    /// Translate a raw slider value: 0..=6, or the ±15 pin sentinels.
    pub fn from_raw(value: i64) -> Option<Self> {
        match value {
            BEST_DAY_SENTINEL => Some(Self::mark(Pin::Best)),
            WORST_DAY_SENTINEL => Some(Self::mark(Pin::Worst)),
            other => Rating::from_value(other).map(Self::rate),
        }
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn pin(&self) -> Option<Pin> {
        self.pin
    }
}
