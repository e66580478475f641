use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid score: {0:?}")]
pub struct ScoreParseError(pub String);

/// Points awarded for one correctly answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Award {
    /// Answered without help: 1.0 point.
    Full,
    /// Answered after the 50/50 help: 0.5 points.
    Half,
}

impl Award {
    #[must_use]
    pub fn halves(self) -> u32 {
        match self {
            Award::Full => 2,
            Award::Half => 1,
        }
    }
}

/// A non-negative score in steps of 0.5, stored as a count of half points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Score(u32);

impl Score {
    pub const ZERO: Score = Score(0);

    #[must_use]
    pub fn from_halves(halves: u32) -> Self {
        Self(halves)
    }

    #[must_use]
    pub fn from_points(points: u32) -> Self {
        Self(points.saturating_mul(2))
    }

    #[must_use]
    pub fn halves(self) -> u32 {
        self.0
    }
}

impl Add<Award> for Score {
    type Output = Score;

    fn add(self, award: Award) -> Score {
        Score(self.0.saturating_add(award.halves()))
    }
}

/// Always one fractional digit: `0.0`, `1.5`, `12.0`.
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{}.{}", self.0 / 2, if self.0 % 2 == 0 { 0 } else { 5 });
        f.pad(&text)
    }
}

impl FromStr for Score {
    type Err = ScoreParseError;

    /// Accepts an integer or a decimal whose fraction is .0 or .5 (trailing zeros allowed).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ScoreParseError(s.to_owned());
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let whole: u32 = whole.parse().map_err(|_| err())?;
        let digits = frac.trim_end_matches('0');
        let half = match digits {
            "" => 0,
            "5" => 1,
            _ => return Err(err()),
        };
        whole
            .checked_mul(2)
            .and_then(|h| h.checked_add(half))
            .map(Self)
            .ok_or_else(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_one_decimal() {
        assert_eq!(Score::ZERO.to_string(), "0.0");
        assert_eq!(Score::from_halves(3).to_string(), "1.5");
        assert_eq!(Score::from_points(12).to_string(), "12.0");
        assert_eq!(format!("{:<6}|", Score::from_halves(1)), "0.5   |");
    }

    #[test]
    fn awards_accumulate() {
        let score = Score::ZERO + Award::Full + Award::Half;
        assert_eq!(score.halves(), 3);
        assert_eq!(score.to_string(), "1.5");
        assert_eq!(Score::from_halves(u32::MAX) + Award::Full, Score::from_halves(u32::MAX));
    }

    #[test]
    fn parses_persisted_values() {
        assert_eq!("1.5".parse::<Score>(), Ok(Score::from_halves(3)));
        assert_eq!("2.0".parse::<Score>(), Ok(Score::from_points(2)));
        assert_eq!("7".parse::<Score>(), Ok(Score::from_points(7)));
        assert_eq!("0.50".parse::<Score>(), Ok(Score::from_halves(1)));
        assert!("1.3".parse::<Score>().is_err());
        assert!("-1.0".parse::<Score>().is_err());
        assert!("abc".parse::<Score>().is_err());
        assert!(".5".parse::<Score>().is_err());
    }
}
