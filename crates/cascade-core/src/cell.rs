//! Piece values stored on the board.
//!
//! - [`Family`]: opaque type/colour identifier of a piece
//! - [`Cell`]: a piece, i.e. a family plus a level
//!
//! A board slot is `Option<Cell>`; `None` is an empty slot. Cells have plain
//! value semantics: two cells are equivalent exactly when they are equal, and
//! an empty slot is never equivalent to anything (see [`equivalent`]).
//!
//! # Example
//!
//! ```
//! use cascade_core::cell::Cell;
//!
//! let cell: Cell = "A1".parse().unwrap();
//! assert_eq!(cell, Cell::new("A", 1));
//! assert_eq!(cell.to_string(), "A1");
//! assert_eq!(cell.upgraded(5), Cell::new("A", 2));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Family identifier of a piece.
///
/// Families are opaque to the engine: only equality matters. The external
/// classifier's "unrecognized" sentinel ([`Family::UNKNOWN`]) is an ordinary
/// family with no special handling.
///
/// The name is reference-counted so copying a board for a candidate swap
/// never reallocates family strings.
///
/// A name that is to survive the text board format must be non-empty, free
/// of whitespace, must not start with `#` and must not end in an ASCII digit.
/// [`Family::parse`] and deserialization enforce this.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Family(Arc<str>);

impl Family {
    /// Name the classifier uses for cells it could not recognise.
    pub const UNKNOWN: &'static str = "?";

    /// Creates a family from its name without checking it.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// Creates a family from an untrusted name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCell`] if the name could not be written back
    /// as a board token.
    pub fn parse(name: &str) -> Result<Self> {
        check_name(name).map_err(|reason| Error::InvalidCell {
            token: name.to_owned(),
            reason,
        })?;
        Ok(Self::new(name))
    }

    /// Returns the family name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Family({})", self.0)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Family {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl TryFrom<String> for Family {
    type Error = Error;

    fn try_from(name: String) -> Result<Self> {
        Self::parse(&name)
    }
}

impl From<Family> for String {
    fn from(family: Family) -> Self {
        family.0.as_ref().to_owned()
    }
}

/// A piece on the board.
///
/// Equality is family + level equality, which is exactly the match
/// equivalence used by the detector.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Type/colour of the piece
    pub family: Family,
    /// Rank within the family
    pub level: u8,
}

impl Cell {
    /// Creates a cell from a family and level.
    #[must_use]
    pub fn new(family: impl Into<Family>, level: u8) -> Self {
        Self {
            family: family.into(),
            level,
        }
    }

    /// Returns the cell this one turns into after a merge, clamped to
    /// `max_level`.
    #[must_use]
    pub fn upgraded(&self, max_level: u8) -> Self {
        Self {
            family: self.family.clone(),
            level: self.level.saturating_add(1).min(max_level),
        }
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family, self.level)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family, self.level)
    }
}

impl FromStr for Cell {
    type Err = Error;

    /// Parses the `<family><level>` form, e.g. `A1`, `Gem12`, `?0`.
    ///
    /// The level is the trailing run of ASCII digits; the family is
    /// everything before it and must be non-empty.
    fn from_str(token: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidCell {
            token: token.to_owned(),
            reason,
        };

        let family = token.trim_end_matches(|c: char| c.is_ascii_digit());
        let digits = &token[family.len()..];

        check_name(family).map_err(invalid)?;
        if digits.is_empty() {
            return Err(invalid("missing level"));
        }
        let level = digits
            .parse::<u8>()
            .map_err(|_| invalid("level out of range"))?;

        Ok(Self::new(family, level))
    }
}

fn check_name(name: &str) -> std::result::Result<(), &'static str> {
    if name.is_empty() {
        Err("missing family")
    } else if name.chars().any(char::is_whitespace) {
        Err("family contains whitespace")
    } else if name.starts_with('#') {
        Err("family starts with '#'")
    } else if name.ends_with(|c: char| c.is_ascii_digit()) {
        Err("family ends in a digit")
    } else {
        Ok(())
    }
}

/// Returns true when both slots hold pieces of the same family and level.
///
/// Empty slots are never equivalent, not even to each other.
#[must_use]
pub fn equivalent(a: Option<&Cell>, b: Option<&Cell>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// Parses one slot of the text board format.
///
/// `.` and `-` are empty slots; anything else must parse as a [`Cell`].
///
/// # Errors
///
/// Returns [`Error::InvalidCell`] when the token is not a valid cell.
pub fn parse_slot(token: &str) -> Result<Option<Cell>> {
    match token {
        "." | "-" => Ok(None),
        _ => token.parse().map(Some),
    }
}
