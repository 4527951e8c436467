//! HMC version normalization and ordering.
//!
//! HMC instances report their level in two shapes:
//! - IBM form: `"V11R1 1110"` (`V<major>R<minor>` plus an optional build)
//! - Dotted numeric form: `"10.2.1030.0"`
//!
//! Both normalize into a [`VersionTuple`], whose ordering treats missing
//! trailing components as zero, so `"V11R1 1110"` equals `"11.1.1110"`
//! and `"11.1"` equals `"11.1.0"`. Components are arbitrary-length digit
//! runs; they are never narrowed to a machine integer.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::errors::VersionError;

/// Last HMC level that only serves the legacy dashboard (`V10R2 1020`).
pub const LEGACY_DASHBOARD_THRESHOLD: VersionTuple = VersionTuple::from_static("10.2.1020");

/// A normalized HMC version: one or more non-negative components.
///
/// Stored in dotted form with leading zeros stripped from every component
/// (`"0042"` becomes `"42"`, `"000"` becomes `"0"`). Compared component by
/// component; a component absent on one side compares as `0`.
#[derive(Debug, Clone)]
pub struct VersionTuple(Cow<'static, str>);

impl VersionTuple {
    /// Build a tuple from an already normalized dotted string.
    ///
    /// Panics (at compile time in a `const`) when `dotted` is empty, has an
    /// empty or non-digit component, or a component with a leading zero.
    pub const fn from_static(dotted: &'static str) -> Self {
        assert!(
            is_normalized(dotted.as_bytes()),
            "a static version must be normalized dotted digits"
        );
        Self(Cow::Borrowed(dotted))
    }

    /// Build a tuple from digit-string components.
    ///
    /// Returns `None` for an empty list or a component that is empty or
    /// holds anything but ASCII digits.
    pub fn new<I, S>(components: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dotted = String::new();
        for component in components {
            let digits = component.as_ref();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            if !dotted.is_empty() {
                dotted.push('.');
            }
            match digits.trim_start_matches('0') {
                "" => dotted.push('0'),
                significant => dotted.push_str(significant),
            }
        }
        if dotted.is_empty() {
            return None;
        }
        Some(Self(Cow::Owned(dotted)))
    }

    /// The normalized components in order (major first).
    pub fn components(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.split('.')
    }

    /// Number of components as parsed (trailing zeros included).
    pub fn len(&self) -> usize {
        self.components().count()
    }

    /// Always `false`: a tuple has at least one component.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Dotted form with trailing zero components removed; equal versions
    /// share this form.
    fn significant(&self) -> &str {
        let mut dotted: &str = &self.0;
        while let Some(prefix) = dotted.strip_suffix(".0") {
            dotted = prefix;
        }
        dotted
    }
}

impl PartialEq for VersionTuple {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionTuple {}

impl PartialOrd for VersionTuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionTuple {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut left = self.components();
        let mut right = other.components();
        loop {
            let (a, b) = match (left.next(), right.next()) {
                (None, None) => return Ordering::Equal,
                (a, b) => (a.unwrap_or("0"), b.unwrap_or("0")),
            };
            match compare_components(a, b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
    }
}

impl Hash for VersionTuple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VersionTuple {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hmc_version(s)
    }
}

/// Parse an HMC version string in either IBM or dotted-numeric form.
///
/// Surrounding whitespace is ignored. Anything starting with `V` must be a
/// complete `V<digits>R<digits>` with an optional whitespace-separated
/// build number; partial matches such as `"V11 1110"` are rejected rather
/// than coerced. Everything else must be dot-separated digit runs.
pub fn parse_hmc_version(raw: &str) -> Result<VersionTuple, VersionError> {
    let invalid = || VersionError::InvalidFormat(raw.to_string());
    let trimmed = raw.trim();

    let components = match trimmed.strip_prefix('V') {
        Some(rest) => parse_ibm_form(rest),
        None => parse_dotted_form(trimmed),
    }
    .ok_or_else(invalid)?;

    VersionTuple::new(components).ok_or_else(invalid)
}

/// Compare two normalized versions.
pub fn compare_versions(a: &VersionTuple, b: &VersionTuple) -> Ordering {
    a.cmp(b)
}

/// Numeric order of two digit runs without leading zeros.
fn compare_components(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Parse the part after the leading `V` of `V<major>R<minor>[ <build>]`.
fn parse_ibm_form(rest: &str) -> Option<Vec<&str>> {
    let (major, rest) = take_digits(rest)?;
    let rest = rest.strip_prefix('R')?;
    let (minor, rest) = take_digits(rest)?;

    if rest.is_empty() {
        return Some(vec![major, minor]);
    }

    // The build must be separated from the release by whitespace.
    let build = rest.trim_start();
    if build.len() == rest.len() {
        return None;
    }
    let (build, rest) = take_digits(build)?;
    if !rest.is_empty() {
        return None;
    }
    Some(vec![major, minor, build])
}

fn parse_dotted_form(s: &str) -> Option<Vec<&str>> {
    s.split('.')
        .map(|segment| match take_digits(segment) {
            Some((digits, "")) => Some(digits),
            _ => None,
        })
        .collect()
}

/// Split a leading run of ASCII digits off `s`. `None` when there is none.
fn take_digits(s: &str) -> Option<(&str, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some(s.split_at(end))
}

const fn is_normalized(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    let mut i = 0;
    let mut at_segment_start = true;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'.' {
            if at_segment_start {
                return false;
            }
            at_segment_start = true;
        } else if b.is_ascii_digit() {
            let followed_by_digit = i + 1 < bytes.len() && bytes[i + 1] != b'.';
            if at_segment_start && b == b'0' && followed_by_digit {
                return false;
            }
            at_segment_start = false;
        } else {
            return false;
        }
        i += 1;
    }
    !at_segment_start
}
