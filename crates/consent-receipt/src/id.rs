//! Receipt identifiers
//!
//! Provides [`ReceiptId`], the `CL-CR-#####` tag stamped on every exported
//! receipt, and [`ReceiptIdSource`], the seam that supplies its random part.

use crate::error::ConsentError;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Prefix shared by all receipt identifiers
pub const RECEIPT_ID_PREFIX: &str = "CL-CR-";

/// A five-digit receipt identifier
///
/// Displays as `CL-CR-#####`. The number is always within
/// [`ReceiptId::RANGE`], so the suffix is always exactly five digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ReceiptId(u32);

impl ReceiptId {
    /// Valid receipt numbers
    pub const RANGE: RangeInclusive<u32> = 10_000..=99_999;

    /// Create from a receipt number
    ///
    /// # Errors
    /// Returns error if `number` is outside [`ReceiptId::RANGE`]
    pub fn new(number: u32) -> Result<Self, ConsentError> {
        if Self::RANGE.contains(&number) {
            Ok(Self(number))
        } else {
            Err(ConsentError::InvalidReceiptId(number.to_string()))
        }
    }

    /// Draw the next identifier from a source
    ///
    /// Out-of-range draws are folded back into range.
    #[must_use]
    pub fn generate<S: ReceiptIdSource + ?Sized>(source: &mut S) -> Self {
        let number = source.next_receipt_number();
        if Self::RANGE.contains(&number) {
            return Self(number);
        }
        let span = Self::RANGE.end() - Self::RANGE.start() + 1;
        let folded = Self::RANGE.start() + number % span;
        tracing::warn!("Receipt number {} out of range, folded to {}", number, folded);
        Self(folded)
    }

    /// The numeric part
    #[inline]
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0
    }
}

impl Display for ReceiptId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{RECEIPT_ID_PREFIX}{:05}", self.0)
    }
}

impl FromStr for ReceiptId {
    type Err = ConsentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(RECEIPT_ID_PREFIX)
            .filter(|d| d.len() == 5 && d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| ConsentError::InvalidReceiptId(s.to_string()))?;
        let number = digits
            .parse()
            .map_err(|_| ConsentError::InvalidReceiptId(s.to_string()))?;
        Self::new(number).map_err(|_| ConsentError::InvalidReceiptId(s.to_string()))
    }
}

impl From<ReceiptId> for String {
    fn from(id: ReceiptId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ReceiptId {
    type Error = ConsentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Supplies the random number behind each receipt identifier
pub trait ReceiptIdSource {
    /// Next receipt number, expected within [`ReceiptId::RANGE`]
    fn next_receipt_number(&mut self) -> u32;
}

impl<S: ReceiptIdSource + ?Sized> ReceiptIdSource for &mut S {
    fn next_receipt_number(&mut self) -> u32 {
        (**self).next_receipt_number()
    }
}

/// Draws receipt numbers uniformly from an RNG
#[derive(Debug, Clone)]
pub struct RngIdSource<R> {
    rng: R,
}

impl<R: Rng> RngIdSource<R> {
    /// Wrap an RNG
    #[inline]
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngIdSource<ThreadRng> {
    /// Source backed by the thread-local RNG
    #[inline]
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::rng())
    }
}

impl RngIdSource<StdRng> {
    /// Reproducible source for a given seed
    #[inline]
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ReceiptIdSource for RngIdSource<R> {
    fn next_receipt_number(&mut self) -> u32 {
        self.rng.random_range(ReceiptId::RANGE)
    }
}
