//! Start and stop conditions as named bit flags.
//!
//! Each condition is an enum variant carrying its own bit.  A [`ConditionSet`]
//! holds one bit per condition of a given kind, so "enabled" (the mask) and
//! "currently true" (the state) are the same type and combine with a plain
//! intersection.

use core::fmt;
use core::marker::PhantomData;

/// Behaviour shared by [`StartCondition`] and [`StopCondition`].
pub trait Condition: Copy + fmt::Debug + 'static {
    /// Every variant, in evaluation order.
    const ALL: &'static [Self];

    /// Bit for this condition within a [`ConditionSet`].
    fn mask(self) -> u8;
}

// ---------------------------------------------------------------------------
// Condition kinds
// ---------------------------------------------------------------------------

/// Conditions that permit the pump to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StartCondition {
    /// Depth is within the target band.
    Depth = 0b0000_0001,
    /// Temperature is within the target band.
    Temperature = 0b0000_0010,
    /// The configured wait after dive start has elapsed.
    DiveWait = 0b0000_0100,
}

impl Condition for StartCondition {
    const ALL: &'static [Self] = &[Self::Depth, Self::Temperature, Self::DiveWait];

    fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for StartCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Depth => write!(f, "depth in band"),
            Self::Temperature => write!(f, "temperature in band"),
            Self::DiveWait => write!(f, "dive wait elapsed"),
        }
    }
}

/// Conditions that force the pump off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StopCondition {
    /// Target volume pumped.
    Volume = 0b0000_0001,
    /// Maximum pump duration reached.
    Duration = 0b0000_0010,
    /// Flow rate has decayed to the configured minimum.
    Flowrate = 0b0000_0100,
}

impl Condition for StopCondition {
    const ALL: &'static [Self] = &[Self::Volume, Self::Duration, Self::Flowrate];

    fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for StopCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Volume => write!(f, "target volume reached"),
            Self::Duration => write!(f, "max pump duration reached"),
            Self::Flowrate => write!(f, "flow rate decayed"),
        }
    }
}

// ---------------------------------------------------------------------------
// ConditionSet
// ---------------------------------------------------------------------------

/// A set of conditions of one kind.
pub struct ConditionSet<C> {
    bits: u8,
    _kind: PhantomData<C>,
}

impl<C: Condition> ConditionSet<C> {
    pub const fn empty() -> Self {
        Self {
            bits: 0,
            _kind: PhantomData,
        }
    }

    /// Set or clear `cond`.
    pub fn set(&mut self, cond: C, on: bool) {
        if on {
            self.bits |= cond.mask();
        } else {
            self.bits &= !cond.mask();
        }
    }

    pub fn contains(&self, cond: C) -> bool {
        self.bits & cond.mask() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Conditions present in both sets.
    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            bits: self.bits & other.bits,
            _kind: PhantomData,
        }
    }

    /// Members in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = C> + '_ {
        C::ALL.iter().copied().filter(|c| self.contains(*c))
    }

    /// First member in evaluation order.
    pub fn first(&self) -> Option<C> {
        self.iter().next()
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }
}

impl<C: Condition> FromIterator<C> for ConditionSet<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut set = Self::empty();
        for c in iter {
            set.set(c, true);
        }
        set
    }
}

impl<C> Clone for ConditionSet<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ConditionSet<C> {}

impl<C> PartialEq for ConditionSet<C> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<C> Eq for ConditionSet<C> {}

impl<C: Condition> Default for ConditionSet<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C: Condition> fmt::Debug for ConditionSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// ---------------------------------------------------------------------------
// Mask / state pairs
// ---------------------------------------------------------------------------

/// One start set and one stop set.
///
/// Used both as the mask (which conditions take part, fixed per
/// deployment) and as the state (which conditions hold this tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConditionFlags {
    pub start: ConditionSet<StartCondition>,
    pub stop: ConditionSet<StopCondition>,
}

/// Conditions enabled by validation.
pub type ConditionMask = ConditionFlags;

/// Conditions that held on the latest evaluation.
pub type ConditionState = ConditionFlags;

impl ConditionFlags {
    /// Conditions that are both enabled in `mask` and true in `self`.
    pub fn active(&self, mask: &ConditionMask) -> Self {
        Self {
            start: self.start.intersection(&mask.start),
            stop: self.stop.intersection(&mask.stop),
        }
    }
}
