//! Health capability: hit points and attack vetoes.

use std::fmt;

use super::attack::AttackKind;

/// Hit-point bookkeeping for a mortal unit.
///
/// The two provided methods are hooks for defensive unit types: a unit can
/// refuse to be targeted by a kind of attack, or change the effective range
/// of attacks aimed at it. The defaults do neither.
pub trait HealthStrategy: fmt::Debug + Send + Sync {
    /// Returns true while hit points are above zero.
    fn is_alive(&self) -> bool;

    /// Current hit points, floored at zero.
    fn hit_points(&self) -> u32;

    /// Subtract `amount` from hit points, clamping at zero.
    ///
    /// Non-positive amounts are ignored.
    fn apply_damage(&mut self, amount: i64);

    /// Add `amount` to hit points. There is no upper cap.
    fn heal(&mut self, amount: u32);

    /// Returns false to veto an attack of this kind.
    fn can_be_attacked_by(&self, _kind: AttackKind) -> bool {
        true
    }

    /// The effective range of an attack of this kind against this unit.
    fn modified_range(&self, range: u32, _kind: AttackKind) -> u32 {
        range
    }
}

/// Plain hit-point counter with no vetoes.
///
/// # Example
///
/// ```
/// use skirmish_core::capability::{BasicHealth, HealthStrategy};
///
/// let mut health = BasicHealth::new(10);
/// health.apply_damage(12);
/// assert!(!health.is_alive());
/// assert_eq!(health.hit_points(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicHealth {
    hp: u32,
}

impl BasicHealth {
    /// Create a counter starting at `hp`.
    #[must_use]
    pub const fn new(hp: u32) -> Self {
        Self { hp }
    }
}

impl HealthStrategy for BasicHealth {
    fn is_alive(&self) -> bool {
        self.hp > 0
    }

    fn hit_points(&self) -> u32 {
        self.hp
    }

    fn apply_damage(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        let amount = u32::try_from(amount).unwrap_or(u32::MAX);
        self.hp = self.hp.saturating_sub(amount);
    }

    fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount);
    }
}
