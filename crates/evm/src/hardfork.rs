//! Execution-layer hardforks and EIP activation.

use strum::{Display, EnumIter};

/// Execution-layer hardforks, in activation order.
///
/// Ordering is meaningful: a later fork includes every earlier fork's
/// changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecId {
    /// The launch rule set.
    Frontier,
    /// Homestead.
    Homestead,
    /// Tangerine Whistle (EIP-150 gas repricing).
    TangerineWhistle,
    /// Spurious Dragon (EIP-155/160/161).
    SpuriousDragon,
    /// Byzantium.
    Byzantium,
    /// Constantinople / Petersburg.
    Constantinople,
    /// Istanbul.
    Istanbul,
    /// Berlin (EIP-2929/2930).
    Berlin,
    /// London (EIP-1559/3529); the default gas schedule here.
    #[default]
    London,
    /// The Merge (Paris).
    Paris,
    /// Shanghai (EIP-3855 PUSH0, EIP-4895 withdrawals).
    Shanghai,
    /// Cancun (EIP-1153/4844/5656).
    Cancun,
    /// Prague (EIP-7702).
    Prague,
}

impl SpecId {
    /// True if this fork is `fork` or later.
    pub const fn is_enabled_in(&self, fork: Self) -> bool {
        *self as u8 >= fork as u8
    }

    /// The fork that activated `eip`, if it is one this crate models.
    pub const fn activation_of(eip: u32) -> Option<Self> {
        Some(match eip {
            150 => Self::TangerineWhistle,
            155 | 160 | 161 => Self::SpuriousDragon,
            658 => Self::Byzantium,
            145 | 1014 | 1052 => Self::Constantinople,
            152 | 1344 | 1884 | 2028 | 2200 => Self::Istanbul,
            2565 | 2718 | 2929 | 2930 => Self::Berlin,
            1559 | 3198 | 3529 | 3541 => Self::London,
            3651 | 3855 | 3860 | 4895 => Self::Shanghai,
            1153 | 4788 | 4844 | 5656 | 6780 | 7516 => Self::Cancun,
            2537 | 2935 | 6110 | 7002 | 7251 | 7623 | 7685 | 7702 => Self::Prague,
            _ => return None,
        })
    }

    /// True if `eip` is active in this fork. Unknown EIPs report
    /// inactive.
    pub const fn has_eip(&self, eip: u32) -> bool {
        match Self::activation_of(eip) {
            Some(fork) => self.is_enabled_in(fork),
            None => false,
        }
    }
}
