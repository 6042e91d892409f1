use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DamageType {
    #[default]
    Kinetic,
    Chemical,
}

/// Derived figures of a shell. A field is only meaningful once the step that
/// produces it has run (see `Shell`).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ShellStats {
    // Geometry (mm)
    pub head_length: f64,
    pub body_length: f64,
    pub base_length: f64,
    pub casing_length: f64,
    pub projectile_length: f64,
    pub total_length: f64,
    pub effective_module_count: f64,

    // Modifiers
    pub velocity_mod: f64,
    pub kinetic_mod: f64,
    pub armor_pierce_mod: f64,
    pub airtime_mod: f64,
    pub chem_payload: f64,

    // Propulsion
    pub gp_recoil: f64,
    pub total_recoil: f64,
    pub max_draw: f64,

    // Loading
    pub reload_time: f64,
    pub reload_time_belt: f64,
    pub volume: f64,
    pub volume_belt: f64,

    // Flight
    pub velocity: f64,
    pub effective_range: f64,

    // Kinetic
    pub armor_pierce: f64,
    pub kinetic_damage: f64,
    pub effective_kinetic_damage: f64,
    pub kinetic_dps: f64,
    pub kinetic_dps_per_volume: f64,
    pub kinetic_dps_belt: f64,
    pub kinetic_dps_per_volume_belt: f64,

    // Chemical
    pub chem_damage: f64,
    pub chem_dps: f64,
    pub chem_dps_per_volume: f64,
    pub chem_dps_belt: f64,
    pub chem_dps_per_volume_belt: f64,
}

impl ShellStats {
    /// The quantity the search maximizes.
    #[inline(always)]
    pub fn score(&self, damage_type: DamageType) -> f64 {
        match damage_type {
            DamageType::Kinetic => self.kinetic_dps_per_volume,
            DamageType::Chemical => self.chem_dps_per_volume,
        }
    }

    #[inline(always)]
    pub fn belt_score(&self, damage_type: DamageType) -> f64 {
        match damage_type {
            DamageType::Kinetic => self.kinetic_dps_per_volume_belt,
            DamageType::Chemical => self.chem_dps_per_volume_belt,
        }
    }

    pub fn dps(&self, damage_type: DamageType) -> f64 {
        match damage_type {
            DamageType::Kinetic => self.kinetic_dps,
            DamageType::Chemical => self.chem_dps,
        }
    }
}

/// Set of computation steps that have run since the last invalidation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Computed(u16);

impl Computed {
    pub const NONE: Self = Self(0);
    pub const LENGTHS: Self = Self(1 << 0);
    pub const MODIFIERS: Self = Self(1 << 1);
    pub const RECOIL: Self = Self(1 << 2);
    pub const MAX_DRAW: Self = Self(1 << 3);
    pub const RELOAD: Self = Self(1 << 4);
    pub const VOLUME: Self = Self(1 << 5);
    pub const VELOCITY: Self = Self(1 << 6);
    pub const RANGE: Self = Self(1 << 7);
    pub const ARMOR_PIERCE: Self = Self(1 << 8);
    pub const KINETIC_DAMAGE: Self = Self(1 << 9);
    pub const KINETIC_DPS: Self = Self(1 << 10);
    pub const CHEM_DAMAGE: Self = Self(1 << 11);
    pub const CHEM_DPS: Self = Self(1 << 12);

    /// Everything that must be recomputed after the rail draw changes.
    pub const DRAW_DEPENDENT: Self = Self(
        Self::VOLUME.0
            | Self::VELOCITY.0
            | Self::RANGE.0
            | Self::ARMOR_PIERCE.0
            | Self::KINETIC_DAMAGE.0
            | Self::KINETIC_DPS.0
            | Self::CHEM_DAMAGE.0
            | Self::CHEM_DPS.0,
    );

    #[inline(always)]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline(always)]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline(always)]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    #[inline(always)]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}
