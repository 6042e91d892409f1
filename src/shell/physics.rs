//! Reference ballistic formulas. Every function is total: zero or negative
//! inputs yield zero outputs instead of NaN or infinity, so infeasible shells
//! simply score zero.

/// Gauge at which `gauge_coefficient` is 1.0 (mm).
pub const REFERENCE_GAUGE: f64 = 500.0;
const GAUGE_EXPONENT: f64 = 1.8;

pub const GP_RECOIL_PER_CASING: f64 = 2500.0;
pub const DRAW_PER_MODULE: f64 = 12500.0;
const RG_CASING_DRAW_SHARE: f64 = 0.5;

const VELOCITY_CONSTANT: f64 = 85.0;
/// Seconds of flight over which a shell keeps full effectiveness.
pub const BASE_AIRTIME_S: f64 = 10.0;

const KINETIC_CONSTANT: f64 = 3.5;
const ARMOR_PIERCE_CONSTANT: f64 = 0.0175;

const RELOAD_CONSTANT: f64 = 17.5;
const RELOAD_EXPONENT: f64 = 0.45;
const CASING_RELOAD_SHARE: f64 = 0.25;
const BELT_RELOAD_FACTOR: f64 = 0.75;

pub const BELT_LOADER_VOLUME: f64 = 1.0;
const RECOIL_ABSORBED_PER_BLOCK_S: f64 = 250.0;
const DRAW_CHARGED_PER_BLOCK_S: f64 = 200.0;

#[inline(always)]
pub fn gauge_coefficient(gauge: f64) -> f64 {
    if gauge <= 0.0 {
        return 0.0;
    }
    (gauge / REFERENCE_GAUGE).powf(GAUGE_EXPONENT)
}

#[inline(always)]
pub fn gp_recoil(gauge: f64, gp_casings: f64) -> f64 {
    gauge_coefficient(gauge) * gp_casings.max(0.0) * GP_RECOIL_PER_CASING
}

/// Largest rail draw the shell can physically accept.
#[inline(always)]
pub fn max_draw(gauge: f64, effective_module_count: f64, rg_casings: f64) -> f64 {
    DRAW_PER_MODULE
        * gauge_coefficient(gauge)
        * (effective_module_count + RG_CASING_DRAW_SHARE * rg_casings).max(0.0)
}

#[inline(always)]
pub fn velocity(total_recoil: f64, gauge: f64, projectile_length: f64, velocity_mod: f64) -> f64 {
    let gc = gauge_coefficient(gauge);
    if total_recoil <= 0.0 || projectile_length <= 0.0 || gc <= 0.0 {
        return 0.0;
    }
    (total_recoil * VELOCITY_CONSTANT * gauge / (gc * projectile_length)).sqrt() * velocity_mod
}

/// Total recoil needed to reach `target_velocity`. `None` when no amount of
/// recoil can get there.
pub fn recoil_for_velocity(
    target_velocity: f64,
    gauge: f64,
    projectile_length: f64,
    velocity_mod: f64,
) -> Option<f64> {
    if target_velocity <= 0.0 {
        return Some(0.0);
    }
    let gc = gauge_coefficient(gauge);
    if velocity_mod <= 0.0 || projectile_length <= 0.0 || gc <= 0.0 {
        return None;
    }
    let base = target_velocity / velocity_mod;
    Some(base * base * gc * projectile_length / (VELOCITY_CONSTANT * gauge))
}

#[inline(always)]
pub fn effective_range(velocity: f64, airtime_mod: f64) -> f64 {
    (velocity * BASE_AIRTIME_S * airtime_mod).max(0.0)
}

/// Velocity needed for the shell to stay effective out to `range`.
pub fn velocity_for_range(range: f64, airtime_mod: f64) -> Option<f64> {
    if range <= 0.0 {
        return Some(0.0);
    }
    if airtime_mod <= 0.0 {
        return None;
    }
    Some(range / (BASE_AIRTIME_S * airtime_mod))
}

pub fn reload_time(gauge: f64, effective_module_count: f64, casings: f64) -> f64 {
    let gauge_m3 = (gauge.max(0.0) / 1000.0).powi(3) * 8.0;
    gauge_m3.powf(RELOAD_EXPONENT)
        * (2.0 + effective_module_count + CASING_RELOAD_SHARE * casings)
        * RELOAD_CONSTANT
}

pub fn belt_reload_time(gauge: f64, reload_time: f64) -> f64 {
    reload_time * BELT_RELOAD_FACTOR * (gauge.max(0.0) / 1000.0).powf(RELOAD_EXPONENT)
}

/// Volume of the loader needed to hold a shell of `total_length` mm.
pub fn loader_volume(total_length: f64) -> f64 {
    match total_length {
        l if l <= 1000.0 => 1.0,
        l if l <= 2000.0 => 2.0,
        l if l <= 4000.0 => 4.0,
        l if l <= 6000.0 => 6.0,
        _ => 8.0,
    }
}

/// Recoil absorbers and rail chargers needed to sustain one shot per reload.
pub fn support_volume(total_recoil: f64, rail_draw: f64, reload_time: f64) -> f64 {
    if reload_time <= 0.0 {
        return 0.0;
    }
    total_recoil.max(0.0) / (reload_time * RECOIL_ABSORBED_PER_BLOCK_S)
        + rail_draw.max(0.0) / (reload_time * DRAW_CHARGED_PER_BLOCK_S)
}

#[inline(always)]
pub fn kinetic_damage(
    gauge: f64,
    effective_module_count: f64,
    velocity: f64,
    kinetic_mod: f64,
) -> f64 {
    gauge_coefficient(gauge) * effective_module_count * velocity * kinetic_mod * KINETIC_CONSTANT
}

#[inline(always)]
pub fn armor_pierce(velocity: f64, armor_pierce_mod: f64) -> f64 {
    velocity * armor_pierce_mod * ARMOR_PIERCE_CONSTANT
}

/// Kinetic damage actually delivered against armor of class `target_ac`.
pub fn effective_kinetic_damage(kinetic_damage: f64, armor_pierce: f64, target_ac: f64) -> f64 {
    if target_ac <= 0.0 {
        return kinetic_damage;
    }
    kinetic_damage * (armor_pierce / target_ac).min(1.0)
}

#[inline(always)]
pub fn chem_damage(gauge: f64, chem_payload: f64) -> f64 {
    gauge_coefficient(gauge) * chem_payload
}

/// `numerator / denominator`, or zero when the denominator is not positive.
#[inline(always)]
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
