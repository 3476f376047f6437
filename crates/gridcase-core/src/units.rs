//! Unit newtypes for power system quantities.
//!
//! Raw `f64` values make it easy to hand a reactance to a function that
//! expects a susceptance, or to forget whether a limit is MW or MVA. These
//! wrappers catch that at compile time; `#[repr(transparent)]` keeps them
//! layout-identical to `f64`.
//!
//! The per-unit conversions live here too. Note the asymmetry: series
//! impedance divides by the base impedance, shunt admittance multiplies by
//! it. That is the physics of the normalization, not a transcription error.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

/// Active power in megawatts (MW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl_unit_ops!(Megawatts, "MW");

/// Reactive power in megavolt-amperes reactive (Mvar)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Megavars(pub f64);

impl_unit_ops!(Megavars, "Mvar");

/// Apparent power in megavolt-amperes (MVA)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MegavoltAmperes(pub f64);

impl_unit_ops!(MegavoltAmperes, "MVA");

/// Voltage in kilovolts (kV)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilovolts(pub f64);

impl_unit_ops!(Kilovolts, "kV");

/// Dimensionless per-unit quantity (availability factors, normalized
/// impedances, voltage magnitudes)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct PerUnit(pub f64);

impl_unit_ops!(PerUnit, "pu");

impl PerUnit {
    /// One per-unit (nominal)
    pub const ONE: Self = Self(1.0);

    /// Zero per-unit
    pub const ZERO: Self = Self(0.0);
}

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(pub f64);

impl_unit_ops!(Degrees, "deg");

/// Series impedance in ohms (physical units, pre-normalization)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Ohms(pub f64);

impl_unit_ops!(Ohms, "ohm");

/// Shunt admittance in siemens (physical units, pre-normalization)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Siemens(pub f64);

impl_unit_ops!(Siemens, "S");

impl Kilovolts {
    /// Base impedance for per-unit normalization: `Z_base = V_base² / S_base`
    #[inline]
    pub fn base_impedance(self, base_mva: MegavoltAmperes) -> Ohms {
        Ohms(self.0 * self.0 / base_mva.0)
    }
}

impl Ohms {
    /// Normalize a series impedance: `z_pu = z / Z_base`
    #[inline]
    pub fn to_per_unit(self, z_base: Ohms) -> PerUnit {
        PerUnit(self.0 / z_base.0)
    }
}

impl Siemens {
    /// Normalize a shunt admittance: `y_pu = y * Z_base` (admittance scales
    /// inversely to impedance)
    #[inline]
    pub fn to_per_unit(self, z_base: Ohms) -> PerUnit {
        PerUnit(self.0 * z_base.0)
    }
}

impl Megawatts {
    /// Scale nominal capacity by a per-unit availability factor
    #[inline]
    pub fn scaled(self, factor: PerUnit) -> Megawatts {
        Megawatts(self.0 * factor.0)
    }
}
