// hist/value.rs

use std::ops::{AddAssign, Mul};

use serde::{de::DeserializeOwned, Serialize};

use crate::export::ExportKind;

/// Scalar types a [`crate::BinnedAccumulator`] can accumulate.
///
/// The foreign storage kind is a compile-time constant of the scalar type,
/// so export dispatch needs no runtime type inspection. Scalars without a
/// foreign counterpart carry `EXPORT_KIND = None` and fail export with
/// [`crate::HistError::UnsupportedExportType`].
pub trait BinValue:
    Copy
    + Default
    + PartialEq
    + PartialOrd
    + std::fmt::Debug
    + AddAssign
    + Mul<Output = Self>
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Foreign storage kind for this scalar, if one exists.
    const EXPORT_KIND: Option<ExportKind>;

    /// Scalar name used in diagnostics.
    const TYPE_NAME: &'static str;

    fn to_f64(self) -> f64;

    fn from_f64(v: f64) -> Self;

    /// Whether the value is a usable finite number. Integers always are.
    fn is_finite_value(self) -> bool {
        true
    }

    /// Square root computed through f64 and mapped back into the scalar.
    fn sqrt_value(self) -> Self {
        Self::from_f64(self.to_f64().sqrt())
    }

    /// Element-wise conversion from another scalar type.
    fn convert_from<U: BinValue>(v: U) -> Self {
        Self::from_f64(v.to_f64())
    }
}

macro_rules! impl_bin_value_float {
    ($t:ty, $kind:expr, $name:literal) => {
        impl BinValue for $t {
            const EXPORT_KIND: Option<ExportKind> = $kind;
            const TYPE_NAME: &'static str = $name;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(v: f64) -> Self {
                v as $t
            }

            fn is_finite_value(self) -> bool {
                self.is_finite()
            }
        }
    };
}

macro_rules! impl_bin_value_int {
    ($t:ty, $kind:expr, $name:literal) => {
        impl BinValue for $t {
            const EXPORT_KIND: Option<ExportKind> = $kind;
            const TYPE_NAME: &'static str = $name;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(v: f64) -> Self {
                v as $t
            }
        }
    };
}

impl_bin_value_float!(f32, Some(ExportKind::F32), "f32");
impl_bin_value_float!(f64, Some(ExportKind::F64), "f64");
impl_bin_value_int!(i32, Some(ExportKind::I32), "i32");
impl_bin_value_int!(i64, None, "i64");
impl_bin_value_int!(u32, None, "u32");
impl_bin_value_int!(u64, None, "u64");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_kinds() {
        assert_eq!(f32::EXPORT_KIND, Some(ExportKind::F32));
        assert_eq!(f64::EXPORT_KIND, Some(ExportKind::F64));
        assert_eq!(i32::EXPORT_KIND, Some(ExportKind::I32));
        assert_eq!(i64::EXPORT_KIND, None);
        assert_eq!(u64::EXPORT_KIND, None);
    }

    #[test]
    fn test_finiteness() {
        assert!(1.0f64.is_finite_value());
        assert!(!f64::NAN.is_finite_value());
        assert!(!f32::INFINITY.is_finite_value());
        assert!(42i32.is_finite_value());
    }

    #[test]
    fn test_sqrt_and_conversion() {
        assert_eq!(4.0f64.sqrt_value(), 2.0);
        assert_eq!(9i32.sqrt_value(), 3);
        assert_eq!(f32::convert_from(2.5f64), 2.5f32);
        assert_eq!(i32::convert_from(2.9f64), 2); // truncating, like `as`
    }
}
