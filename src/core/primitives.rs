use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

/// Capability of yielding one underlying `f64` scalar.
///
/// Numeric-library wrappers plug into the normalizer by implementing this
/// trait at the boundary; the normalizer itself only ever sees `f64`.
pub trait ScalarExtractable {
    fn extract_scalar(&self) -> ChartResult<f64>;
}

macro_rules! lossless_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ScalarExtractable for $ty {
                fn extract_scalar(&self) -> ChartResult<f64> {
                    Ok(f64::from(*self))
                }
            }
        )*
    };
}

macro_rules! widening_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ScalarExtractable for $ty {
                #[allow(clippy::cast_precision_loss)]
                fn extract_scalar(&self) -> ChartResult<f64> {
                    Ok(*self as f64)
                }
            }
        )*
    };
}

lossless_scalar!(f64, f32, i8, i16, i32, u8, u16, u32);
widening_scalar!(i64, u64, isize, usize, i128, u128);

impl ScalarExtractable for bool {
    fn extract_scalar(&self) -> ChartResult<f64> {
        Ok(if *self { 1.0 } else { 0.0 })
    }
}

impl<T: ScalarExtractable + ?Sized> ScalarExtractable for &T {
    fn extract_scalar(&self) -> ChartResult<f64> {
        (**self).extract_scalar()
    }
}

impl ScalarExtractable for OrderedFloat<f64> {
    fn extract_scalar(&self) -> ChartResult<f64> {
        Ok(self.into_inner())
    }
}

impl ScalarExtractable for OrderedFloat<f32> {
    fn extract_scalar(&self) -> ChartResult<f64> {
        Ok(f64::from(self.into_inner()))
    }
}

impl ScalarExtractable for Decimal {
    fn extract_scalar(&self) -> ChartResult<f64> {
        decimal_to_f64(*self, "decimal value")
    }
}

impl ScalarExtractable for DateTime<Utc> {
    fn extract_scalar(&self) -> ChartResult<f64> {
        Ok(datetime_to_unix_seconds(*self))
    }
}

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::validation(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Extracts a scalar and rejects values the JSON payload cannot carry.
pub fn finite_scalar<T: ScalarExtractable + ?Sized>(value: &T, field_name: &str) -> ChartResult<f64> {
    let scalar = value.extract_scalar()?;
    if !scalar.is_finite() {
        return Err(ChartError::validation(format!(
            "{field_name} must be finite, got {scalar}"
        )));
    }
    Ok(scalar)
}

/// Converts a whole array, naming the array and index on failure.
pub fn finite_scalars<T: ScalarExtractable>(values: &[T], array_name: &str) -> ChartResult<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| finite_scalar(value, &format!("{array_name}[{index}]")))
        .collect()
}

pub(crate) fn ensure_same_length(
    first_name: &str,
    first_len: usize,
    second_name: &str,
    second_len: usize,
) -> ChartResult<()> {
    if first_len != second_len {
        return Err(ChartError::validation(format!(
            "`{first_name}` and `{second_name}` must have the same length ({first_len} != {second_len})"
        )));
    }
    Ok(())
}
