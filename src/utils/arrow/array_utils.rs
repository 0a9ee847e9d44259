//! Utilities for working with Arrow arrays.
//!
//! Typed access to loaded columns with clear error messages.

use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::compute::kernels::cast::cast;
use arrow::datatypes::DataType;

use crate::error::{ReportError, Result};

/// Whether a column should be summarised numerically
///
/// A column with no values at all is inferred as `Null` and counts as an
/// all-missing numeric column.
#[must_use]
pub fn is_numeric(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Null
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
    )
}

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `T` - The concrete Arrow array type expected for the column
pub fn downcast_array<'a, T: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    type_name: &str,
) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ReportError::UnsupportedType {
            column: column_name.to_string(),
            data_type: format!("{} (expected {type_name})", array.data_type()),
        })
}

/// Cast a numeric column to `Float64`
///
/// Non-numeric columns are rejected rather than parsed, so a mistyped
/// column surfaces as an error instead of a silent column of nulls.
pub fn to_float64(array: &ArrayRef, column_name: &str) -> Result<Float64Array> {
    if !is_numeric(array.data_type()) {
        return Err(ReportError::UnsupportedType {
            column: column_name.to_string(),
            data_type: array.data_type().to_string(),
        });
    }

    let converted = cast(array, &DataType::Float64)?;
    downcast_array::<Float64Array>(&converted, column_name, "Float64").cloned()
}

/// Non-null values of a numeric column, in row order
pub fn numeric_values(array: &ArrayRef, column_name: &str) -> Result<Vec<f64>> {
    let floats = to_float64(array, column_name)?;
    Ok(floats.iter().flatten().collect())
}
