//! Arrow value conversions
//!
//! Extract individual cells from Arrow arrays as the loosely typed values the
//! grouping, persistence and spreadsheet code work with.

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int8Array, Int16Array, Int32Array,
    Int64Array, LargeStringArray, StringArray, UInt8Array, UInt16Array, UInt32Array, UInt64Array,
};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;

/// A single cell taken out of an Arrow column
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Text(String),
}

/// Read the cell at `index`, handling nulls and the common CSV-inferred types
#[must_use]
pub fn cell_value(array: &ArrayRef, index: usize) -> CellValue {
    // Null-typed arrays carry no validity buffer, so `is_null` is always false
    if array.data_type() == &DataType::Null || array.is_null(index) {
        return CellValue::Null;
    }

    macro_rules! int_cell {
        ($ty:ty) => {
            array
                .as_any()
                .downcast_ref::<$ty>()
                .map(|a| CellValue::Integer(i64::from(a.value(index))))
        };
    }

    let value = match array.data_type() {
        DataType::Int8 => int_cell!(Int8Array),
        DataType::Int16 => int_cell!(Int16Array),
        DataType::Int32 => int_cell!(Int32Array),
        DataType::Int64 => int_cell!(Int64Array),
        DataType::UInt8 => int_cell!(UInt8Array),
        DataType::UInt16 => int_cell!(UInt16Array),
        DataType::UInt32 => int_cell!(UInt32Array),
        DataType::UInt64 => array
            .as_any()
            .downcast_ref::<UInt64Array>()
            .map(|a| match i64::try_from(a.value(index)) {
                Ok(v) => CellValue::Integer(v),
                Err(_) => CellValue::Real(a.value(index) as f64),
            }),
        DataType::Float32 => array
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Real(f64::from(a.value(index)))),
        DataType::Float64 => array
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Real(a.value(index))),
        DataType::Boolean => array
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Boolean(a.value(index))),
        DataType::Utf8 => array
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| CellValue::Text(a.value(index).to_string())),
        DataType::LargeUtf8 => array
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|a| CellValue::Text(a.value(index).to_string())),
        _ => None,
    };

    // Anything else (dates, timestamps) is carried as its display form
    value.unwrap_or_else(|| match array_value_to_string(array, index) {
        Ok(text) => CellValue::Text(text),
        Err(_) => CellValue::Null,
    })
}

/// Display form of the cell at `index`, `None` for nulls
///
/// Used as the grouping key for value counts and pivots.
#[must_use]
pub fn cell_label(array: &ArrayRef, index: usize) -> Option<String> {
    match cell_value(array, index) {
        CellValue::Null => None,
        CellValue::Integer(v) => Some(v.to_string()),
        CellValue::Real(v) => Some(v.to_string()),
        CellValue::Boolean(v) => Some(if v { "True" } else { "False" }.to_string()),
        CellValue::Text(v) => Some(v),
    }
}
