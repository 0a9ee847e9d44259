//! Arrow helpers shared by the pipeline stages.

pub mod array_utils;
pub mod conversion;

pub use array_utils::{downcast_array, is_numeric, numeric_values, to_float64};
pub use conversion::{CellValue, cell_label, cell_value};
