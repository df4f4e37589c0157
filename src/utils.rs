#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::model::lstm::{LstmStepModel, LstmWeights};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1, PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy a 1-D array-like into an owned `Vec<f64>`, naming the argument in
/// the error message on failure.
#[cfg(feature = "python-bindings")]
pub fn extract_vector<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!(
            "{name} must be a 1-D contiguous float64 array or sequence"
        ))
    })?;
    Ok(slice.to_vec())
}

/// Copy a 2-D float64 array into an owned `Array2<f64>`, naming the argument
/// in the error message on failure. Unlike the 1-D path there is no sequence
/// fallback; weight matrices are expected to arrive as numpy arrays.
#[cfg(feature = "python-bindings")]
pub fn extract_matrix<'py>(raw_data: &Bound<'py, PyAny>, name: &str) -> PyResult<Array2<f64>> {
    let arr: PyReadonlyArray2<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(format!(
            "{name} must be a 2-D numpy.ndarray of float64"
        ))
    })?;
    Ok(arr.as_array().to_owned())
}

/// Assemble a validated [`LstmStepModel`] from the eight Python-side weight
/// arrays, in the stacked-gate layout documented on
/// [`crate::model::lstm::LstmWeights`].
#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
pub fn build_lstm_model<'py>(
    py: Python<'py>, weight_ih: &Bound<'py, PyAny>, weight_hh: &Bound<'py, PyAny>,
    bias_ih: &Bound<'py, PyAny>, bias_hh: &Bound<'py, PyAny>, weight_ff: &Bound<'py, PyAny>,
    bias_ff: &Bound<'py, PyAny>, weight_out: &Bound<'py, PyAny>, bias_out: &Bound<'py, PyAny>,
) -> PyResult<LstmStepModel> {
    let weights = LstmWeights {
        weight_ih: extract_matrix(weight_ih, "weight_ih")?,
        weight_hh: extract_matrix(weight_hh, "weight_hh")?,
        bias_ih: Array1::from(extract_vector(py, bias_ih, "bias_ih")?),
        bias_hh: Array1::from(extract_vector(py, bias_hh, "bias_hh")?),
        weight_ff: extract_matrix(weight_ff, "weight_ff")?,
        bias_ff: Array1::from(extract_vector(py, bias_ff, "bias_ff")?),
        weight_out: extract_matrix(weight_out, "weight_out")?,
        bias_out: Array1::from(extract_vector(py, bias_out, "bias_out")?),
    };
    let model = LstmStepModel::new(weights)?;
    Ok(model)
}
