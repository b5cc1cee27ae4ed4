//! Stride computation utilities.
//!
//! Buffers are row-major over the canonical axis order (sorted kets, then
//! sorted bras), so the last axis varies fastest.

/// Compute row-major strides from shape.
///
/// For shape [d0, d1, d2], returns strides [d1*d2, d2, 1].
///
/// # Examples
///
/// ```
/// use hilbert_tensor::strides::compute_strides;
///
/// assert_eq!(compute_strides(&[3, 4, 5]), vec![20, 5, 1]);
/// assert_eq!(compute_strides(&[2, 3]), vec![3, 1]);
/// assert_eq!(compute_strides(&[5]), vec![1]);
/// assert_eq!(compute_strides(&[]), Vec::<usize>::new());
/// ```
pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;
    for (s, &dim) in strides.iter_mut().zip(shape.iter()).rev() {
        *s = stride;
        stride *= dim;
    }
    strides
}

/// Convert cartesian indices to a linear index.
#[inline]
pub fn cartesian_to_linear(indices: &[usize], strides: &[usize]) -> usize {
    indices
        .iter()
        .zip(strides.iter())
        .map(|(&idx, &stride)| idx * stride)
        .sum()
}

/// Convert a linear index to cartesian indices (row-major).
pub fn linear_to_cartesian(mut linear: usize, shape: &[usize]) -> Vec<usize> {
    let mut indices = vec![0; shape.len()];
    for (idx, &dim) in indices.iter_mut().zip(shape.iter()).rev() {
        *idx = linear % dim;
        linear /= dim;
    }
    indices
}

/// Permute the axes of a row-major buffer.
///
/// `perm[i]` gives the source axis for the i-th axis of the result.
pub(crate) fn permute<T: Copy>(data: &[T], shape: &[usize], perm: &[usize]) -> Vec<T> {
    debug_assert_eq!(shape.len(), perm.len());
    if perm.iter().enumerate().all(|(i, &p)| i == p) {
        return data.to_vec();
    }

    let src_strides = compute_strides(shape);
    let new_shape: Vec<usize> = perm.iter().map(|&p| shape[p]).collect();
    // source stride of each destination axis
    let walk: Vec<usize> = perm.iter().map(|&p| src_strides[p]).collect();

    let mut out = Vec::with_capacity(data.len());
    let mut index = vec![0usize; new_shape.len()];
    let mut offset = 0usize;
    for _ in 0..data.len() {
        out.push(data[offset]);
        // odometer step over the destination index, last axis fastest
        for axis in (0..new_shape.len()).rev() {
            index[axis] += 1;
            offset += walk[axis];
            if index[axis] < new_shape[axis] {
                break;
            }
            offset -= walk[axis] * new_shape[axis];
            index[axis] = 0;
        }
    }
    out
}
