//! Trailing-contiguity analysis of strided layouts.

/// Result of scanning a strided layout for its trailing row-major run.
///
/// Dimensions `run_start..ndims` collapse into one flat range of
/// `run_elements` elements; dimensions `0..run_start` must be traversed
/// explicitly. `run_start == 0` means the whole view is a single flat range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContiguousRun {
    /// Outermost dimension absorbed into the trailing contiguous run.
    pub run_start: usize,
    /// Elements covered by one contiguous run.
    pub run_elements: usize,
    /// Logical elements in the whole view.
    pub total_elements: usize,
}

/// Scan `strides` from the innermost dimension outward, absorbing every
/// dimension whose stride matches the row-major stride implied by the
/// dimensions already absorbed.
///
/// Empty `strides` means implicit row-major layout: the whole view is one run.
///
/// # Panics
/// Panics if `strides` is non-empty and its length differs from `sizes`.
pub fn analyze(sizes: &[usize], strides: &[isize]) -> ContiguousRun {
    if strides.is_empty() {
        let total = sizes.iter().product();
        return ContiguousRun { run_start: 0, run_elements: total, total_elements: total };
    }
    assert_eq!(
        strides.len(),
        sizes.len(),
        "stride count {} does not match {} dimensions",
        strides.len(),
        sizes.len()
    );

    let mut expected: usize = 1;
    let mut d = sizes.len();
    while d > 0 {
        if strides[d - 1] != expected as isize {
            break;
        }
        expected *= sizes[d - 1];
        d -= 1;
    }

    let total_elements = sizes[..d].iter().product::<usize>() * expected;
    ContiguousRun { run_start: d, run_elements: expected, total_elements }
}

/// Row-major (C-contiguous) strides for `sizes`, in elements.
pub fn row_major_strides(sizes: &[usize]) -> Vec<isize> {
    if sizes.is_empty() {
        return Vec::new();
    }
    let mut strides = vec![1isize; sizes.len()];
    for d in (0..sizes.len() - 1).rev() {
        strides[d] = strides[d + 1] * sizes[d + 1] as isize;
    }
    strides
}

// ── Tests ───────────────────────────────────────────────────────────
