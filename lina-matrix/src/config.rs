use core::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_PIVOT_EPS: f64 = 1e-12;

// bit pattern of `DEFAULT_PIVOT_EPS`.
static PIVOT_EPS: AtomicU64 = AtomicU64::new(0x3D71_9799_812D_EA11);

// Relative threshold below which a pivot candidate counts as zero.
// The absolute threshold for a row is `pivot_eps() * max_j |a_ij|` over that input row.
pub fn pivot_eps() -> f64 {
    f64::from_bits(PIVOT_EPS.load(Ordering::Relaxed))
}

pub fn set_pivot_eps(eps: f64) {
    assert!(eps.is_finite() && eps >= 0.0, "pivot eps must be finite and non-negative: {eps}");
    PIVOT_EPS.store(eps.to_bits(), Ordering::Relaxed)
}
