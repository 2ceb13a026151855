//! Host sample formats.

/// A host buffer sample. The processor works in `f64` internally and
/// accepts 32- and 64-bit float buffers.
pub trait Sample: Copy + Send + 'static {
    /// Widen to the internal format.
    fn to_f64(self) -> f64;
    /// Narrow from the internal format.
    fn from_f64(value: f64) -> Self;
}

impl Sample for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Sample for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}
