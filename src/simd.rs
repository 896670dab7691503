//! Wide byte-lane kernels with runtime CPU detection.
//!
//! The fader's fine path subtracts the same value from every byte of the scene.
//! With AVX2 (x86-64) or NEON (aarch64) that is one saturating-subtract per
//! vector; without either we fall back to a scalar loop over the same lanes.
//!
//! Only whole vectors are processed. Trailing bytes past the last full vector are
//! left as they are, whichever implementation runs, so the result never depends on
//! which path the probe picked.

/// CPU capabilities detected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuFeatures {
    /// AVX2: 32-byte saturating subtract
    pub has_avx2: bool,
    /// NEON: 16-byte saturating subtract
    pub has_neon: bool,
}

impl CpuFeatures {
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            Self {
                has_avx2: std::arch::is_x86_feature_detected!("avx2"),
                has_neon: false,
            }
        }
        #[cfg(target_arch = "aarch64")]
        {
            Self {
                has_avx2: false,
                has_neon: std::arch::is_aarch64_feature_detected!("neon"),
            }
        }
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Self::none()
        }
    }

    /// No vector unit; forces the scalar kernels.
    pub const fn none() -> Self {
        Self {
            has_avx2: false,
            has_neon: false,
        }
    }

    pub fn has_wide_lanes(&self) -> bool {
        self.has_avx2 || self.has_neon
    }
}

/// Probe result, taken once and reused every frame.
#[derive(Debug, Clone, Copy)]
pub struct SimdOps {
    features: CpuFeatures,
}

/// Bytes per vector the fine fade works in, whatever unit runs it.
pub const LANE_BYTES: usize = 32;

impl SimdOps {
    pub fn new() -> Self {
        Self {
            features: CpuFeatures::detect(),
        }
    }

    pub fn with_features(features: CpuFeatures) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &CpuFeatures {
        &self.features
    }

    /// `bytes[i] = bytes[i].saturating_sub(value)` over every full LANE_BYTES block.
    pub fn subtract_saturating(&self, bytes: &mut [u8], value: u8) {
        if value == 0 {
            return;
        }
        let whole = bytes.len() - bytes.len() % LANE_BYTES;
        let bytes = &mut bytes[..whole];

        #[cfg(target_arch = "x86_64")]
        {
            if self.features.has_avx2 {
                // SAFETY: AVX2 support was verified by the probe.
                unsafe { x86_64::subtract_saturating_avx2(bytes, value) };
                return;
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            if self.features.has_neon {
                // SAFETY: NEON support was verified by the probe.
                unsafe { aarch64::subtract_saturating_neon(bytes, value) };
                return;
            }
        }

        scalar::subtract_saturating(bytes, value);
    }
}

impl Default for SimdOps {
    fn default() -> Self {
        Self::new()
    }
}

pub mod scalar {
    /// Portable fallback: plain saturating subtract per byte.
    pub fn subtract_saturating(bytes: &mut [u8], value: u8) {
        for b in bytes {
            *b = b.saturating_sub(value);
        }
    }
}

#[cfg(target_arch = "x86_64")]
mod x86_64 {
    use std::arch::x86_64::*;

    /// # Safety
    ///
    /// Caller must have verified AVX2 support; `bytes.len()` is a multiple of 32.
    #[target_feature(enable = "avx2")]
    pub(super) unsafe fn subtract_saturating_avx2(bytes: &mut [u8], value: u8) {
        let fade = _mm256_set1_epi8(value as i8);
        for chunk in bytes.chunks_exact_mut(32) {
            let p = chunk.as_mut_ptr().cast::<__m256i>();
            unsafe {
                let px = _mm256_loadu_si256(p);
                _mm256_storeu_si256(p, _mm256_subs_epu8(px, fade));
            }
        }
    }
}

#[cfg(target_arch = "aarch64")]
mod aarch64 {
    use std::arch::aarch64::*;

    /// # Safety
    ///
    /// Caller must have verified NEON support; `bytes.len()` is a multiple of 16.
    #[target_feature(enable = "neon")]
    pub(super) unsafe fn subtract_saturating_neon(bytes: &mut [u8], value: u8) {
        let fade = vdupq_n_u8(value);
        for chunk in bytes.chunks_exact_mut(16) {
            let p = chunk.as_mut_ptr();
            unsafe {
                let px = vld1q_u8(p);
                vst1q_u8(p, vqsubq_u8(px, fade));
            }
        }
    }
}
