//! Vibration via the browser Vibration API
//!
//! Many browsers (desktop, iOS Safari) don't expose `navigator.vibrate`;
//! those, and native builds, silently drop every pattern.

/// Alternating on/off durations in milliseconds, starting with "on"
pub type VibrationPattern = &'static [u32];

/// Haptic output channel
pub struct Haptics {
    available: bool,
}

impl Default for Haptics {
    fn default() -> Self {
        Self::new()
    }
}

impl Haptics {
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        let available = web_sys::window()
            .map(|w| {
                js_sys::Reflect::has(&w.navigator(), &wasm_bindgen::JsValue::from_str("vibrate"))
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if !available {
            log::info!("Vibration API not available - haptics disabled");
        }
        Self { available }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self { available: false }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Total time the pattern occupies, in ms
    pub fn pattern_length(pattern: VibrationPattern) -> u32 {
        pattern.iter().sum()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn vibrate(&self, pattern: VibrationPattern) {
        if !self.available {
            return;
        }
        let Some(window) = web_sys::window() else { return };
        let navigator = window.navigator();
        if let [single] = pattern {
            navigator.vibrate_with_duration(*single);
        } else {
            let arr = js_sys::Array::new();
            for ms in pattern {
                arr.push(&wasm_bindgen::JsValue::from(*ms));
            }
            navigator.vibrate_with_pattern(&arr);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn vibrate(&self, pattern: VibrationPattern) {
        log::trace!(
            "haptics unavailable, dropping {}ms pattern",
            Self::pattern_length(pattern)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_length() {
        assert_eq!(Haptics::pattern_length(&[100, 50, 100]), 250);
        assert_eq!(Haptics::pattern_length(&[]), 0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_haptics_noop() {
        let h = Haptics::new();
        assert!(!h.is_available());
        h.vibrate(&[10]);
    }
}
