use folio::models::WindowBounds;
use tauri::{PhysicalPosition, PhysicalSize, Runtime, WebviewWindow, Window};

/// Minimum window width in pixels
pub const MIN_WINDOW_WIDTH: u32 = 360;
/// Minimum window height in pixels
pub const MIN_WINDOW_HEIGHT: u32 = 320;

/// Clamps window bounds to minimum dimensions.
pub fn clamp_bounds(bounds: WindowBounds) -> WindowBounds {
    WindowBounds {
        width: bounds.width.max(MIN_WINDOW_WIDTH),
        height: bounds.height.max(MIN_WINDOW_HEIGHT),
        x: bounds.x,
        y: bounds.y,
    }
}

/// Reads the current outer bounds of a window.
pub fn current_bounds<R: Runtime>(window: &Window<R>) -> Result<WindowBounds, String> {
    let size = window
        .outer_size()
        .map_err(|e| format!("Failed to read window size: {}", e))?;
    let position = window
        .outer_position()
        .map_err(|e| format!("Failed to read window position: {}", e))?;

    Ok(clamp_bounds(WindowBounds {
        width: size.width,
        height: size.height,
        x: Some(position.x),
        y: Some(position.y),
    }))
}

/// Applies saved bounds to a window. The position is only set when both
/// coordinates were saved.
pub fn restore_bounds<R: Runtime>(window: &WebviewWindow<R>, bounds: WindowBounds) {
    let bounds = clamp_bounds(bounds);
    if let Err(e) = window.set_size(PhysicalSize::new(bounds.width, bounds.height)) {
        log::warn!("Failed to restore window size: {}", e);
    }
    if let (Some(x), Some(y)) = (bounds.x, bounds.y) {
        if let Err(e) = window.set_position(PhysicalPosition::new(x, y)) {
            log::warn!("Failed to restore window position: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp_bounds_keeps_position() {
        let bounds = clamp_bounds(WindowBounds {
            width: 10,
            height: 10,
            x: Some(-5),
            y: Some(40),
        });
        assert_eq!(bounds.width, MIN_WINDOW_WIDTH);
        assert_eq!(bounds.height, MIN_WINDOW_HEIGHT);
        assert_eq!(bounds.x, Some(-5));
        assert_eq!(bounds.y, Some(40));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Clamped bounds never fall below the minimums and never shrink a valid size.
        #[test]
        fn prop_clamp_bounds_respects_minimums(width in 0u32..4000, height in 0u32..3000) {
            let clamped = clamp_bounds(WindowBounds { width, height, x: None, y: None });
            prop_assert!(clamped.width >= MIN_WINDOW_WIDTH);
            prop_assert!(clamped.height >= MIN_WINDOW_HEIGHT);
            prop_assert_eq!(clamped.width, width.max(MIN_WINDOW_WIDTH));
            prop_assert_eq!(clamped.height, height.max(MIN_WINDOW_HEIGHT));
        }
    }
}
