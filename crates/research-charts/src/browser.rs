//! web-sys glue
//!
//! Animation frames, document-level listeners and resize observation, each
//! owned by a value that releases the browser resource when dropped.

use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{Element, EventTarget, MouseEvent, ResizeObserver, ResizeObserverEntry};

use crate::interpolator::FrameScheduler;

/// High-resolution timestamp in milliseconds, on the same clock as
/// animation frame callbacks
pub fn now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Pointer position relative to an element's top-left corner
pub fn offset_in(element: &Element, event: &MouseEvent) -> (f64, f64) {
    let rect = element.get_bounding_client_rect();
    (
        event.client_x() as f64 - rect.left(),
        event.client_y() as f64 - rect.top(),
    )
}

// ============================================================================
// ANIMATION FRAMES
// ============================================================================

/// [`FrameScheduler`] backed by `requestAnimationFrame`
pub struct RafScheduler {
    callback: Closure<dyn FnMut(f64)>,
    handle: Option<i32>,
}

impl RafScheduler {
    pub fn new(mut on_frame: impl FnMut(f64) + 'static) -> Self {
        let callback = Closure::<dyn FnMut(f64)>::wrap(Box::new(move |timestamp: f64| {
            on_frame(timestamp);
        }));
        Self {
            callback,
            handle: None,
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        match window.request_animation_frame(self.callback.as_ref().unchecked_ref()) {
            Ok(handle) => self.handle = Some(handle),
            Err(err) => tracing::error!(?err, "requestAnimationFrame failed"),
        }
    }

    fn cancel_frame(&mut self) {
        if let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) {
            if let Err(err) = window.cancel_animation_frame(handle) {
                tracing::error!(?err, "cancelAnimationFrame failed");
            }
        }
    }

    fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    fn frame_delivered(&mut self) {
        self.handle = None;
    }
}

impl Drop for RafScheduler {
    fn drop(&mut self) {
        self.cancel_frame();
    }
}

// ============================================================================
// EVENT LISTENERS
// ============================================================================

/// A mouse listener that is removed when the guard is dropped
pub struct ListenerGuard {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(MouseEvent)>,
    attached: bool,
}

impl ListenerGuard {
    pub fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(MouseEvent) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(handler));
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
            attached: true,
        })
    }

    /// Listen on the whole document
    pub fn on_document(
        event: &'static str,
        handler: impl FnMut(MouseEvent) + 'static,
    ) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Self::attach(&document, event, handler)
    }

    /// Stop listening but keep the callback alive. Safe to call from inside
    /// the callback itself.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            tracing::error!(?err, event = self.event, "failed to remove listener");
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.detach();
    }
}

// ============================================================================
// RESIZE OBSERVATION
// ============================================================================

/// Reports an element's content-box size; disconnects when dropped
pub struct SizeObserver {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(Array)>,
}

impl SizeObserver {
    pub fn observe(
        element: &Element,
        mut on_resize: impl FnMut(f64, f64) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Array)>::wrap(Box::new(move |entries: Array| {
            let last = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<ResizeObserverEntry>().ok())
                .last();
            if let Some(entry) = last {
                let rect = entry.content_rect();
                on_resize(rect.width(), rect.height());
            }
        }));

        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(element);
        tracing::debug!("resize observer attached");

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for SizeObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
