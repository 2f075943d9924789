use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::EventTarget;

pub type Listener = Closure<dyn FnMut()>;

struct Attached {
	target: EventTarget,
	event: &'static str,
	callback: Listener,
}

/// Browser callbacks owned by one canvas mount.
///
/// Closures are removed from their targets, and the pending timeout and
/// animation frame are cancelled, before anything is dropped.
#[derive(Default)]
pub struct Listeners {
	attached: Vec<Attached>,
	retained: Vec<Listener>,
	timeout: Rc<Cell<Option<i32>>>,
	frame: Rc<Cell<Option<i32>>>,
}

impl Listeners {
	pub fn attach(&mut self, target: &EventTarget, event: &'static str, callback: Listener) {
		let _ = target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
		self.attached.push(Attached {
			target: target.clone(),
			event,
			callback,
		});
	}

	/// Keep a closure alive that is invoked indirectly, e.g. through a timer.
	pub fn retain(&mut self, callback: Listener) {
		self.retained.push(callback);
	}

	/// Slot for the pending debounce timer handle.
	pub fn timeout_slot(&self) -> Rc<Cell<Option<i32>>> {
		self.timeout.clone()
	}

	/// Slot for the pending animation frame handle.
	pub fn frame_slot(&self) -> Rc<Cell<Option<i32>>> {
		self.frame.clone()
	}

	pub fn detach_all(&mut self) {
		if let Some(window) = web_sys::window() {
			if let Some(handle) = self.timeout.take() {
				window.clear_timeout_with_handle(handle);
			}
			if let Some(handle) = self.frame.take() {
				let _ = window.cancel_animation_frame(handle);
			}
		}
		for Attached {
			target,
			event,
			callback,
		} in self.attached.drain(..)
		{
			let _ = target.remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
		}
		self.retained.clear();
	}
}

impl Drop for Listeners {
	fn drop(&mut self) {
		self.detach_all();
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use wasm_bindgen_test::*;
	use web_sys::Event;

	use super::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn target() -> EventTarget {
		web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.create_element("div").ok())
			.map(Into::into)
			.unwrap()
	}

	fn fire(target: &EventTarget, name: &str) {
		let event = Event::new(name).unwrap();
		target.dispatch_event(&event).unwrap();
	}

	#[wasm_bindgen_test]
	fn detached_callbacks_stop_firing() {
		let target = target();
		let hits = Rc::new(Cell::new(0));
		let counter = hits.clone();
		let mut listeners = Listeners::default();
		listeners.attach(
			&target,
			"visibilitychange",
			Closure::new(move || counter.set(counter.get() + 1)),
		);

		fire(&target, "visibilitychange");
		assert_eq!(hits.get(), 1);

		listeners.detach_all();
		fire(&target, "visibilitychange");
		assert_eq!(hits.get(), 1);
	}

	#[wasm_bindgen_test]
	fn pending_frame_and_timer_are_cancelled() {
		let window = web_sys::window().unwrap();
		let mut listeners = Listeners::default();
		let fired = Rc::new(Cell::new(false));

		let flag = fired.clone();
		let frame: Listener = Closure::new(move || flag.set(true));
		let handle = window
			.request_animation_frame(frame.as_ref().unchecked_ref())
			.unwrap();
		listeners.frame_slot().set(Some(handle));
		listeners.retain(frame);

		let flag = fired.clone();
		let timer: Listener = Closure::new(move || flag.set(true));
		let handle = window
			.set_timeout_with_callback_and_timeout_and_arguments_0(timer.as_ref().unchecked_ref(), 0)
			.unwrap();
		listeners.timeout_slot().set(Some(handle));
		listeners.retain(timer);

		listeners.detach_all();
		assert_eq!(listeners.frame_slot().get(), None);
		assert_eq!(listeners.timeout_slot().get(), None);
		assert!(!fired.get());
	}
}
