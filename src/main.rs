//! Circuit City entry point
//!
//! Handles platform-specific initialization and runs the animation loops.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent};

    use circuit_city::achievements::{CollectionSink, ToastTimer, toast_text};
    use circuit_city::renderer::{CanvasSurface, Surface};
    use circuit_city::sim::{Variant, VizEvent};
    use circuit_city::{Catalog, CollectionLog, Settings, Visualization};

    const IDLE_CAPTION: &str = "Hover over components to explore topics";

    /// Canvases the page may provide
    const MOUNTS: [(&str, u8, bool); 4] = [
        ("circuit10", 10, true),
        ("circuit11", 11, true),
        ("waterfall10", 10, false),
        ("waterfall11", 11, false),
    ];

    /// Shared across instances: collection log plus toast elements
    struct ToastSink {
        log: Rc<RefCell<CollectionLog>>,
        document: Document,
        timer: ToastTimer,
    }

    impl ToastSink {
        /// Slide the toast out once its window has passed
        fn hide_expired(&mut self) {
            if !self.timer.expire(js_sys::Date::now()) {
                return;
            }
            if let Some(el) = self.document.get_element_by_id("toast") {
                let _ = el.set_attribute("class", "toast");
            }
        }
    }

    impl CollectionSink for ToastSink {
        fn notify(&mut self, event: &VizEvent) {
            let first = match event {
                VizEvent::Collected { topic, tag } => self.log.borrow_mut().record(topic, *tag),
                VizEvent::DataFlow { .. } => false,
            };
            if !first {
                return;
            }

            let (title, body) = toast_text(event);
            log::debug!("{}: {}", title, body);
            if let Some(el) = self.document.get_element_by_id("toast-title") {
                el.set_text_content(Some(&title));
            }
            if let Some(el) = self.document.get_element_by_id("toast-body") {
                el.set_text_content(Some(&body));
            }
            if let Some(el) = self.document.get_element_by_id("toast") {
                let _ = el.set_attribute("class", "toast show");
            }
            self.timer.show(js_sys::Date::now());
            if let Some(el) = self.document.get_element_by_id("collected-count") {
                el.set_text_content(Some(&self.log.borrow().distinct().to_string()));
            }
        }
    }

    /// One canvas with its visualization
    struct Instance {
        viz: Visualization,
        surface: CanvasSurface,
        sink: ToastSink,
        caption_id: String,
        last_caption: Option<String>,
        /// A frame callback is pending
        scheduled: bool,
    }

    impl Instance {
        /// Simulate and draw one frame; false ends the frame chain
        fn step(&mut self) -> bool {
            self.surface.fit_to_element();
            if !self.viz.frame(&mut self.surface, &mut self.sink) {
                return false;
            }
            self.sink.hide_expired();
            self.update_caption();
            true
        }

        fn update_caption(&mut self) {
            let caption = self.viz.hover_caption();
            if caption == self.last_caption {
                return;
            }
            if let Some(el) = self.sink.document.get_element_by_id(&self.caption_id) {
                el.set_text_content(Some(caption.as_deref().unwrap_or(IDLE_CAPTION)));
            }
            self.last_caption = caption;
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Circuit City starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };

        let settings = Settings::load();
        let log = Rc::new(RefCell::new(CollectionLog::new()));
        let mut mounted = 0;

        for (id, grade, circuit) in MOUNTS {
            let variant = if circuit {
                Variant::Circuit
            } else {
                Variant::waterfall()
            };
            let catalog = if circuit {
                Catalog::circuit(grade)
            } else {
                Catalog::waterfall(grade)
            };
            let Some(surface) = canvas_surface(&document, id) else {
                log::debug!("No canvas #{}", id);
                continue;
            };

            let seed = js_sys::Date::now() as u64 ^ (mounted as u64 + 1);
            let mut viz = Visualization::new(variant, catalog, surface.size(), seed);
            viz.settings = settings.clone();

            let instance = Rc::new(RefCell::new(Instance {
                viz,
                surface,
                sink: ToastSink {
                    log: log.clone(),
                    document: document.clone(),
                    timer: ToastTimer::default(),
                },
                caption_id: format!("circuitTopic{}", grade),
                last_caption: None,
                scheduled: false,
            }));

            setup_input_handlers(instance.clone());
            setup_lifecycle(instance.clone());

            if instance.borrow_mut().viz.start() {
                request_animation_frame(instance);
            }
            mounted += 1;
        }

        log::info!("Circuit City running ({} visualizations)", mounted);
    }

    fn canvas_surface(document: &Document, id: &str) -> Option<CanvasSurface> {
        let canvas: HtmlCanvasElement = document.get_element_by_id(id)?.dyn_into().ok()?;
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        let surface = CanvasSurface::new(canvas, ctx);
        surface.fit_to_element();
        Some(surface)
    }

    fn setup_input_handlers(instance: Rc<RefCell<Instance>>) {
        let canvas = instance.borrow().surface.canvas().clone();

        // Pointer position in canvas coordinates
        {
            let instance = instance.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let at = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                instance.borrow_mut().viz.pointer_moved(at);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let instance = instance.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                instance.borrow_mut().viz.pointer_left();
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click collects
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let at = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                instance.borrow_mut().viz.click(at);
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_lifecycle(instance: Rc<RefCell<Instance>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Canvas backing store follows layout; the next frame re-lays out
        {
            let instance = instance.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                instance.borrow().surface.fit_to_element();
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Hidden tabs stop the loop, visible ones restart it
        if let Some(document) = window.document() {
            let instance = instance.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    instance.borrow_mut().viz.stop();
                } else {
                    // A stop/start inside one frame keeps the old chain alive
                    let restart = {
                        let mut inst = instance.borrow_mut();
                        inst.viz.start() && !inst.scheduled
                    };
                    if restart {
                        request_animation_frame(instance.clone());
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut inst = instance.borrow_mut();
                inst.viz.stop();
                inst.viz.settings.save();
            });
            let _ = window
                .add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(instance: Rc<RefCell<Instance>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        instance.borrow_mut().scheduled = true;
        let closure = Closure::once(move |_time: f64| {
            frame_loop(instance);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(instance: Rc<RefCell<Instance>>) {
        let keep_going = {
            let mut inst = instance.borrow_mut();
            inst.scheduled = false;
            inst.step()
        };
        if keep_going {
            request_animation_frame(instance);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use circuit_city::renderer::RecordingSurface;
    use circuit_city::sim::Variant;
    use circuit_city::{Catalog, CollectionLog, Visualization};
    use glam::Vec2;

    env_logger::init();
    log::info!("Circuit City (native) starting...");
    log::info!("Native mode renders headless - run with `trunk serve` for the web version");

    let size = Vec2::new(900.0, 600.0);
    let mut log = CollectionLog::new();

    for (grade, variant) in [(10, Variant::Circuit), (11, Variant::waterfall())] {
        let catalog = match variant {
            Variant::Circuit => Catalog::circuit(grade),
            Variant::Waterfall { .. } => Catalog::waterfall(grade),
        };
        let mut viz = Visualization::new(variant, catalog, size, 0x5eed + grade as u64);
        let mut surface = RecordingSurface::new(size.x, size.y);
        viz.start();

        for frame in 0..300u32 {
            surface.clear();
            // Sweep the pointer across the board and click every 60 frames
            let at = Vec2::new(frame as f32 * 3.0 % size.x, size.y / 2.0);
            viz.pointer_moved(at);
            if frame % 60 == 0 {
                if let Some(target) = viz.state().nodes.first().map(|n| n.pos) {
                    viz.click(target);
                }
            }
            viz.frame(&mut surface, &mut log);
        }
        viz.stop();

        let state = viz.state();
        println!(
            "grade {} {:?}: {} nodes, {} connections, {} packets, {} particles, {} bubbles, {} draw calls in last frame",
            grade,
            state.variant,
            state.nodes.len(),
            state.connections.len(),
            state.packets.len(),
            state.particles.len(),
            state.bubbles.len(),
            surface.cmds().len()
        );
    }

    println!(
        "collected {} topics ({} total), {} data flows",
        log.distinct(),
        log.total(),
        log.flows
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
