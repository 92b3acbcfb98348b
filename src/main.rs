//! Brickfall entry point
//!
//! Handles platform-specific initialization and runs the animation loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent, WheelEvent};

    use brickfall::Settings;
    use brickfall::audio::AudioManager;
    use brickfall::consts::*;
    use brickfall::renderer::RenderState;
    use brickfall::sim::{DetonationPhase, SceneEvent, SceneState, Stepper, TickInput};

    /// App instance holding all state
    struct App {
        state: SceneState,
        render_state: Option<RenderState>,
        stepper: Stepper,
        input: TickInput,
        last_time: f64,
        settings: Settings,
        audio: AudioManager,
        /// Last HUD text, to avoid touching the DOM every frame
        last_status: String,
    }

    impl App {
        fn new(seed: u64, settings: Settings) -> Self {
            let audio = AudioManager::new(settings.effective_volume());
            Self {
                state: SceneState::new(settings.wall_layout(), seed),
                render_state: None,
                stepper: Stepper::default(),
                input: TickInput::default(),
                last_time: 0.0,
                settings,
                audio,
                last_status: String::new(),
            }
        }

        /// Run simulation ticks and react to what happened
        fn update(&mut self, dt: f32) {
            self.stepper
                .advance(&mut self.state, &mut self.input, dt);

            for event in self.state.drain_events() {
                match event {
                    SceneEvent::Armed => self.audio.play_armed(),
                    SceneEvent::Blast => self.audio.play_explosion(),
                    SceneEvent::Ignored | SceneEvent::Reset => {}
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Status line shown under the buttons
        fn status_text(&self) -> String {
            match self.state.phase() {
                DetonationPhase::Idle => "Ready".to_string(),
                DetonationPhase::Fuse => {
                    let remaining = self
                        .state
                        .detonation
                        .fuse_remaining(self.state.time)
                        .unwrap_or(0.0);
                    format!("Detonating in {:.1}s", remaining)
                }
                DetonationPhase::Impulse => "BOOM!".to_string(),
                DetonationPhase::Settling | DetonationPhase::Finished => {
                    "Settling...".to_string()
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let text = self.status_text();
            if text == self.last_status {
                return;
            }
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("status"))
            {
                el.set_text_content(Some(&text));
            }
            self.last_status = text;
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Brickfall starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = canvas_pixel_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed, settings)));

        log::info!(
            "Scene built with seed {}: {} bricks",
            seed,
            app.borrow().state.bricks.len()
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        app.borrow_mut().render_state = Some(render_state);

        setup_mouse_handlers(&canvas, app.clone());
        setup_touch_handlers(&canvas, app.clone());
        setup_keyboard(app.clone());
        setup_buttons(app.clone());
        setup_resize(canvas.clone(), app.clone());
        setup_visibility(app.clone());

        request_animation_frame(app);

        log::info!("Brickfall running!");
    }

    /// Canvas backing-store size for the current device pixel ratio
    fn canvas_pixel_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    fn setup_mouse_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Drag start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut()
                    .state
                    .camera
                    .begin_drag(event.client_x() as f32, event.client_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag move - listen on window so drags continue outside the canvas
        {
            let app = app.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let sensitivity = a.settings.orbit_sensitivity;
                a.state.camera.drag_to(
                    event.client_x() as f32,
                    event.client_y() as f32,
                    sensitivity,
                );
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag end
        {
            let app = app.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().state.camera.end_drag();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel zoom
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let notches = -(event.delta_y() as f32).signum();
                let amount = notches * a.settings.zoom_speed;
                a.state.camera.zoom(amount);
            });
            let _ = canvas
                .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Touch start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    app.borrow_mut()
                        .state
                        .camera
                        .begin_drag(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    let sensitivity = a.settings.orbit_sensitivity;
                    a.state.camera.drag_to(
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                        sensitivity,
                    );
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().state.camera.end_drag();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut a = app.borrow_mut();
            match event.key().as_str() {
                " " | "Enter" => {
                    // Keep a focused button from also receiving a click
                    event.prevent_default();
                    a.audio.resume();
                    a.input.detonate = true;
                }
                "r" | "R" => a.input.reset_view = true,
                "m" | "M" => {
                    a.settings.muted = !a.settings.muted;
                    let volume = a.settings.effective_volume();
                    a.audio.set_volume(volume);
                    a.settings.save();
                    log::info!("Muted: {}", a.settings.muted);
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("reset-view-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().input.reset_view = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("detonate-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                // Clicking is the user gesture browsers need to unlock audio
                a.audio.resume();
                a.input.detonate = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let (width, height) = canvas_pixel_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(render_state) = app.borrow_mut().render_state.as_mut() {
                render_state.resize(width, height);
            }
            log::debug!("Resized to {}x{}", width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Hidden tabs stop rAF; start timing afresh when shown again
    fn setup_visibility(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Visible {
                let mut a = app.borrow_mut();
                a.stepper.reset();
                a.last_time = 0.0;
                log::debug!("Page visible again, frame timing reset");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            animation_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn animation_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brickfall (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    run_headless_detonation();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Detonate once without a window and report the timeline
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_detonation() {
    use brickfall::Settings;
    use brickfall::consts::*;
    use brickfall::sim::{DetonationPhase, SceneState, TickInput, tick};

    let settings = Settings::load();
    let mut state = SceneState::new(settings.wall_layout(), 0x5eed);
    let detonate = TickInput {
        detonate: true,
        ..Default::default()
    };
    tick(&mut state, &detonate, SIM_DT);

    let mut last_phase = state.phase();
    let total_ticks = ((DETONATION_WINDOW_SECONDS + 0.5) / SIM_DT as f64) as u32;
    for _ in 0..total_ticks {
        tick(&mut state, &TickInput::default(), SIM_DT);
        let phase = state.phase();
        if phase != last_phase {
            let displaced = state
                .bricks
                .iter()
                .filter(|b| b.position != b.initial_position)
                .count();
            println!(
                "t={:>5.2}s  {:?} -> {:?}  ({} of {} bricks displaced)",
                state.time,
                last_phase,
                phase,
                displaced,
                state.bricks.len()
            );
            last_phase = phase;
        }
    }

    let restored = state.bricks.iter().all(|b| b.at_rest());
    println!(
        "Final phase {:?}, wall restored: {}",
        state.phase(),
        restored
    );
    debug_assert!(restored && state.phase() == DetonationPhase::Idle);
}
