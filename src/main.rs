//! Neon Bounce entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use neon_bounce::Session;
    use neon_bounce::audio::AudioManager;
    use neon_bounce::platform::{default_storage, pointer_to_logical};
    use neon_bounce::renderer::SdfRenderState;
    use neon_bounce::sim::GamePhase;
    use neon_bounce::ui::{self, GameOverSummary, Hud, Overlay};

    /// Game wrapper for WASM
    struct Game {
        session: Session,
        render_state: Option<SdfRenderState>,
        document: Document,
        canvas: HtmlCanvasElement,
        /// Handle of the pending animation frame
        frame_handle: Option<i32>,
        /// Cleared on page hide; the loop stops rescheduling
        running: bool,
        /// Last HUD written to the DOM
        last_hud: Option<Hud>,
        last_phase: Option<GamePhase>,
    }

    impl Game {
        /// Advance one frame and draw it
        fn frame(&mut self) {
            self.session.frame();
            self.render();
            self.sync_dom();
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.session.state(), self.session.settings()) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Match canvas backing size to its laid out size
        fn fit_canvas(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let dpr = window.device_pixel_ratio();
            let width = (f64::from(self.canvas.client_width()) * dpr) as u32;
            let height = (f64::from(self.canvas.client_height()) * dpr) as u32;
            if width == 0 || height == 0 {
                return;
            }
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", !visible);
            }
        }

        /// Push HUD and overlay changes to the DOM
        fn sync_dom(&mut self) {
            let phase = self.session.phase();
            let hud = Hud::new(&self.session.metrics(), phase);

            if self.last_hud.as_ref() != Some(&hud) {
                self.set_text("hud-score", &hud.score);
                self.set_text("hud-best", &hud.best);
                self.set_text("hud-combo", hud.combo.as_deref().unwrap_or(""));
                self.set_visible("hud-combo", hud.combo.is_some());
                self.set_text("pause-btn", hud.pause_label());
                self.last_hud = Some(hud);
            }

            if self.last_phase == Some(phase) {
                return;
            }
            self.last_phase = Some(phase);

            let overlay = Overlay::from(phase);
            self.set_visible("start-screen", overlay == Overlay::Title);
            self.set_visible("pause-overlay", overlay == Overlay::Paused);
            self.set_visible("game-over-screen", overlay == Overlay::GameOver);
            self.set_visible("hud", overlay.shows_hud());
            self.set_text("status-line", ui::status_line(phase));

            if let (Overlay::GameOver, Some(metrics)) = (overlay, self.session.last_run()) {
                let summary = GameOverSummary::from(metrics);
                self.set_text("final-score", &summary.score.to_string());
                self.set_text("final-combo", &summary.max_combo.to_string());
                self.set_text("final-high-score", &summary.high_score.to_string());
                self.set_visible("new-high-score", summary.new_high_score);
            }
        }
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<SdfRenderState, String> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| format!("Failed to create surface: {}", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("Failed to get adapter: {}", e))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        SdfRenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| format!("Failed to create device: {}", e))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| e.to_string())?;

        log::info!("Neon Bounce starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        document.set_title(ui::TITLE);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let session = Session::new(default_storage(), Box::new(AudioManager::new()));

        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: None,
            document: document.clone(),
            canvas: canvas.clone(),
            frame_handle: None,
            running: true,
            last_hud: None,
            last_phase: None,
        }));
        game.borrow_mut().fit_canvas();

        let (width, height) = (canvas.width(), canvas.height());
        match init_renderer(&canvas, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("{} - rendering disabled", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_lifecycle(game.clone());

        game.borrow_mut().sync_dom();
        request_animation_frame(game);

        log::info!("Neon Bounce running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                // Keep arrows and space from scrolling the page
                if matches!(key.as_str(), " " | "ArrowLeft" | "ArrowRight") {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                g.session.key_down(&key);
                g.sync_dom();
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().session.key_up(&event.key());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key-up events are lost while the window is unfocused
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().session.release_keys();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer
        {
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_ref.get_bounding_client_rect();
                let x = pointer_to_logical(
                    event.client_x() as f32,
                    rect.left() as f32,
                    rect.width() as f32,
                );
                game.borrow_mut().session.pointer_moved(x);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["start-btn", "restart-btn"] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.session.start();
                g.sync_dom();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.session.toggle_pause();
                g.sync_dom();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_lifecycle(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Stop the loop when the page goes away
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.running = false;
                if let Some(handle) = g.frame_handle.take() {
                    if let Some(window) = web_sys::window() {
                        let _ = window.cancel_animation_frame(handle);
                    }
                }
                log::info!("Page hidden, loop stopped");
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart the loop when restored from the back/forward cache
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let restart = {
                    let mut g = game.borrow_mut();
                    let restart = !g.running;
                    g.running = true;
                    restart
                };
                if restart {
                    request_animation_frame(game.clone());
                }
            });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().fit_canvas();
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let game_ref = game.clone();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game_ref);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => game.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.frame_handle = None;
            if !g.running {
                return;
            }
            g.frame();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

/// Headless run: an autopilot plays with the keyboard until the ball drops
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_bounce::Session;
    use neon_bounce::audio::SilentAudio;
    use neon_bounce::platform::default_storage;
    use neon_bounce::sim::GamePhase;

    env_logger::init();
    log::info!("Neon Bounce (native) starting...");
    log::info!("Native mode is headless - build for wasm32 to play");

    // One minute at 60 fps unless told otherwise
    let max_frames: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(3600);

    let mut session = Session::new(default_storage(), Box::new(SilentAudio));
    session.start();

    let mut frames = 0;
    while frames < max_frames && session.phase() == GamePhase::Playing {
        let state = session.state();
        let target = state.ball.pos.x;
        let center = state.paddle.center_x();

        // Small dead zone so the paddle does not jitter
        let hold = [
            ("ArrowLeft", target < center - 5.0),
            ("ArrowRight", target > center + 5.0),
        ];
        for (key, held) in hold {
            if held {
                session.key_down(key);
            } else {
                session.key_up(key);
            }
        }
        session.frame();
        frames += 1;
    }

    let metrics = session.last_run().unwrap_or_else(|| session.metrics());
    log::info!(
        "Finished after {} frames: score {}, best combo {}, high score {}",
        frames,
        metrics.score,
        metrics.max_combo,
        metrics.high_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
