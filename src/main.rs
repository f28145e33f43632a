//! Winter Platformer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, KeyboardEvent};

    use winter_platformer::persistence::LocalStore;
    use winter_platformer::platform::TouchButton;
    use winter_platformer::renderer::CanvasSurface;
    use winter_platformer::sim::GamePhase;
    use winter_platformer::{Game, Settings, StoredHighScores, Viewport};

    /// Host-side loop state
    struct Host {
        game: Game,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
        /// Text field for typing a name without a hardware keyboard
        name_field: Option<HtmlInputElement>,
        /// Last visibility applied to `name_field`
        name_field_shown: Option<bool>,
        /// Name submitted by the field, applied on the next frame
        pending_name: Rc<RefCell<Option<String>>>,
        last_time: f64,
    }

    impl Host {
        /// Match the canvas to its CSS size; sampled every frame
        fn viewport(&self) -> Viewport {
            let width = self.canvas.client_width().max(1) as u32;
            let height = self.canvas.client_height().max(1) as u32;
            if self.canvas.width() != width || self.canvas.height() != height {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
            }
            Viewport::new(width as f32, height as f32)
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time) as f32
            } else {
                0.0
            };
            self.last_time = time;

            let submitted = self.pending_name.borrow_mut().take();
            if let Some(name) = submitted {
                if self.game.submit_name(&name) {
                    if let Some(field) = &self.name_field {
                        field.set_value("");
                    }
                }
            }

            let viewport = self.viewport();
            self.game.tick(dt, viewport);
            for event in self.game.events() {
                log::debug!("{event:?}");
            }
            self.game.render(&mut self.surface, viewport);
            self.sync_name_field();
        }

        /// Show the name field only on the name screen
        fn sync_name_field(&mut self) {
            let Some(field) = &self.name_field else {
                return;
            };
            let wanted = self.game.state().phase == GamePhase::NameEntry;
            if self.name_field_shown == Some(wanted) {
                return;
            }
            let display = if wanted { "block" } else { "none" };
            field.style().set_property("display", display).ok();
            if wanted {
                field.focus().ok();
            } else {
                field.blur().ok();
            }
            self.name_field_shown = Some(wanted);
        }
    }

    /// Keys the page should not scroll on
    fn is_game_key(key: &str) -> bool {
        matches!(key, " " | "ArrowLeft" | "ArrowRight" | "ArrowUp")
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {e}").into());
        }

        log::info!("Winter Platformer starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let surface = CanvasSurface::new(&canvas)?;

        let settings = Settings::load_or_init(&mut LocalStore);
        let viewport = Viewport::new(canvas.client_width() as f32, canvas.client_height() as f32);
        let game = Game::new(
            &settings,
            viewport,
            Box::new(StoredHighScores::new(LocalStore)),
        );

        let host = Rc::new(RefCell::new(Host {
            game,
            surface,
            canvas,
            name_field: None,
            name_field_shown: None,
            pending_name: Rc::new(RefCell::new(None)),
            last_time: 0.0,
        }));

        setup_keyboard(&window, host.clone())?;
        setup_touch_buttons(&document, host.clone())?;
        let pending_name = host.borrow().pending_name.clone();
        let name_field = setup_name_field(&document, pending_name)?;
        host.borrow_mut().name_field = name_field;
        request_animation_frame(host);

        log::info!("Winter Platformer running!");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if is_game_key(&key) {
                    event.prevent_default();
                }
                host.borrow_mut().game.input_mut().key_down(&key);
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                host.borrow_mut().game.input_mut().key_up(&event.key());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            // Keys released while unfocused never report keyup
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                host.borrow_mut().game.input_mut().clear();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_touch_buttons(document: &web_sys::Document, host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        let buttons = [
            ("btnLeft", TouchButton::Left),
            ("btnRight", TouchButton::Right),
            ("btnJump", TouchButton::Jump),
        ];

        for (id, button) in buttons {
            let Some(element) = document.get_element_by_id(id) else {
                log::debug!("No #{id} element, touch controls disabled for it");
                continue;
            };
            for (event_name, down) in [
                ("touchstart", true),
                ("touchend", false),
                ("touchcancel", false),
                ("mousedown", true),
                ("mouseup", false),
                ("mouseleave", false),
            ] {
                let host = host.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    host.borrow_mut().game.input_mut().set_touch(button, down);
                });
                element.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
                closure.forget();
            }
        }
        Ok(())
    }

    fn setup_name_field(
        document: &web_sys::Document,
        pending_name: Rc<RefCell<Option<String>>>,
    ) -> Result<Option<HtmlInputElement>, JsValue> {
        let Some(element) = document.get_element_by_id("mobileNameInput") else {
            log::debug!("No #mobileNameInput element, name entry is keyboard only");
            return Ok(None);
        };
        let field: HtmlInputElement = element.dyn_into()?;

        // `change` fires on Enter or on blur, possibly mid-frame
        let closure = {
            let field = field.clone();
            Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                *pending_name.borrow_mut() = Some(field.value());
            })
        };
        field.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();

        Ok(Some(field))
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        host.borrow_mut().frame(time);
        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Winter Platformer (native) starting...");
    log::info!("Native mode runs a headless scripted demo - serve the wasm build for the real game");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: a scripted player dashes right, hopping every so often
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use winter_platformer::persistence::FileStore;
    use winter_platformer::sim::{GameEvent, GamePhase};
    use winter_platformer::{Game, Settings, StoredHighScores, Viewport};

    const FRAME_MS: f32 = 16.0;
    /// Two minutes of frames
    const MAX_FRAMES: u32 = 7500;

    pub fn run() {
        let dir = std::env::temp_dir().join("winter-platformer");
        let settings = Settings::load_or_init(&mut FileStore::new(&dir));
        let viewport = Viewport::default();
        let mut game = Game::new(
            &settings,
            viewport,
            Box::new(StoredHighScores::new(FileStore::new(&dir))),
        );

        game.submit_name("DEMO");
        // Release, then confirm
        game.tick(FRAME_MS, viewport);
        game.input_mut().key_down("Enter");
        game.tick(FRAME_MS, viewport);
        game.input_mut().key_up("Enter");
        game.input_mut().key_down("ArrowRight");

        for frame in 0..MAX_FRAMES {
            // Tap jump for a few frames every half second
            match frame % 30 {
                0 => game.input_mut().key_down(" "),
                3 => game.input_mut().key_up(" "),
                _ => {}
            }
            game.tick(FRAME_MS, viewport);

            for event in game.events() {
                match event {
                    GameEvent::Landed { .. } => log::trace!("{event:?}"),
                    GameEvent::RunEnded { victory, score } => {
                        log::info!("Run ended at frame {frame}: victory={victory} score={score}")
                    }
                    _ => log::info!("{event:?}"),
                }
            }

            if matches!(game.state().phase, GamePhase::GameOver | GamePhase::Victory) {
                break;
            }
        }

        let state = game.state();
        log::info!(
            "Demo finished: phase {:?}, score {}, lives {}, x {:.0}",
            state.phase,
            state.score,
            state.lives,
            state.player.pos.x
        );
        for (rank, entry) in game.high_scores().iter().enumerate() {
            log::info!("#{:<2} {:<10} {}", rank + 1, entry.name, entry.score);
        }
    }
}
