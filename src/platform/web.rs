//! Browser glue
//!
//! DOM HUD, ad SDK access through page globals, input listeners and the
//! `requestAnimationFrame` loop.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement, KeyboardEvent, TouchEvent,
    Window,
};

use super::input::{KeyAction, action_for_key, step_for_touch};
use super::time::FrameClock;
use crate::ads::{AdAdapter, BridgeError, GlobalProbe, SdkBridge};
use crate::renderer::SceneRenderer;
use crate::scene::SceneGraph;
use crate::settings::Settings;
use crate::sim::Game;
use crate::tuning::Tuning;
use crate::ui::Hud;

fn js_err(e: JsValue) -> BridgeError {
    BridgeError::Js(format!("{:?}", e))
}

// ============================================================================
// HUD
// ============================================================================

/// Score text plus the start and game-over panels
pub struct DomHud {
    score: Option<HtmlElement>,
    start_screen: Option<HtmlElement>,
    game_over: Option<HtmlElement>,
}

impl DomHud {
    pub fn new(document: &Document) -> Self {
        let find = |id: &str| {
            let el = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            if el.is_none() {
                log::warn!("HUD element #{} not found", id);
            }
            el
        };
        Self {
            score: find("score"),
            start_screen: find("start-screen"),
            game_over: find("game-over"),
        }
    }

    fn show(el: &Option<HtmlElement>, visible: bool) {
        if let Some(el) = el {
            let display = if visible { "flex" } else { "none" };
            let _ = el.style().set_property("display", display);
        }
    }
}

impl Hud for DomHud {
    fn set_score(&mut self, score: u32) {
        if let Some(el) = &self.score {
            el.set_text_content(Some(&score.to_string()));
        }
    }

    fn set_start_visible(&mut self, visible: bool) {
        Self::show(&self.start_screen, visible);
    }

    fn set_game_over_visible(&mut self, visible: bool) {
        Self::show(&self.game_over, visible);
    }
}

// ============================================================================
// AD SDK ACCESS
// ============================================================================

/// Looks up ad SDK globals on `window`
pub struct WindowProbe {
    window: Window,
}

impl WindowProbe {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl GlobalProbe for WindowProbe {
    fn has_global(&self, name: &str) -> Result<bool, BridgeError> {
        let value = js_sys::Reflect::get(&self.window, &JsValue::from_str(name)).map_err(js_err)?;
        Ok(!value.is_undefined())
    }
}

/// Calls ad SDK methods through `window.<global>`
pub struct JsBridge {
    window: Window,
}

impl JsBridge {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn global(&self, name: &str) -> Result<JsValue, BridgeError> {
        let value = js_sys::Reflect::get(&self.window, &JsValue::from_str(name)).map_err(js_err)?;
        if value.is_undefined() || value.is_null() {
            return Err(BridgeError::MissingGlobal(name.to_string()));
        }
        Ok(value)
    }

    fn method(
        &self,
        target: &JsValue,
        global: &str,
        method: &str,
    ) -> Result<js_sys::Function, BridgeError> {
        js_sys::Reflect::get(target, &JsValue::from_str(method))
            .map_err(js_err)?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| BridgeError::MissingMethod {
                global: global.to_string(),
                method: method.to_string(),
            })
    }
}

impl SdkBridge for JsBridge {
    fn invoke(
        &self,
        global: &str,
        method: &str,
        args: &[&str],
    ) -> Result<Option<String>, BridgeError> {
        let target = self.global(global)?;
        let function = self.method(&target, global, method)?;
        let js_args: js_sys::Array = args.iter().map(|a| JsValue::from_str(a)).collect();
        let result = function.apply(&target, &js_args).map_err(js_err)?;
        Ok(result.as_string())
    }

    fn subscribe(
        &self,
        global: &str,
        event: &str,
        callback: Box<dyn FnMut()>,
    ) -> Result<(), BridgeError> {
        let target = self.global(global)?;
        let add_listener = self.method(&target, global, "addEventListener")?;
        let closure = Closure::wrap(callback);
        add_listener
            .call2(&target, &JsValue::from_str(event), closure.as_ref())
            .map_err(js_err)?;
        closure.forget();
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<(), BridgeError> {
        self.window
            .open_with_url_and_target(url, "_blank")
            .map(drop)
            .map_err(js_err)
    }
}

// ============================================================================
// FRAME LOOP
// ============================================================================

/// Game plus presentation state shared by the frame loop and DOM callbacks
struct App {
    game: Game,
    renderer: Option<SceneRenderer>,
    clock: FrameClock,
}

impl App {
    fn render(&mut self) {
        let App { game, renderer, .. } = self;
        if let Some(renderer) = renderer {
            match renderer.render(game.scene(), game.camera()) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    renderer.resize(renderer.size.0, renderer.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }
}

/// Canvas backing-store size in device pixels
fn canvas_size(window: &Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
    let dpr = window.device_pixel_ratio();
    let width = (canvas.client_width() as f64 * dpr) as u32;
    let height = (canvas.client_height() as f64 * dpr) as u32;
    (width.max(1), height.max(1))
}

pub async fn run() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

    log::info!("Neon Runner starting...");

    let window = web_sys::window().expect("no window");
    let document = window.document().expect("no document");

    let canvas: HtmlCanvasElement = document
        .get_element_by_id("canvas")
        .expect("no canvas")
        .dyn_into()
        .expect("not a canvas");

    let (width, height) = canvas_size(&window, &canvas);
    canvas.set_width(width);
    canvas.set_height(height);

    let tuning = Tuning::load();
    let settings = Settings::load();
    let ads = AdAdapter::new(
        &WindowProbe::new(window.clone()),
        Box::new(JsBridge::new(window.clone())),
        tuning.ads.store_url.clone(),
    );

    let seed = js_sys::Date::now() as u64;
    let game = Game::new(
        seed,
        tuning,
        settings,
        SceneGraph::new(),
        Box::new(DomHud::new(&document)),
        Box::new(ads),
    );

    // Initialize WebGPU
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU,
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

    let renderer = SceneRenderer::new(surface, &adapter, width, height).await;

    let app = Rc::new(RefCell::new(App {
        game,
        renderer: Some(renderer),
        clock: FrameClock::new(),
    }));

    setup_buttons(&document, app.clone());
    create_install_button(&document, app.clone());
    setup_input_handlers(&window, app.clone());
    setup_lifecycle_handlers(&window, &canvas, app.clone());

    request_animation_frame(app);

    log::info!("Neon Runner running!");
}

fn request_animation_frame(app: Rc<RefCell<App>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        game_loop(app, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(app: Rc<RefCell<App>>, time: f64) {
    {
        let mut a = app.borrow_mut();
        if !a.game.is_running() {
            log::info!("Frame loop stopped");
            return;
        }

        let dt = a.clock.frame(time);
        a.game.tick(dt, time / 1000.0);
        a.render();
    }

    request_animation_frame(app);
}

// ============================================================================
// DOM WIRING
// ============================================================================

fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
    for id in ["start-btn", "restart-btn"] {
        if let Some(btn) = document.get_element_by_id(id) {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().game.start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("Button #{} not found", id);
        }
    }
}

/// Call-to-action pinned to the bottom of the UI layer
fn create_install_button(document: &Document, app: Rc<RefCell<App>>) {
    let Some(layer) = document.get_element_by_id("ui-layer") else {
        log::warn!("#ui-layer not found; no install button");
        return;
    };
    let Some(btn) = document
        .create_element("button")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
    else {
        return;
    };

    btn.set_text_content(Some("INSTALL NOW"));
    let style = btn.style();
    for (property, value) in [
        ("position", "absolute"),
        ("bottom", "20px"),
        ("left", "50%"),
        ("transform", "translateX(-50%)"),
        ("background", "#0f0"),
        ("color", "#000"),
        ("font-size", "1.2rem"),
        ("font-weight", "bold"),
        ("border", "none"),
        ("padding", "10px 20px"),
        ("cursor", "pointer"),
        ("z-index", "1000"),
        ("box-shadow", "0 0 10px #0f0"),
    ] {
        let _ = style.set_property(property, value);
    }

    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
        app.borrow_mut().game.request_install();
    });
    let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();

    let _ = layer.append_child(&btn);
}

fn setup_input_handlers(window: &Window, app: Rc<RefCell<App>>) {
    // Keyboard
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.repeat() {
                return;
            }
            let mut a = app.borrow_mut();
            match action_for_key(&event.code()) {
                Some(KeyAction::Step(step)) => a.game.push_input(step),
                Some(KeyAction::CycleQuality) => {
                    a.game.cycle_quality();
                }
                None => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Touch: left or right half of the screen
    {
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            if let Some(touch) = event.touches().get(0) {
                let width = window_clone
                    .inner_width()
                    .ok()
                    .and_then(|w| w.as_f64())
                    .unwrap_or(0.0);
                let step = step_for_touch(touch.client_x() as f32, width as f32);
                app.borrow_mut().game.push_input(step);
            }
        });
        let _ =
            window.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn setup_lifecycle_handlers(window: &Window, canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
    // Resize keeps the backing store at device resolution
    {
        let app = app.clone();
        let window_clone = window.clone();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = canvas_size(&window_clone, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(renderer) = app.borrow_mut().renderer.as_mut() {
                renderer.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Returning to a hidden tab starts timing afresh
    if let Some(document) = window.document() {
        let app = app.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if !doc.hidden() {
                app.borrow_mut().clock.reset();
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Page teardown ends the frame loop
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().game.stop();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
