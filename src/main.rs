//! Blockfall entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_stage {
    use std::cell::RefCell;
    use std::rc::Rc;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{MouseEvent, TouchEvent};

    use blockfall::consts::SIM_DT;
    use blockfall::physics::RapierWorld;
    use blockfall::view::DomTree;
    use blockfall::{Settings, Stage, Viewport};

    /// Id of the element proxies are appended to
    const STAGE_ELEMENT_ID: &str = "stage";

    /// Stage plus frame timing
    struct Host {
        stage: Stage<RapierWorld, DomTree>,
        last_time: f64,
    }

    fn current_viewport() -> Viewport {
        let window = web_sys::window().unwrap();
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(width as u32, height as u32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("👋 Welcome to the interactive physics simulation!");

        let settings = Settings::load();
        let seed = settings
            .seed
            .unwrap_or_else(|| js_sys::Date::now() as u64);
        let ceiling_delay_ms = settings.ceiling_delay_ms;

        let tree = DomTree::attach(STAGE_ELEMENT_ID).expect("Failed to attach to stage element");
        let mut stage = Stage::new(RapierWorld::new(settings.gravity), tree, settings);

        let mut rng = Pcg32::seed_from_u64(seed);
        if let Err(err) = stage.build(current_viewport(), &mut rng) {
            log::error!("Scene build failed: {}", err);
            panic!("Scene build failed: {}", err);
        }
        log::info!("Stage built with seed: {}", seed);

        let host = Rc::new(RefCell::new(Host {
            stage,
            last_time: 0.0,
        }));

        setup_pointer_handlers(host.clone());
        setup_resize_handlers(host.clone());
        schedule_ceiling(host.clone(), ceiling_delay_ms);

        request_animation_frame(host);

        log::info!("Blockfall running!");
    }

    fn setup_pointer_handlers(host: Rc<RefCell<Host>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Mouse move - page coordinates, same frame as the stage
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                host.borrow_mut()
                    .stage
                    .pointer_moved(event.page_x() as f32, event.page_y() as f32);
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down - grab
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                host.borrow_mut()
                    .stage
                    .pointer_pressed(event.page_x() as f32, event.page_y() as f32);
            });
            let _ = document
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    host.borrow_mut()
                        .stage
                        .pointer_moved(touch.page_x() as f32, touch.page_y() as f32);
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - grab
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    host.borrow_mut()
                        .stage
                        .pointer_pressed(touch.page_x() as f32, touch.page_y() as f32);
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up / touch end - release
        for event_name in ["mouseup", "touchend", "touchcancel"] {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                host.borrow_mut().stage.pointer_released();
            });
            let _ = document
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handlers(host: Rc<RefCell<Host>>) {
        let window = web_sys::window().unwrap();

        for event_name in ["resize", "orientationchange"] {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Err(err) = host.borrow_mut().stage.re_arrange(current_viewport()) {
                    log::error!("Re-arrange failed: {}", err);
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Close the ceiling once, `delay_ms` after the scene was built
    fn schedule_ceiling(host: Rc<RefCell<Host>>, delay_ms: u32) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move || {
            if let Err(err) = host.borrow_mut().stage.close_ceiling() {
                log::error!("Closing ceiling failed: {}", err);
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms as i32,
        );
        closure.forget();
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();

            let dt = if h.last_time > 0.0 {
                ((time - h.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            h.last_time = time;

            if let Err(err) = h.stage.advance(dt) {
                log::error!("Step failed: {}", err);
            }
        }

        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_stage::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Blockfall (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    if let Err(err) = run_headless() {
        log::error!("Headless run failed: {}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulate ten seconds on a fixed viewport and report what the page would show
#[cfg(not(target_arch = "wasm32"))]
fn run_headless() -> Result<(), blockfall::StageError> {
    use blockfall::consts::SIM_DT;
    use blockfall::physics::RapierWorld;
    use blockfall::view::HeadlessTree;
    use blockfall::{Settings, Stage, Viewport};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const SIMULATED_SECS: f64 = 10.0;

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or(0x5eed);

    let mut stage = Stage::new(RapierWorld::new(settings.gravity), HeadlessTree::new(), settings);
    let mut rng = Pcg32::seed_from_u64(seed);
    stage.build(Viewport::new(1280, 800), &mut rng)?;

    while stage.sim_time() < SIMULATED_SECS {
        stage.advance(SIM_DT)?;
    }

    if let Some(scene) = stage.scene() {
        let tier = scene.tier();
        println!(
            "Tier: unit {}px, accent {}px, ratio {}",
            tier.unit, tier.line_width, tier.ratio
        );
        println!("Bodies: {}", scene.pairs().len());
        println!("Ceiling closed: {}", scene.ceiling_installed());
    }
    println!("Steps: {}", stage.steps());
    if let Some(proxy) = stage.tree().proxies().first() {
        println!("First proxy: {} -> {}", proxy.spec.class_list(), proxy.transform);
    }
    Ok(())
}
