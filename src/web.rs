use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use anyhow::Context;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use crate::{
    config::CubeConfig,
    cube::{mount, unmount, MountedCube, SkillsCube},
    fragments::{CodeFragment, LAYER_CLASS},
    lifecycle::{CubeSlot, StartTicket},
    page::{HostSize, Page, SurfaceLayout},
    rendering::Renderer,
    scroll::SectionRect,
};

const CANVAS_CLASS: &str = "skills-cube-canvas";

thread_local! {
    static SLOT: RefCell<CubeSlot<CubeHandle>> = const { RefCell::new(CubeSlot::Idle) };
}

fn js_error(value: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", value)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let document = web::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == "loading" {
        let callback = Closure::once_into_js(move || init_skills_cube());
        document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())?;
    } else {
        init_skills_cube();
    }

    Ok(())
}

/// Mounts the cube if the page has a host for it and no cube is starting or
/// running yet.
#[wasm_bindgen(js_name = initSkillsCube)]
pub fn init_skills_cube() {
    let Some(ticket) = SLOT.with(|slot| slot.borrow_mut().begin()) else {
        log::warn!("Skills cube is already running");
        return;
    };
    let abort = |ticket: &StartTicket| SLOT.with(|slot| slot.borrow_mut().abort(ticket));

    let mut page = match DomPage::new() {
        Ok(page) => page,
        Err(e) => {
            log::error!("Skills cube unavailable: {:?}", e);
            abort(&ticket);
            return;
        }
    };

    let mounted = match mount(&mut page, CubeConfig::default(), &mut rand::thread_rng()) {
        Ok(Some(mounted)) => mounted,
        Ok(None) => {
            abort(&ticket);
            return;
        }
        Err(e) => {
            log::error!("Failed to mount skills cube: {:?}", e);
            abort(&ticket);
            return;
        }
    };

    spawn_local(async move {
        let MountedCube {
            cube,
            surface: canvas,
            ..
        } = mounted;

        let size = cube.layout.physical_size();
        let target = wgpu::SurfaceTarget::Canvas(canvas.clone());
        let renderer = Renderer::new(target, size, &cube).await;

        if ticket.is_cancelled() {
            log::info!("Skills cube was disposed while starting");
            unmount(&mut page, canvas);
            return;
        }

        let renderer = match renderer {
            Ok(renderer) => renderer,
            Err(e) => {
                // Decorative only: leave the page as it was.
                log::error!("Failed to start skills cube: {:?}", e);
                unmount(&mut page, canvas);
                abort(&ticket);
                return;
            }
        };

        let handle = CubeHandle::new(page, cube, canvas, renderer);
        if let Err(e) = handle.attach() {
            log::error!("Failed to start skills cube: {:?}", e);
            handle.dispose();
            abort(&ticket);
            return;
        }

        if let Err(handle) = SLOT.with(|slot| slot.borrow_mut().finish(&ticket, handle)) {
            handle.dispose();
        }
    });
}

/// Stops the frame loop, removes listeners and DOM nodes, and frees the GPU
/// resources of the running cube. A cube that is still starting is cancelled.
#[wasm_bindgen(js_name = disposeSkillsCube)]
pub fn dispose_skills_cube() {
    if let Some(handle) = SLOT.with(|slot| slot.borrow_mut().dispose()) {
        handle.dispose();
    }
}

fn element_size(document: &web::Document, id: &str) -> Option<HostSize> {
    document.get_element_by_id(id).map(|element| HostSize {
        width: element.client_width() as f64,
        height: element.client_height() as f64,
    })
}

fn section_rect(document: &web::Document, id: &str) -> Option<SectionRect> {
    let element = document.get_element_by_id(id)?;
    let rect = element.get_bounding_client_rect();
    let height = element
        .dyn_ref::<web::HtmlElement>()
        .map(|html| html.offset_height() as f64)
        .unwrap_or_else(|| rect.height());

    Some(SectionRect {
        top: rect.top(),
        height,
    })
}

fn viewport_height(window: &web::Window) -> f64 {
    window
        .inner_height()
        .ok()
        .and_then(|height| height.as_f64())
        .unwrap_or(0.0)
}

fn build_fragment_layer(
    document: &web::Document,
    fragments: &[CodeFragment],
) -> anyhow::Result<web::Element> {
    let layer = document.create_element("div").map_err(js_error)?;
    layer.set_class_name(LAYER_CLASS);

    for fragment in fragments {
        let span = document.create_element("span").map_err(js_error)?;
        span.set_class_name(fragment.class_name());
        span.set_text_content(Some(fragment.text));
        span.set_attribute("style", &fragment.css_text()).map_err(js_error)?;
        layer.append_child(&span).map_err(js_error)?;
    }

    Ok(layer)
}

struct DomPage {
    window: web::Window,
    document: web::Document,
    fragment_layer: Option<web::Element>,
    fragment_frame: Option<i32>,
}

impl DomPage {
    fn new() -> anyhow::Result<Self> {
        let window = web::window().context("no window")?;
        let document = window.document().context("no document")?;

        Ok(Self {
            window,
            document,
            fragment_layer: None,
            fragment_frame: None,
        })
    }
}

impl Page for DomPage {
    type Surface = web::HtmlCanvasElement;

    fn element_size(&self, id: &str) -> Option<HostSize> {
        element_size(&self.document, id)
    }

    fn section_rect(&self, id: &str) -> Option<SectionRect> {
        section_rect(&self.document, id)
    }

    fn viewport_height(&self) -> f64 {
        viewport_height(&self.window)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn has_surface(&self, host_id: &str) -> bool {
        self.document
            .get_element_by_id(host_id)
            .and_then(|host| {
                host.query_selector(&format!("canvas.{CANVAS_CLASS}"))
                    .ok()
                    .flatten()
            })
            .is_some()
    }

    fn attach_surface(
        &mut self,
        host_id: &str,
        layout: &SurfaceLayout,
    ) -> anyhow::Result<web::HtmlCanvasElement> {
        let host = self
            .document
            .get_element_by_id(host_id)
            .with_context(|| format!("#{host_id} disappeared while mounting"))?;

        let canvas = self
            .document
            .create_element("canvas")
            .map_err(js_error)?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|_| anyhow::anyhow!("created element is not a canvas"))?;

        let (width, height) = layout.physical_size();
        canvas.set_width(width);
        canvas.set_height(height);
        canvas.set_class_name(CANVAS_CLASS);
        canvas
            .set_attribute("style", &layout.css_text())
            .map_err(js_error)?;

        host.append_child(&canvas).map_err(js_error)?;

        Ok(canvas)
    }

    fn attach_fragments(
        &mut self,
        selector: &str,
        fragments: Vec<CodeFragment>,
    ) -> anyhow::Result<bool> {
        let Some(host) = self.document.query_selector(selector).map_err(js_error)? else {
            return Ok(false);
        };

        let layer = build_fragment_layer(&self.document, &fragments)?;

        // Wait a frame so the fragments don't compete with first paint.
        let pending = layer.clone();
        let append = Closure::once_into_js(move || {
            if let Err(e) = host.append_child(&pending) {
                log::warn!("Failed to add code fragments: {:?}", e);
            }
        });
        let frame = self
            .window
            .request_animation_frame(append.unchecked_ref())
            .map_err(js_error)?;

        self.fragment_layer = Some(layer);
        self.fragment_frame = Some(frame);

        Ok(true)
    }

    fn remove_surface(&mut self, canvas: web::HtmlCanvasElement) {
        canvas.remove();
    }

    fn remove_fragments(&mut self) {
        if let Some(frame) = self.fragment_frame.take() {
            self.window.cancel_animation_frame(frame).ok();
        }
        if let Some(layer) = self.fragment_layer.take() {
            layer.remove();
        }
    }
}

struct LoopState {
    cube: SkillsCube,
    renderer: Renderer,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Everything a running cube holds on to. Dropping listeners here is what
/// detaches them, so the handle has to outlive the page session or be
/// disposed explicitly.
struct CubeHandle {
    window: web::Window,
    page: DomPage,
    canvas: web::HtmlCanvasElement,
    _state: Rc<RefCell<LoopState>>,
    frame: FrameCallback,
    frame_request: Rc<Cell<Option<i32>>>,
    on_scroll: Closure<dyn FnMut()>,
    on_resize: Closure<dyn FnMut()>,
}

impl CubeHandle {
    /// Wires the frame and listener callbacks without installing them.
    fn new(
        page: DomPage,
        cube: SkillsCube,
        canvas: web::HtmlCanvasElement,
        renderer: Renderer,
    ) -> Self {
        let window = page.window.clone();
        let document = page.document.clone();
        let config = cube.config.clone();
        let scroll = cube.scroll_rotation();
        let state = Rc::new(RefCell::new(LoopState { cube, renderer }));

        let on_scroll = {
            let window = window.clone();
            let document = document.clone();
            let section_id = config.section_id.clone();
            Closure::<dyn FnMut()>::new(move || {
                scroll.update(
                    section_rect(&document, &section_id),
                    viewport_height(&window),
                );
            })
        };

        let on_resize = {
            let window = window.clone();
            let document = document.clone();
            let canvas = canvas.clone();
            let state = state.clone();
            let host_id = config.host_id.clone();
            Closure::<dyn FnMut()>::new(move || {
                let Some(host) = element_size(&document, &host_id) else {
                    return;
                };

                let mut state = state.borrow_mut();
                let size = state.cube.resize(host, window.device_pixel_ratio());
                canvas.set_width(size.0);
                canvas.set_height(size.1);
                state.renderer.resize(size);
            })
        };

        let start_ms = window
            .performance()
            .map(|performance| performance.now())
            .unwrap_or(0.0);

        let frame: FrameCallback = Rc::new(RefCell::new(None));
        let frame_request = Rc::new(Cell::new(None));

        {
            let window = window.clone();
            let state = state.clone();
            let next_frame = frame.clone();
            let frame_request = frame_request.clone();

            *frame.borrow_mut() = Some(Closure::new(move |now: f64| {
                let time = ((now - start_ms) / 1000.0).max(0.0) as f32;

                {
                    let mut state = state.borrow_mut();
                    let LoopState { cube, renderer } = &mut *state;
                    cube.advance(time);

                    match renderer.render(cube) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            renderer.reconfigure();
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Out of memory, stopping skills cube");
                            frame_request.set(None);
                            return;
                        }
                        Err(wgpu::SurfaceError::Timeout) => {
                            log::warn!("Timeout");
                        }
                        Err(other) => {
                            log::error!("Unexpected error: {:?}", other);
                        }
                    }
                }

                if let Some(callback) = next_frame.borrow().as_ref() {
                    let request = window
                        .request_animation_frame(callback.as_ref().unchecked_ref())
                        .ok();
                    frame_request.set(request);
                }
            }));
        }

        Self {
            window,
            page,
            canvas,
            _state: state,
            frame,
            frame_request,
            on_scroll,
            on_resize,
        }
    }

    /// Registers the passive listeners and requests the first frame.
    fn attach(&self) -> anyhow::Result<()> {
        let listener_options = web::AddEventListenerOptions::new();
        listener_options.set_passive(true);

        for (event, listener) in [("scroll", &self.on_scroll), ("resize", &self.on_resize)] {
            self.window
                .add_event_listener_with_callback_and_add_event_listener_options(
                    event,
                    listener.as_ref().unchecked_ref(),
                    &listener_options,
                )
                .map_err(js_error)?;
        }

        if let Some(callback) = self.frame.borrow().as_ref() {
            let request = self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .map_err(js_error)?;
            self.frame_request.set(Some(request));
        }

        Ok(())
    }

    fn dispose(mut self) {
        if let Some(request) = self.frame_request.take() {
            self.window.cancel_animation_frame(request).ok();
        }
        // The frame closure owns a handle to its own slot; clearing the slot
        // breaks that cycle.
        self.frame.borrow_mut().take();

        for (event, listener) in [("scroll", &self.on_scroll), ("resize", &self.on_resize)] {
            self.window
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
                .ok();
        }

        unmount(&mut self.page, self.canvas);

        log::info!("Disposed skills cube");
    }
}
