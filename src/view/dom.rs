//! DOM visual tree (wasm32 only)
//!
//! Proxies are `div`s appended to the stage element. Size, centering margins
//! and classes are set once; only `transform` changes afterwards.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use super::{ProxyId, ProxySpec, VisualTree};
use crate::StageError;

/// CSS custom property carrying the tier's accent line width
const ACCENT_LINE_WIDTH_PROPERTY: &str = "--accent-line-width";

fn dom_error(err: JsValue) -> StageError {
    StageError::Dom(format!("{:?}", err))
}

pub struct DomTree {
    document: Document,
    stage: HtmlElement,
    elements: Vec<HtmlElement>,
}

impl DomTree {
    /// Bind to the element with the given id
    pub fn attach(stage_id: &str) -> Result<Self, StageError> {
        let window = web_sys::window().ok_or(StageError::MissingHost("window"))?;
        let document = window
            .document()
            .ok_or(StageError::MissingHost("document"))?;
        let stage = document
            .get_element_by_id(stage_id)
            .ok_or(StageError::MissingHost("stage element"))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| StageError::MissingHost("stage element"))?;

        Ok(Self {
            document,
            stage,
            elements: Vec::new(),
        })
    }
}

impl VisualTree for DomTree {
    fn create_proxy(&mut self, spec: &ProxySpec) -> Result<ProxyId, StageError> {
        let element = self
            .document
            .create_element("div")
            .map_err(dom_error)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| StageError::Dom("div is not an HtmlElement".into()))?;

        let style = element.style();
        let size = spec.size_css();
        let margin = spec.margin_css();
        style.set_property("width", &size).map_err(dom_error)?;
        style.set_property("height", &size).map_err(dom_error)?;
        style.set_property("margin-left", &margin).map_err(dom_error)?;
        style.set_property("margin-top", &margin).map_err(dom_error)?;
        element.set_class_name(&spec.class_list());

        self.stage.append_child(&element).map_err(dom_error)?;

        let id = ProxyId(self.elements.len() as u32);
        self.elements.push(element);
        Ok(id)
    }

    fn set_transform(&mut self, proxy: ProxyId, transform: &str) {
        if let Some(element) = self.elements.get(proxy.0 as usize) {
            let _ = element.style().set_property("transform", transform);
        }
    }

    fn set_accent_line_width(&mut self, px: u32) -> Result<(), StageError> {
        self.stage
            .style()
            .set_property(ACCENT_LINE_WIDTH_PROPERTY, &format!("{}px", px))
            .map_err(dom_error)
    }
}
