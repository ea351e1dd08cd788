//! In-memory visual tree
//!
//! Records what a DOM would show. Used by the native binary and by tests.

use super::{ProxyId, ProxySpec, VisualTree};
use crate::StageError;

/// A recorded proxy element
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessProxy {
    pub spec: ProxySpec,
    pub transform: String,
    /// Number of transform writes received
    pub writes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessTree {
    proxies: Vec<HeadlessProxy>,
    accent_line_width: Option<u32>,
}

impl HeadlessTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn proxy(&self, id: ProxyId) -> Option<&HeadlessProxy> {
        self.proxies.get(id.0 as usize)
    }

    pub fn proxies(&self) -> &[HeadlessProxy] {
        &self.proxies
    }

    pub fn accent_line_width(&self) -> Option<u32> {
        self.accent_line_width
    }
}

impl VisualTree for HeadlessTree {
    fn create_proxy(&mut self, spec: &ProxySpec) -> Result<ProxyId, StageError> {
        let id = ProxyId(self.proxies.len() as u32);
        self.proxies.push(HeadlessProxy {
            spec: spec.clone(),
            transform: String::new(),
            writes: 0,
        });
        Ok(id)
    }

    fn set_transform(&mut self, proxy: ProxyId, transform: &str) {
        if let Some(element) = self.proxies.get_mut(proxy.0 as usize) {
            element.transform.clear();
            element.transform.push_str(transform);
            element.writes += 1;
        }
    }

    fn set_accent_line_width(&mut self, px: u32) -> Result<(), StageError> {
        self.accent_line_width = Some(px);
        Ok(())
    }
}
