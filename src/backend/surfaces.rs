// src/backend/surfaces.rs
//! Default context provider: one lazily created context per backend.

use super::{
    BackendError, Canvas2dContext, ContextProvider, GraphicsKey, RenderBackend, Webgl2Context,
};
use crate::config::GraphicsConfig;
use log::{error, info};

pub struct Surfaces {
    settings: GraphicsConfig,
    canvas_2d: Option<Canvas2dContext>,
    webgl2: Option<Webgl2Context>,
}

impl Surfaces {
    pub fn new(settings: GraphicsConfig) -> Self {
        Self {
            settings,
            canvas_2d: None,
            webgl2: None,
        }
    }

    fn is_available(&self, kind: GraphicsKey) -> bool {
        !self.settings.unavailable.contains(&kind)
    }
}

impl ContextProvider for Surfaces {
    fn context(
        &mut self,
        kind: GraphicsKey,
        width: u32,
        height: u32,
    ) -> Result<&mut dyn RenderBackend, BackendError> {
        if !self.is_available(kind) {
            error!("Surfaces: {} context not available", kind);
            return Err(BackendError::ContextUnavailable(kind));
        }

        let backend: &mut dyn RenderBackend = match kind {
            GraphicsKey::Canvas2d => {
                let will_read_frequently = self.settings.canvas_will_read_frequently;
                self.canvas_2d.get_or_insert_with(|| {
                    let context = Canvas2dContext::new(width, height, will_read_frequently);
                    info!(
                        "Surfaces: Created 2d context (willReadFrequently={})",
                        context.will_read_frequently()
                    );
                    context
                })
            }
            GraphicsKey::Webgl2 => {
                let power_preference = self.settings.webgl_power_preference;
                self.webgl2.get_or_insert_with(|| {
                    let context = Webgl2Context::new(width, height, power_preference);
                    info!(
                        "Surfaces: Created webgl2 context (powerPreference={:?})",
                        context.power_preference()
                    );
                    context
                })
            }
        };

        backend.resize(width, height);
        Ok(backend)
    }
}
