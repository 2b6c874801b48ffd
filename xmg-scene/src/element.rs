//! XMG scene elements.

use crate::{Archive, Config, RenderTarget, SceneError};
use tracing::{debug, info};
use xmg_codec::{Diagnostic, XmgDecoder};
use xmg_common::Point;
use xmg_pixelbuffer::{Color, ManagedPixelBuffer};

/// A decoded XMG image placed at a fixed screen position.
#[derive(Debug, Clone)]
pub struct XmgElement {
    name: String,
    surface: ManagedPixelBuffer,
    position: Point,
    diagnostics: Vec<Diagnostic>,
}

impl XmgElement {
    /// Load and decode the archive member `name`.
    ///
    /// # Errors
    ///
    /// [`SceneError::NotFound`] if the archive has no such member, in which
    /// case nothing is decoded. [`SceneError::Decode`] if the member is not a
    /// valid XMG stream.
    pub async fn load<A: Archive>(
        archive: &A,
        name: &str,
        position: Point,
        decoder: &XmgDecoder,
    ) -> Result<Self, SceneError> {
        let data = archive
            .read_member(name)
            .await
            .map_err(SceneError::from_archive)?;

        let image = decoder.decode(data).map_err(|source| SceneError::Decode {
            name: name.to_string(),
            source,
        })?;

        debug!(
            "Loaded {} ({}x{}) at {:?}",
            name, image.header.width, image.header.height, position
        );

        Ok(Self {
            name: name.to_string(),
            diagnostics: image.diagnostics,
            surface: image.pixels,
            position,
        })
    }

    /// Draw the surface at the element position.
    pub fn render<T: RenderTarget + ?Sized>(&self, target: &mut T) -> Result<(), SceneError> {
        target.draw_surface(&self.surface, self.position)?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surface(&self) -> &ManagedPixelBuffer {
        &self.surface
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Header diagnostics reported while decoding.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Elements drawn in order onto a canvas.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    elements: Vec<XmgElement>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every element named in `config` from `archive`.
    ///
    /// # Errors
    ///
    /// Fails on the first element that cannot be loaded.
    pub async fn load<A: Archive>(config: &Config, archive: &A) -> Result<Self, SceneError> {
        config.validate()?;
        let decoder = XmgDecoder::with_limits(config.limits);

        let mut scene = Self::new();
        for element in &config.elements {
            scene.push(XmgElement::load(archive, &element.name, element.position(), &decoder).await?);
        }
        info!("Loaded scene with {} elements", scene.len());
        Ok(scene)
    }

    /// Add an element on top of the existing ones.
    pub fn push(&mut self, element: XmgElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[XmgElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Render every element, back to front.
    pub fn render<T: RenderTarget + ?Sized>(&self, target: &mut T) -> Result<(), SceneError> {
        for element in &self.elements {
            element.render(target)?;
        }
        Ok(())
    }

    /// Render onto a fresh canvas filled with `background`.
    pub fn render_to_canvas(
        &self,
        width: u32,
        height: u32,
        background: Color,
    ) -> Result<ManagedPixelBuffer, SceneError> {
        let mut canvas = ManagedPixelBuffer::filled(width, height, background);
        self.render(&mut canvas)?;
        Ok(canvas)
    }
}
