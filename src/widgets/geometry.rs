//! Surface allocation and control layout.
//!
//! Every class gets a surface as wide as the terminal and tall enough for
//! [`LayoutConfig::class_capacity`] controls; controls are stacked in order
//! from row 0, each taking [`ControlDescriptor::widget_height`] rows. The
//! layout depends only on the tree, so a resize recomputes the same offsets
//! and only the widths change.
//!
//! [`ControlDescriptor::widget_height`]: crate::mixer::ControlDescriptor::widget_height

use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::mixer::{Mixer, MixerClass};
use crate::renderer::FrameBuffer;

/// Rows allocated for a class surface whose controls use `used` rows.
///
/// Sized for the class capacity, and never smaller than what the controls
/// actually need (a class of many-channel levels can outgrow the slots).
pub fn surface_rows(layout: &LayoutConfig, used: u16) -> u16 {
    LayoutConfig::SLOT_ROWS
        .saturating_mul(layout.class_capacity)
        .max(used)
}

/// Assign heights and sequential offsets to a class's controls.
fn layout_class(class: &mut MixerClass) {
    class.height = 0;
    for control in &mut class.controls {
        control.height = control.descriptor.widget_height();
        control.widget_y = class.height;
        class.height = class.height.saturating_add(control.height);
    }
}

impl Mixer {
    /// Allocate every surface for a `width` x `height` terminal and lay out
    /// all controls.
    pub fn create_widgets(&mut self, width: u16, height: u16) -> Result<()> {
        self.header = FrameBuffer::try_new(width, LayoutConfig::HEADER_ROWS)?;
        self.classbar = FrameBuffer::try_new(width, LayoutConfig::CLASSBAR_ROWS)?;
        self.screen = FrameBuffer::try_new(width, height)?;

        for class in &mut self.classes {
            layout_class(class);
            let rows = surface_rows(&self.layout, class.height);
            class.surface = FrameBuffer::try_new(width, rows)?;
            debug!(class = %class.name, controls = class.controls.len(), used = class.height, rows, "created class surface");
        }
        Ok(())
    }

    /// Rebuild all geometry after the terminal changed size.
    ///
    /// Surface content is discarded; the caller redraws before presenting.
    /// Selection, scroll offsets and set/channel cursors are kept.
    pub fn resize_widgets(&mut self, width: u16, height: u16) -> Result<()> {
        self.header.try_resize(width, LayoutConfig::HEADER_ROWS)?;
        self.classbar.try_resize(width, LayoutConfig::CLASSBAR_ROWS)?;
        self.screen.try_resize(width, height)?;

        for class in &mut self.classes {
            layout_class(class);
            let rows = surface_rows(&self.layout, class.height);
            class.surface.try_resize(width, rows)?;
        }
        debug!(width, height, classes = self.classes.len(), "resized widgets");
        Ok(())
    }
}
