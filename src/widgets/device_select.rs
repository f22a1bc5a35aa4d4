//! The device list.
//!
//! Devices are probed in order, `/dev/mixer0` first. The first device that
//! cannot be opened or identified ends the list; that is how the end of the
//! device table is found, not an error.

use tracing::debug;

use crate::mixer::transport::device_path;
use crate::mixer::{Mixer, MixerTransport};
use crate::renderer::FrameBuffer;

use super::DrawStyle;

/// Draw up to `num_mixers` devices onto `screen`, marking `selected`.
///
/// Returns how many devices were listed.
pub fn draw_mixer_select<T: MixerTransport>(
    screen: &mut FrameBuffer,
    style: &DrawStyle,
    transport: &mut T,
    num_mixers: usize,
    selected: usize,
) -> usize {
    let mut pen = screen.pen();
    pen.clear();
    pen.add_str("Select a mixer device:\n");

    let mut listed = 0;
    for i in 0..num_mixers {
        let path = device_path(i);
        let identity = match transport
            .open(&path)
            .and_then(|handle| transport.query_identity(&handle))
        {
            Ok(identity) => identity,
            Err(err) => {
                debug!(%path, %err, listed, "end of device list");
                break;
            }
        };

        if i == selected {
            style.emphasis.emphasize(&mut pen);
            pen.add_str("[*] ");
        } else {
            pen.add_str("[ ] ");
        }
        pen.add_str(&format!(
            "{path}: {} {} {}\n",
            identity.name, identity.version, identity.config
        ));
        if i == selected {
            style.emphasis.de_emphasize(&mut pen);
        }
        listed += 1;
    }
    listed
}

impl Mixer {
    /// Draw the device list onto the base screen.
    pub fn draw_mixer_select<T: MixerTransport>(
        &mut self,
        transport: &mut T,
        num_mixers: usize,
        selected: usize,
    ) -> usize {
        let style = self.style;
        draw_mixer_select(&mut self.screen, &style, transport, num_mixers, selected)
    }
}
