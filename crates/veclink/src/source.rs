//! Built-in buffer sources.
//!
//! Stand-ins for the render collaborators (clock faces, games, telemetry
//! screens) that normally fill the display list. Each source produces the
//! bytes for one logical buffer per loop iteration; the core never looks
//! inside them. The calibration source additionally pins the screen-saver
//! offsets so alignment can be checked against a stationary image.

/// Produces one rendering buffer per loop iteration.
pub trait FrameSource {
    /// Name shown when the mode selector lands on this source.
    fn name(&self) -> &'static str;

    /// Fill `buf` with this iteration's display list bytes.
    fn render(&mut self, buf: &mut Vec<u8>);

    /// Whether screen-saver offsets must stay at (0, 0) while this source
    /// is selected.
    fn pins_offsets(&self) -> bool {
        false
    }
}

/// The default source catalog the mode selector steps through.
pub fn catalog() -> Vec<Box<dyn FrameSource>> {
    vec![
        Box::new(Ramp::default()),
        Box::new(Checker::default()),
        Box::new(Calibration),
        Box::new(Blank),
    ]
}

/// Sawtooth ramp that advances one step per frame.
#[derive(Default)]
pub struct Ramp {
    phase: u8,
}

impl FrameSource for Ramp {
    fn name(&self) -> &'static str {
        "ramp"
    }

    fn render(&mut self, buf: &mut Vec<u8>) {
        self.phase = self.phase.wrapping_add(1);
        buf.extend((0..1024u32).map(|i| (i as u8).wrapping_add(self.phase)));
    }
}

/// Alternating 32-byte blocks, inverted every frame.
#[derive(Default)]
pub struct Checker {
    invert: bool,
}

impl FrameSource for Checker {
    fn name(&self) -> &'static str {
        "checker"
    }

    fn render(&mut self, buf: &mut Vec<u8>) {
        self.invert = !self.invert;
        for i in 0..1024usize {
            let on = (i / 32) % 2 == 0;
            buf.push(if on != self.invert { 0xFF } else { 0x00 });
        }
    }
}

/// Fixed full-screen test pattern for beam alignment.
pub struct Calibration;

impl FrameSource for Calibration {
    fn name(&self) -> &'static str {
        "calibration"
    }

    fn render(&mut self, buf: &mut Vec<u8>) {
        // corner markers then a full-field border
        for corner in [[0u8, 0], [255, 0], [0, 255], [255, 255]] {
            buf.extend_from_slice(&corner);
            buf.extend_from_slice(&[8, 8]);
        }
        buf.extend((0..=255u8).flat_map(|x| [x, 0, x, 255]));
    }

    fn pins_offsets(&self) -> bool {
        true
    }
}

/// Empty display list; exercises the zero-length transfer path.
pub struct Blank;

impl FrameSource for Blank {
    fn name(&self) -> &'static str {
        "blank"
    }

    fn render(&mut self, _buf: &mut Vec<u8>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_a_blank_and_a_calibration_mode() {
        let sources = catalog();
        assert!(sources.iter().any(|s| s.name() == "blank"));
        assert!(sources.iter().any(|s| s.pins_offsets()));
    }

    #[test]
    fn ramp_animates_between_frames() {
        let mut ramp = Ramp::default();
        let mut a = Vec::new();
        let mut b = Vec::new();
        ramp.render(&mut a);
        ramp.render(&mut b);
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
    }

    #[test]
    fn blank_renders_nothing() {
        let mut buf = Vec::new();
        Blank.render(&mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn calibration_is_stable_across_frames() {
        let mut cal = Calibration;
        let mut a = Vec::new();
        let mut b = Vec::new();
        cal.render(&mut a);
        cal.render(&mut b);
        assert_eq!(a, b);
    }
}
