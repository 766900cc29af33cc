//! The per-pixel kernel.
//!
//! A pixel is evaluated in four stages:
//!
//! 1. [`normalize`] maps the pixel to a centred, aspect-corrected position `p`
//!    whose vertical extent spans `[-1, 1]`.
//! 2. [`warp_scale`] derives a ring-shaped intensity from `dot(p, p)`, peaking on
//!    the circle `dot(p, p) == 0.7`. It seeds the dynamic state `v = p * l`.
//! 3. [`Orbit::step`] runs [`ITERATIONS`] times, folding `v` into a four-lane
//!    accumulator and feeding a cosine of `v` back into itself.
//! 4. [`tone_map`] turns the accumulator into a bounded colour, which
//!    [`quantize`] converts to 8-bit channels.
//!
//! Every function here is pure: the result of a pixel depends only on its own
//! coordinates, the frame time and the resolution.

use crate::{pixel::Rgb, screen, vector::Vec2, vector::Vec4};

/// Recurrence steps per pixel.
pub const ITERATIONS: u32 = 8;

/// Floor added to the accumulator before it is used as a divisor.
pub const EPSILON: f32 = 1e-6;

/// Radius (squared) of the ring where the warp is strongest.
const RING: f32 = 0.7;

/// Constant drift added to the state every step.
const DRIFT: f32 = 0.7;

/// Per-channel weight of `p.y` in the exposure; the last lane is discarded.
const CHANNEL_SLOPE: Vec4 = Vec4::new(-1.0, 1.0, 2.0, 0.0);

/// Pixel coordinates to the centred space: `(FC * 2 - r) / r.y`.
///
/// No half-pixel offset is applied; `(0, 0)` is the corner of the top-left pixel.
pub fn normalize(x: u32, y: u32, size: screen::Size) -> Vec2 {
    let fc = Vec2::new(x as f32, y as f32);
    let r = size.extent();
    (fc * 2.0 - r) / r.y
}

/// `4 - 4 * |0.7 - dot(p, p)|`. Negative away from the ring; not clamped.
pub fn warp_scale(p: Vec2) -> f32 {
    let mut l = Vec2::ZERO;
    l.accumulate(4.0 - 4.0 * (RING - p.dot(p)).abs()).x
}

/// State carried through the recurrence for one pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
    /// Dynamic state `v`.
    pub state: Vec2,
    /// Accumulator `o`. Every lane is non-negative.
    pub colour: Vec4,
}

impl Orbit {
    pub fn new(p: Vec2, warp: f32) -> Self {
        Self {
            state: p * warp,
            colour: Vec4::ZERO,
        }
    }

    /// Runs one step of the recurrence with step index `index` (`0.0`, `1.0`, ...).
    ///
    /// The feedback term is `cos(v.yx * i + (0, i) + t) / i`. At `i == 0` the
    /// division is skipped and the cosine is added at full weight.
    pub fn step(&mut self, index: f32, time: f32) {
        let v = self.state;

        let term = v.broadcast4().sin() + 1.0;
        let distance = (v.x - v.y).abs();
        self.colour += term * distance;

        let offset = Vec2::new(0.0, index);
        let feedback = (v.swap() * index + offset + time).cos();
        if index == 0.0 {
            self.state += feedback + DRIFT;
        } else {
            self.state += feedback / index + DRIFT;
        }
    }

    /// Runs all [`ITERATIONS`] steps.
    pub fn run(mut self, time: f32) -> Self {
        for step in 0..ITERATIONS {
            self.step(step as f32, time);
        }
        self
    }
}

/// `tanh(5 * exp((l - 4) - p.y * k) / (o + EPSILON))` with `k = (-1, 1, 2, 0)`.
///
/// Lanes `x`, `y` and `z` are red, green and blue; `w` is computed and ignored.
pub fn tone_map(warp: f32, p: Vec2, colour: Vec4) -> Vec4 {
    let exposure = ((warp - 4.0) - p.y * CHANNEL_SLOPE).exp();
    (5.0 * (exposure / (colour + EPSILON))).tanh()
}

/// Clamp to `[0, 1]`, scale to `[0, 255]` and truncate.
pub fn quantize(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0) as u8
}

/// The unquantized colour at normalized position `p`.
pub fn colour(p: Vec2, time: f32) -> Vec4 {
    let warp = warp_scale(p);
    let orbit = Orbit::new(p, warp).run(time);
    tone_map(warp, p, orbit.colour)
}

/// The output pixel at `(x, y)` for a frame at `time` seconds.
pub fn shade(x: u32, y: u32, time: f32, size: screen::Size) -> Rgb {
    let [red, green, blue, _] = colour(normalize(x, y, size), time).to_array();
    Rgb::new(quantize(red), quantize(green), quantize(blue))
}
