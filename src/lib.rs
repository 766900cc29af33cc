//! Renders a looping animation of a warped, ring-shaped pattern to a sequence
//! of PPM files. Each pixel is computed independently by [`kernel::shade`].

pub mod frame;
pub mod image;
pub mod kernel;
pub mod pixel;
pub mod ppm;
pub mod screen;
pub mod vector;
