//! Frame-based playback pipeline: window, mapper, compiler, materializer.

pub mod compiler;
pub mod mapper;
pub mod materialize;
pub mod window;
