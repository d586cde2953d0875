//! HTML and text rendering

pub mod renderer;

pub use renderer::{render_catalog, render_patron_status, render_search};
