//! Music library: the `Track` record and the filesystem scan that produces it.

mod display;
mod model;
mod scan;

pub use display::display_from_fields;
pub use model::Track;
pub use scan::scan;

#[cfg(test)]
mod tests;
