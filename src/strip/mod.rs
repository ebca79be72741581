// Strip compositing: fixed layout presets, placement math and the pure
// compose() routine that turns captured shots into the final strip.

pub mod compositor;
pub mod layout;
pub mod text;
