pub(crate) mod background;
pub(crate) mod cpu;
pub(crate) mod rects;
pub(crate) mod surface;
