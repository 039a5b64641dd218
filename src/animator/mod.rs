pub(crate) mod lifecycle;
pub(crate) mod registry;
pub(crate) mod scheduler;
