mod bucket;
mod buffers;
mod common;
pub(crate) mod hybrid;
pub(crate) mod lsd;
pub(crate) mod msd;
