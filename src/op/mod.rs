mod buffered;
mod chunks;

pub(crate) use buffered::Buffered;
pub(crate) use chunks::Chunks;
