mod local_media;
mod sample_source;
mod source;

pub use local_media::*;
pub use sample_source::*;
pub use source::*;
