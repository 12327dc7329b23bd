//! Value types flowing through the certificate pipeline.
//!
//! Names are read into [`NameRecord`]s, the base image is held in a
//! [`Template`], and each render produces a [`RenderedCertificate`]. All of
//! them are plain owned values; nothing here is shared mutably.

mod certificate;
mod name;
mod template;

pub use certificate::RenderedCertificate;
pub use name::NameRecord;
pub use template::Template;
