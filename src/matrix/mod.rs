//! Reference implementation, matrix initialization, and result checking.
//!
//! These are the collaborators around the kernel, not the kernel itself:
//! the scalar baseline the tiled results are compared against, the affine
//! fill the benchmark uses for its inputs, and the first-mismatch scan the
//! verification step reports through.

pub mod init;
pub mod reference;
pub mod verify;

pub use init::init_affine;
pub use reference::matmul_reference;
pub use verify::{Mismatch, verify};
