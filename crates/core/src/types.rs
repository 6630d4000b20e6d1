//! Domain types shared by every buildenv crate.
//!
//! - **`variables`**: the declarative, three-scope variable model as parsed
//!   from a variables file
//! - **`mount`**: secret-store mount metadata and KV engine versions
//! - **`output`**: the ordered, commented result of a resolution run

pub mod mount;
pub mod output;
pub mod variables;

pub use mount::*;
pub use output::*;
pub use variables::*;
