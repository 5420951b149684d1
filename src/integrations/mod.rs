//! External service integrations.

pub mod viacep_client {
    pub use crate::viacep_client::*;
}

pub mod pipeline {
    pub use crate::pipeline::*;
}

pub mod cache_validator {
    pub use crate::cache_validator::*;
}
