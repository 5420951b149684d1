// Domain-layer modules and shared errors/models
pub mod address_service {
    pub use crate::address_service::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}

pub mod config {
    pub use crate::config::*;
}
