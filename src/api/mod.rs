// Thin namespace wrapper for API-layer components
pub mod handlers {
    pub use crate::handlers::*;
}

pub mod request_trace {
    pub use crate::request_trace::*;
}
