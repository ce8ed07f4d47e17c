// Domain-layer modules: the enrichment engine and its shared models/errors
pub mod extractors {
    pub use crate::extractors::*;
}

pub mod validators {
    pub use crate::validators::*;
}

pub mod scorers {
    pub use crate::scorers::*;
}

pub mod enrichment {
    pub use crate::enrichment::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
