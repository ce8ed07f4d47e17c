//! External collaborators.

pub mod generator {
    pub use crate::generator::*;
}
