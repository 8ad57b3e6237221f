//! Form instances, field handles and the form factory.

pub use formwright_forms::*;
