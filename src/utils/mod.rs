pub mod variant;

pub use variant::{assign_variants, late_variant, validate_variants_count};
