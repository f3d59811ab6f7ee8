pub mod assignments;
pub mod review;

pub use assignments::AssignmentService;
pub use review::ReviewService;
