//! 预导入模块，方便使用

pub use super::assignment_variants::{
    ActiveModel as AssignmentVariantActiveModel, Entity as AssignmentVariants,
    Model as AssignmentVariantModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::group_members::{
    ActiveModel as GroupMemberActiveModel, Entity as GroupMembers, Model as GroupMemberModel,
};
pub use super::groups::{ActiveModel as GroupActiveModel, Entity as Groups, Model as GroupModel};
pub use super::review_sessions::{
    ActiveModel as ReviewSessionActiveModel, Entity as ReviewSessions, Model as ReviewSessionModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
