use serde::{Deserialize, Serialize};

// (assignment, submitter) 到变体号的绑定
//
// (assignment_id, user_id) 维度唯一；变体号本身可被多个提交者共享。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantAssignment {
    pub id: i64,
    pub assignment_id: i64,
    pub user_id: i64,
    pub variant_number: i32,
}
