//! 变体分配算法
//!
//! 纯函数：给定任务的变体数量与提交者列表，产出提交者 -> 变体号的映射。
//! 对固定的成员列表结果可复现，持久化由调用方负责。

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::errors::{ReviewFlowError, Result};

/// 变体数量下限
pub const MIN_VARIANTS: i32 = 1;
/// 变体数量上限
pub const MAX_VARIANTS: i32 = 100;

/// 校验变体数量，范围 1..=100
pub fn validate_variants_count(variants_count: i32) -> Result<()> {
    if !(MIN_VARIANTS..=MAX_VARIANTS).contains(&variants_count) {
        return Err(ReviewFlowError::invalid_variant_count(format!(
            "变体数量必须在 {MIN_VARIANTS}..={MAX_VARIANTS} 之间，实际为 {variants_count}"
        )));
    }
    Ok(())
}

/// 批量分配：按用户 ID 升序排序去重后，依次分配 (index % V) + 1
///
/// 变体在提交者间尽可能均匀分布；同一输入总是得到同一映射。
pub fn assign_variants(variants_count: i32, submitters: &[i64]) -> Result<Vec<(i64, i32)>> {
    validate_variants_count(variants_count)?;

    let mut sorted: Vec<i64> = submitters.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    Ok(sorted
        .into_iter()
        .enumerate()
        .map(|(i, user_id)| (user_id, (i as i32 % variants_count) + 1))
        .collect())
}

/// 迟到提交者分配：按当前成员列表中的排序位置计算变体号
///
/// 成员列表里找不到该用户时（例如与成员变更产生竞争），退化为对用户 ID
/// 哈希取模。该兜底保证总能产出一个值，但放弃了均匀分布，属于有意的取舍。
pub fn late_variant(variants_count: i32, user_id: i64, current_members: &[i64]) -> Result<i32> {
    validate_variants_count(variants_count)?;

    let mut sorted: Vec<i64> = current_members.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    match sorted.iter().position(|&m| m == user_id) {
        Some(pos) => Ok((pos as i32 % variants_count) + 1),
        None => Ok(fallback_variant(variants_count, user_id)),
    }
}

// DefaultHasher 使用固定种子，同一 user_id 在任何进程中得到同一变体号
fn fallback_variant(variants_count: i32, user_id: i64) -> i32 {
    let mut hasher = DefaultHasher::new();
    user_id.hash(&mut hasher);
    (hasher.finish() % variants_count as u64) as i32 + 1
}
