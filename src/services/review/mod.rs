pub mod claim;
pub mod grade;
pub mod start;
pub mod stop;
pub mod sweep;

use std::sync::Arc;

use crate::errors::Result;
use crate::integrations::Notifier;
use crate::models::review_sessions::entities::ReviewSession;
use crate::models::submissions::entities::Submission;
use crate::storage::Storage;

pub use grade::GradeOutcome;

pub struct ReviewService {
    pub(crate) storage: Arc<dyn Storage>,
    pub(crate) notifier: Arc<dyn Notifier>,
}

impl ReviewService {
    pub fn new(storage: Arc<dyn Storage>, notifier: Arc<dyn Notifier>) -> Self {
        Self { storage, notifier }
    }

    // 开始批阅：会话置为 active
    pub async fn start_review(
        &self,
        reviewer_id: i64,
        assignment_id: i64,
    ) -> Result<ReviewSession> {
        start::start_review(self, reviewer_id, assignment_id).await
    }

    // 停止批阅：会话置为 inactive，不存在则什么都不做
    pub async fn stop_review(&self, reviewer_id: i64, assignment_id: i64) -> Result<()> {
        stop::stop_review(self, reviewer_id, assignment_id).await
    }

    // 会话是否处于 active
    pub async fn is_session_active(&self, reviewer_id: i64, assignment_id: i64) -> Result<bool> {
        let session = self
            .storage
            .get_review_session(assignment_id, reviewer_id)
            .await?;
        Ok(session.map(|s| s.active).unwrap_or(false))
    }

    // 认领下一份待批提交，队列空返回 None
    pub async fn claim_next(
        &self,
        reviewer_id: i64,
        assignment_id: i64,
    ) -> Result<Option<Submission>> {
        claim::claim_next(self, reviewer_id, assignment_id).await
    }

    // 认领并把提交详情推送给批阅教师
    pub async fn send_next_for_review(
        &self,
        reviewer_id: i64,
        assignment_id: i64,
    ) -> Result<Option<Submission>> {
        claim::send_next_for_review(self, reviewer_id, assignment_id).await
    }

    // 评分：提交进入终态，返回任务 ID 供调用方决定是否继续认领
    pub async fn grade(
        &self,
        reviewer_id: i64,
        submission_id: i64,
        score: i32,
        comment: Option<String>,
    ) -> Result<GradeOutcome> {
        grade::grade(self, reviewer_id, submission_id, score, comment).await
    }

    // 回收超过租约时长的认领锁
    pub async fn release_expired_claims(&self, lease_secs: i64) -> Result<u64> {
        sweep::release_expired_claims(self, lease_secs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ReviewFlowError;
    use crate::integrations::testing::RecordingNotifier;
    use crate::models::assignments::requests::{CreateAssignmentRequest, SubmitRequest};
    use crate::models::groups::entities::GroupRole;
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::services::AssignmentService;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use chrono::{Duration, Utc};

    const TEACHER: i64 = 1;
    const TEACHER_B: i64 = 2;

    struct Fixture {
        assignments: AssignmentService,
        review: ReviewService,
        notifier: Arc<RecordingNotifier>,
        group_id: i64,
    }

    async fn fixture(students: &[i64]) -> Fixture {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let notifier = Arc::new(RecordingNotifier::default());

        let group = storage.create_group(TEACHER, "测试群组").await.unwrap();
        storage
            .add_group_member(group.id, TEACHER_B, GroupRole::Teacher)
            .await
            .unwrap();
        for &s in students {
            storage
                .add_group_member(group.id, s, GroupRole::Student)
                .await
                .unwrap();
        }

        Fixture {
            assignments: AssignmentService::new(storage.clone(), notifier.clone()),
            review: ReviewService::new(storage, notifier.clone()),
            notifier,
            group_id: group.id,
        }
    }

    async fn create_assignment(fixture: &Fixture, variants_count: i32) -> i64 {
        fixture
            .assignments
            .create_assignment(
                TEACHER,
                CreateAssignmentRequest {
                    group_id: fixture.group_id,
                    variants_count,
                    deadline: Utc::now() + Duration::days(7),
                    title: "第一次作业".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    async fn submit(fixture: &Fixture, user_id: i64, assignment_id: i64) -> i64 {
        fixture
            .assignments
            .submit(
                user_id,
                SubmitRequest {
                    assignment_id,
                    text_answer: Some("答案".to_string()),
                    file_url: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_session_start_stop_is_active() {
        let fixture = fixture(&[101]).await;
        let assignment_id = create_assignment(&fixture, 1).await;

        assert!(!fixture
            .review
            .is_session_active(TEACHER, assignment_id)
            .await
            .unwrap());

        fixture
            .review
            .start_review(TEACHER, assignment_id)
            .await
            .unwrap();
        assert!(fixture
            .review
            .is_session_active(TEACHER, assignment_id)
            .await
            .unwrap());

        fixture
            .review
            .stop_review(TEACHER, assignment_id)
            .await
            .unwrap();
        assert!(!fixture
            .review
            .is_session_active(TEACHER, assignment_id)
            .await
            .unwrap());

        // 重新开始：同一行被翻回 active，而不是新建第二行
        fixture
            .review
            .start_review(TEACHER, assignment_id)
            .await
            .unwrap();
        assert!(fixture
            .review
            .is_session_active(TEACHER, assignment_id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_start_review_requires_teacher() {
        let fixture = fixture(&[101]).await;
        let assignment_id = create_assignment(&fixture, 1).await;

        let err = fixture
            .review
            .start_review(101, assignment_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewFlowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_stop_review_without_session_is_noop() {
        let fixture = fixture(&[101]).await;
        let assignment_id = create_assignment(&fixture, 1).await;
        fixture
            .review
            .stop_review(TEACHER, assignment_id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_grade_score_bounds() {
        let fixture = fixture(&[101]).await;
        let assignment_id = create_assignment(&fixture, 1).await;
        submit(&fixture, 101, assignment_id).await;

        let claimed = fixture
            .review
            .claim_next(TEACHER, assignment_id)
            .await
            .unwrap()
            .unwrap();

        for bad in [-1, 101] {
            let err = fixture
                .review
                .grade(TEACHER, claimed.id, bad, None)
                .await
                .unwrap_err();
            assert!(matches!(err, ReviewFlowError::InvalidScore(_)));
        }

        // 0 分是合法边界
        fixture
            .review
            .grade(TEACHER, claimed.id, 0, None)
            .await
            .unwrap();

        // 100 分也是合法边界
        let second = submit(&fixture, 101, assignment_id).await;
        fixture
            .review
            .claim_next(TEACHER, assignment_id)
            .await
            .unwrap()
            .unwrap();
        fixture
            .review
            .grade(TEACHER, second, 100, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_grade_guards() {
        let fixture = fixture(&[101]).await;
        let assignment_id = create_assignment(&fixture, 1).await;
        let submission_id = submit(&fixture, 101, assignment_id).await;

        // 未认领就评分
        let err = fixture
            .review
            .grade(TEACHER, submission_id, 80, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewFlowError::NotYetClaimed(_)));

        // 教师 A 认领后教师 B 评分
        fixture
            .review
            .claim_next(TEACHER, assignment_id)
            .await
            .unwrap()
            .unwrap();
        let err = fixture
            .review
            .grade(TEACHER_B, submission_id, 80, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewFlowError::LockedByOther(_)));

        // 已评分的不可再评
        fixture
            .review
            .grade(TEACHER, submission_id, 80, None)
            .await
            .unwrap();
        let err = fixture
            .review
            .grade(TEACHER, submission_id, 90, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewFlowError::AlreadyReviewed(_)));
    }

    #[tokio::test]
    async fn test_grade_requires_teacher_standing() {
        let fixture = fixture(&[101]).await;
        let assignment_id = create_assignment(&fixture, 1).await;
        let submission_id = submit(&fixture, 101, assignment_id).await;

        // 学生不能评分，即便指到了存在的提交
        let err = fixture
            .review
            .grade(101, submission_id, 80, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewFlowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_grade_unknown_submission() {
        let fixture = fixture(&[101]).await;
        create_assignment(&fixture, 1).await;

        let err = fixture.review.grade(TEACHER, 9999, 80, None).await.unwrap_err();
        assert!(matches!(err, ReviewFlowError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_end_to_end_review_flow() {
        // 规范场景：4 个学生 3 个变体 -> 1,2,3,1；提交、认领、评分、队列空
        let fixture = fixture(&[101, 102, 103, 104]).await;
        let assignment_id = create_assignment(&fixture, 3).await;

        let submission_id = submit(&fixture, 101, assignment_id).await;

        fixture
            .review
            .start_review(TEACHER, assignment_id)
            .await
            .unwrap();

        let claimed = fixture
            .review
            .claim_next(TEACHER, assignment_id)
            .await
            .unwrap()
            .expect("应认领到 101 的提交");
        assert_eq!(claimed.id, submission_id);
        assert_eq!(claimed.status, SubmissionStatus::InReview);
        assert_eq!(claimed.locked_by, Some(TEACHER));

        let outcome = fixture
            .review
            .grade(TEACHER, claimed.id, 85, Some("不错".to_string()))
            .await
            .unwrap();
        assert_eq!(outcome.assignment_id, assignment_id);
        assert_eq!(outcome.submission.status, SubmissionStatus::Reviewed);
        assert_eq!(outcome.submission.score, Some(85));

        // 提交者收到批阅结果通知（创建任务时已收到一条变体通知）
        let to_student = fixture.notifier.messages_for(101).await;
        assert_eq!(to_student.len(), 2);
        assert!(to_student[1].contains("85"));

        // 没有其他待批提交，再次认领得到空
        let next = fixture
            .review
            .claim_next(TEACHER, assignment_id)
            .await
            .unwrap();
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn test_send_next_notifies_reviewer() {
        let fixture = fixture(&[101]).await;
        let assignment_id = create_assignment(&fixture, 1).await;
        submit(&fixture, 101, assignment_id).await;

        let claimed = fixture
            .review
            .send_next_for_review(TEACHER, assignment_id)
            .await
            .unwrap();
        assert!(claimed.is_some());

        // 教师收到两条：任务创建确认 + 待批提交详情
        let to_teacher = fixture.notifier.messages_for(TEACHER).await;
        assert_eq!(to_teacher.len(), 2);
        assert!(to_teacher[1].contains("变体"));

        // 队列空时推送“没有了”的提示
        let empty = fixture
            .review
            .send_next_for_review(TEACHER, assignment_id)
            .await
            .unwrap();
        assert!(empty.is_none());
        let to_teacher = fixture.notifier.messages_for(TEACHER).await;
        assert_eq!(to_teacher.len(), 3);
    }

    #[tokio::test]
    async fn test_claim_requires_teacher() {
        let fixture = fixture(&[101]).await;
        let assignment_id = create_assignment(&fixture, 1).await;
        submit(&fixture, 101, assignment_id).await;

        let err = fixture
            .review
            .claim_next(101, assignment_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewFlowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_release_expired_claims_passthrough() {
        let fixture = fixture(&[101]).await;
        let assignment_id = create_assignment(&fixture, 1).await;
        submit(&fixture, 101, assignment_id).await;
        fixture
            .review
            .claim_next(TEACHER, assignment_id)
            .await
            .unwrap()
            .unwrap();

        // 刚认领的锁在租约内，不会被回收
        let reclaimed = fixture.review.release_expired_claims(3600).await.unwrap();
        assert_eq!(reclaimed, 0);
    }
}
