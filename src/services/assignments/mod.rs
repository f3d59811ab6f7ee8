pub mod create;
pub mod submit;

use std::sync::Arc;

use crate::errors::Result;
use crate::integrations::Notifier;
use crate::models::assignments::{
    entities::Assignment,
    requests::{CreateAssignmentRequest, SubmitRequest},
};
use crate::models::submissions::entities::Submission;
use crate::storage::Storage;

pub struct AssignmentService {
    pub(crate) storage: Arc<dyn Storage>,
    pub(crate) notifier: Arc<dyn Notifier>,
}

impl AssignmentService {
    pub fn new(storage: Arc<dyn Storage>, notifier: Arc<dyn Notifier>) -> Self {
        Self { storage, notifier }
    }

    // 创建任务并为当前全部学生分配变体
    pub async fn create_assignment(
        &self,
        creator_id: i64,
        request: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        create::create_assignment(self, creator_id, request).await
    }

    // 学生提交答案，必要时懒创建变体分配
    pub async fn submit(&self, user_id: i64, request: SubmitRequest) -> Result<Submission> {
        submit::submit(self, user_id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ReviewFlowError;
    use crate::integrations::testing::RecordingNotifier;
    use crate::models::groups::entities::GroupRole;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use chrono::{Duration, Utc};

    const TEACHER: i64 = 1;

    async fn service_with_notifier() -> (AssignmentService, Arc<RecordingNotifier>) {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let notifier = Arc::new(RecordingNotifier::default());
        (
            AssignmentService::new(storage, notifier.clone()),
            notifier,
        )
    }

    async fn seed_group(service: &AssignmentService, students: &[i64]) -> i64 {
        let group = service.storage.create_group(TEACHER, "测试群组").await.unwrap();
        for &s in students {
            service
                .storage
                .add_group_member(group.id, s, GroupRole::Student)
                .await
                .unwrap();
        }
        group.id
    }

    fn create_request(group_id: i64, variants_count: i32) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            group_id,
            variants_count,
            deadline: Utc::now() + Duration::days(7),
            title: "第一次作业".to_string(),
            description: Some("完成所有题目".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_assignment_distributes_variants() {
        // 4 个学生、3 个变体：按 ID 排序依次得到 1,2,3,1
        let (service, _) = service_with_notifier().await;
        let group_id = seed_group(&service, &[101, 102, 103, 104]).await;

        let assignment = service
            .create_assignment(TEACHER, create_request(group_id, 3))
            .await
            .unwrap();

        let expected = [(101, 1), (102, 2), (103, 3), (104, 1)];
        for (user_id, variant) in expected {
            let row = service
                .storage
                .get_variant_assignment(assignment.id, user_id)
                .await
                .unwrap()
                .expect("学生应有变体分配");
            assert_eq!(row.variant_number, variant);
        }
    }

    #[tokio::test]
    async fn test_create_assignment_notifies_students_and_teachers() {
        let (service, notifier) = service_with_notifier().await;
        let group_id = seed_group(&service, &[101, 102]).await;

        service
            .create_assignment(TEACHER, create_request(group_id, 2))
            .await
            .unwrap();

        // 每个学生收到含自己变体号的通知
        let to_student = notifier.messages_for(101).await;
        assert_eq!(to_student.len(), 1);
        assert!(to_student[0].contains("变体: 1"));

        // 教师收到创建确认
        let to_teacher = notifier.messages_for(TEACHER).await;
        assert_eq!(to_teacher.len(), 1);
    }

    #[tokio::test]
    async fn test_create_assignment_rejects_bad_variant_count() {
        let (service, _) = service_with_notifier().await;
        let group_id = seed_group(&service, &[101]).await;

        for bad in [0, -3, 101] {
            let err = service
                .create_assignment(TEACHER, create_request(group_id, bad))
                .await
                .unwrap_err();
            assert!(matches!(err, ReviewFlowError::InvalidVariantCount(_)));
        }
    }

    #[tokio::test]
    async fn test_create_assignment_requires_teacher() {
        let (service, _) = service_with_notifier().await;
        let group_id = seed_group(&service, &[101]).await;

        let err = service
            .create_assignment(101, create_request(group_id, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewFlowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_create_assignment_unknown_group() {
        let (service, _) = service_with_notifier().await;
        let err = service
            .create_assignment(TEACHER, create_request(9999, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewFlowError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_submit_creates_pending_submission() {
        let (service, _) = service_with_notifier().await;
        let group_id = seed_group(&service, &[101]).await;
        let assignment = service
            .create_assignment(TEACHER, create_request(group_id, 3))
            .await
            .unwrap();

        let submission = service
            .submit(
                101,
                SubmitRequest {
                    assignment_id: assignment.id,
                    text_answer: Some("我的答案".to_string()),
                    file_url: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(
            submission.status,
            crate::models::submissions::entities::SubmissionStatus::Pending
        );
        assert_eq!(submission.variant_number, 1);
        assert_eq!(submission.locked_by, None);
    }

    #[tokio::test]
    async fn test_submit_requires_membership() {
        let (service, _) = service_with_notifier().await;
        let group_id = seed_group(&service, &[101]).await;
        let assignment = service
            .create_assignment(TEACHER, create_request(group_id, 3))
            .await
            .unwrap();

        let err = service
            .submit(
                555,
                SubmitRequest {
                    assignment_id: assignment.id,
                    text_answer: Some("蹭课".to_string()),
                    file_url: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewFlowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_submit_rejects_after_deadline() {
        let (service, _) = service_with_notifier().await;
        let group_id = seed_group(&service, &[101]).await;

        let mut request = create_request(group_id, 3);
        request.deadline = Utc::now() - Duration::hours(1);
        let assignment = service.create_assignment(TEACHER, request).await.unwrap();

        let err = service
            .submit(
                101,
                SubmitRequest {
                    assignment_id: assignment.id,
                    text_answer: Some("迟了".to_string()),
                    file_url: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewFlowError::DeadlinePassed(_)));
    }

    #[tokio::test]
    async fn test_late_joiner_gets_lazy_variant_idempotently() {
        let (service, _) = service_with_notifier().await;
        let group_id = seed_group(&service, &[101, 102]).await;
        let assignment = service
            .create_assignment(TEACHER, create_request(group_id, 2))
            .await
            .unwrap();

        // 创建任务之后才加入的学生，批量分配没有覆盖到
        service
            .storage
            .add_group_member(group_id, 103, GroupRole::Student)
            .await
            .unwrap();
        assert!(
            service
                .storage
                .get_variant_assignment(assignment.id, 103)
                .await
                .unwrap()
                .is_none()
        );

        let request = SubmitRequest {
            assignment_id: assignment.id,
            text_answer: Some("补交".to_string()),
            file_url: None,
        };
        let first = service.submit(103, request.clone()).await.unwrap();
        let second = service.submit(103, request).await.unwrap();

        // 两次提交产生两行提交记录，但变体号一致、变体分配只有一行
        assert_ne!(first.id, second.id);
        assert_eq!(first.variant_number, second.variant_number);
        let row = service
            .storage
            .get_variant_assignment(assignment.id, 103)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.variant_number, first.variant_number);
    }

    #[tokio::test]
    async fn test_resubmission_creates_new_row() {
        let (service, _) = service_with_notifier().await;
        let group_id = seed_group(&service, &[101]).await;
        let assignment = service
            .create_assignment(TEACHER, create_request(group_id, 1))
            .await
            .unwrap();

        let request = SubmitRequest {
            assignment_id: assignment.id,
            text_answer: Some("第一版".to_string()),
            file_url: None,
        };
        let first = service.submit(101, request.clone()).await.unwrap();
        let second = service.submit(101, request).await.unwrap();
        assert_ne!(first.id, second.id);
    }
}
