//! # 시험/챕터 DB 쿼리
//!
//! 시험 하나와 그 챕터들은 한 트랜잭션으로 저장합니다.
//! 챕터의 `position`은 요청에 들어온 순서(0부터)이며, 조회는 항상 이 순서를 따릅니다.

use std::collections::{HashMap, HashSet};

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{Chapter, ChapterRow, Exam, ExamRow, NewExam};

/// 시험과 챕터를 저장하고 저장된 모습 그대로 돌려줍니다.
///
/// 같은 사용자에게 같은 과목이 이미 있으면 `Conflict`.
pub async fn create_exam(pool: &SqlitePool, user_pk: i64, exam: &NewExam) -> Result<Exam, AppError> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO exams (user_id, subject, start_date, end_date, importance)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_pk)
    .bind(&exam.subject)
    .bind(exam.start_date.to_string())
    .bind(exam.end_date.to_string())
    .bind(exam.importance)
    .execute(&mut *tx)
    .await;

    let exam_id = match inserted {
        Ok(result) => result.last_insert_rowid(),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(AppError::Conflict(format!(
                "Exam for subject '{}' already exists",
                exam.subject
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let mut chapters = Vec::with_capacity(exam.chapters.len());
    for (position, chapter) in exam.chapters.iter().enumerate() {
        let title = chapter.chapter_title.trim();
        let chapter_id = sqlx::query(
            r#"
            INSERT INTO chapters (exam_id, position, chapter_title, difficulty, content_volume)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(exam_id)
        .bind(position as i64)
        .bind(title)
        .bind(chapter.difficulty.as_str())
        .bind(i64::from(chapter.content_volume))
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        chapters.push(Chapter {
            id: chapter_id,
            chapter_title: title.to_string(),
            difficulty: chapter.difficulty,
            content_volume: chapter.content_volume,
        });
    }

    tx.commit().await?;

    tracing::info!(
        "Created exam '{}' with {} chapter(s) for user #{}",
        exam.subject,
        chapters.len(),
        user_pk
    );

    Ok(Exam {
        id: exam_id,
        subject: exam.subject.clone(),
        start_date: exam.start_date.to_string(),
        end_date: exam.end_date.to_string(),
        importance: exam.importance,
        chapters,
    })
}

/// 사용자의 모든 시험을 챕터와 함께 조회합니다. (시작일, 등록 순)
pub async fn list_exams(pool: &SqlitePool, user_pk: i64) -> Result<Vec<Exam>, AppError> {
    let rows = sqlx::query_as::<_, ExamRow>(
        r#"
        SELECT id, subject, start_date, end_date, importance
        FROM exams
        WHERE user_id = ?
        ORDER BY start_date ASC, id ASC
        "#,
    )
    .bind(user_pk)
    .fetch_all(pool)
    .await?;

    let chapter_rows = sqlx::query_as::<_, ChapterRow>(
        r#"
        SELECT c.id, c.exam_id, c.chapter_title, c.difficulty, c.content_volume
        FROM chapters c
        INNER JOIN exams e ON e.id = c.exam_id
        WHERE e.user_id = ?
        ORDER BY c.exam_id ASC, c.position ASC
        "#,
    )
    .bind(user_pk)
    .fetch_all(pool)
    .await?;

    // exam_id별로 묶기 (정렬 순서는 Vec 안에서 유지됨)
    let mut by_exam: HashMap<i64, Vec<Chapter>> = HashMap::new();
    for row in chapter_rows {
        let exam_id = row.exam_id;
        by_exam.entry(exam_id).or_default().push(Chapter::try_from(row)?);
    }

    Ok(rows
        .into_iter()
        .map(|row| Exam {
            chapters: by_exam.remove(&row.id).unwrap_or_default(),
            id: row.id,
            subject: row.subject,
            start_date: row.start_date,
            end_date: row.end_date,
            importance: row.importance,
        })
        .collect())
}

/// 사용자가 등록한 시험 과목명 집합 (계획 정합화용)
pub async fn list_subjects(pool: &SqlitePool, user_pk: i64) -> Result<HashSet<String>, AppError> {
    let subjects = sqlx::query_scalar::<_, String>("SELECT subject FROM exams WHERE user_id = ?")
        .bind(user_pk)
        .fetch_all(pool)
        .await?;

    Ok(subjects.into_iter().collect())
}

/// 과목 하나를 삭제합니다. 챕터는 FK CASCADE로 함께 지워집니다.
///
/// 삭제된 행이 있으면 `true`.
pub async fn delete_exam(pool: &SqlitePool, user_pk: i64, subject: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM exams WHERE user_id = ? AND subject = ?")
        .bind(user_pk)
        .bind(subject)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 사용자의 시험을 모두 삭제하고 삭제된 개수를 돌려줍니다.
pub async fn delete_all_exams(pool: &SqlitePool, user_pk: i64) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM exams WHERE user_id = ?")
        .bind(user_pk)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, users};
    use crate::models::{CreateChapterRequest, Difficulty};
    use chrono::NaiveDate;

    fn new_exam(subject: &str, start: (u32, u32), titles: &[&str]) -> NewExam {
        NewExam {
            subject: subject.to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, start.0, start.1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            importance: 1,
            chapters: titles
                .iter()
                .map(|t| CreateChapterRequest {
                    chapter_title: t.to_string(),
                    difficulty: Difficulty::Medium,
                    content_volume: 10,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn chapters_keep_registration_order() {
        let pool = test_pool().await;
        let user = users::create_user(&pool, "u1", None, "hash").await.unwrap();
        create_exam(&pool, user.id, &new_exam("Math", (6, 2), &["Ch3", "Ch1", "Ch2"]))
            .await
            .unwrap();

        let exams = list_exams(&pool, user.id).await.unwrap();
        assert_eq!(exams.len(), 1);
        let titles: Vec<_> = exams[0].chapters.iter().map(|c| c.chapter_title.as_str()).collect();
        assert_eq!(titles, vec!["Ch3", "Ch1", "Ch2"]);
        assert_eq!(exams[0].start_date, "2025-06-02");
    }

    #[tokio::test]
    async fn duplicate_subject_is_conflict() {
        let pool = test_pool().await;
        let user = users::create_user(&pool, "u1", None, "hash").await.unwrap();
        create_exam(&pool, user.id, &new_exam("Math", (6, 2), &[])).await.unwrap();
        let err = create_exam(&pool, user.id, &new_exam("Math", (6, 3), &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn exams_are_scoped_per_user_and_deletable() {
        let pool = test_pool().await;
        let u1 = users::create_user(&pool, "u1", None, "hash").await.unwrap();
        let u2 = users::create_user(&pool, "u2", None, "hash").await.unwrap();
        create_exam(&pool, u1.id, &new_exam("History", (6, 5), &["A"])).await.unwrap();
        create_exam(&pool, u1.id, &new_exam("Math", (6, 2), &["B"])).await.unwrap();
        create_exam(&pool, u2.id, &new_exam("Math", (6, 2), &[])).await.unwrap();

        let subjects = list_subjects(&pool, u1.id).await.unwrap();
        assert_eq!(subjects.len(), 2);
        assert!(subjects.contains("Math") && subjects.contains("History"));

        // 시작일 순 정렬
        let exams = list_exams(&pool, u1.id).await.unwrap();
        assert_eq!(exams[0].subject, "Math");

        assert!(delete_exam(&pool, u1.id, "Math").await.unwrap());
        assert!(!delete_exam(&pool, u1.id, "Math").await.unwrap());
        assert_eq!(delete_all_exams(&pool, u1.id).await.unwrap(), 1);
        assert!(list_exams(&pool, u1.id).await.unwrap().is_empty());
        assert_eq!(list_exams(&pool, u2.id).await.unwrap().len(), 1);
    }
}
