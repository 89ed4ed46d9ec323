//! # 학습 계획 프롬프트 작성
//!
//! 사용자 선호도와 시험/챕터 정보를 LLM에게 보낼 한국어 지시문 하나로 렌더링합니다.
//!
//! 프롬프트 구성:
//! 1. 사용자 선호도 (스타일, 요일, 하루 세션 수)
//! 2. 시험별 문단 (과목, 기간, 중요도, 챕터 목록 `(난이도, 분량)`)
//! 3. 학습 가능 날짜 목록 (모든 시험의 날짜를 합쳐 중복 제거 후 날짜순 정렬)
//! 4. 출력 형식 예시 (JSON 배열)
//! 5. 반드시 지켜야 할 조건 목록
//!
//! 분기 로직은 문자열 조립뿐입니다. 같은 입력이면 항상 같은 프롬프트가 나옵니다.

use std::collections::BTreeSet;

use crate::models::{Difficulty, Exam, Preference};
use crate::services::dates::{valid_study_dates, DateWindowError};

/// 프롬프트 작성에 필요한 입력 묶음
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub user_id: &'a str,
    pub database_id: &'a str,
    pub preference: &'a Preference,
    pub exams: &'a [Exam],
}

/// 모든 시험 기간의 학습 가능 날짜를 합쳐 중복 제거·날짜순 정렬한 `M/D` 목록
pub fn date_hint(preference: &Preference, exams: &[Exam]) -> Result<Vec<String>, DateWindowError> {
    let mut dates = BTreeSet::new();
    for exam in exams {
        dates.extend(valid_study_dates(
            &exam.start_date,
            &exam.end_date,
            &preference.study_days,
        )?);
    }
    Ok(dates.iter().map(ToString::to_string).collect())
}

/// 시험 하나를 프롬프트 문단으로 렌더링합니다.
fn render_exam(exam: &Exam) -> String {
    let chapters = if exam.chapters.is_empty() {
        " (등록된 챕터 없음)".to_string()
    } else {
        exam.chapters
            .iter()
            .map(|chapter| {
                format!(
                    "\n    - {} ({}, {}p)",
                    chapter.chapter_title,
                    chapter.difficulty.as_str(),
                    chapter.content_volume
                )
            })
            .collect::<String>()
    };

    format!(
        "과목: {}\n기간: {} ~ {} (마지막 날은 시험일입니다)\n중요도: {}\n챕터:{}",
        exam.subject, exam.start_date, exam.end_date, exam.importance, chapters
    )
}

fn render_throughput_table() -> String {
    [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
        .iter()
        .map(|d| format!("       - {} ({}): 평균 하루 {}p", d.label(), d.as_str(), d.daily_pages()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// LLM에게 보낼 프롬프트를 작성합니다.
///
/// 시험 기간 날짜가 잘못되어 있으면 빈 날짜 목록으로 넘어가지 않고 에러를 반환합니다.
pub fn build_prompt(input: PromptInput<'_>) -> Result<String, DateWindowError> {
    let preference = input.preference;
    let sessions = preference.sessions_per_day;

    let exams = input
        .exams
        .iter()
        .map(render_exam)
        .collect::<Vec<_>>()
        .join("\n\n");
    let hint = date_hint(preference, input.exams)?.join(", ");

    Ok(format!(
        r#"너는 AI 기반 학습 스케줄러야. 사용자 선호도와 시험 정보를 기반으로 과목별 학습 계획(dailyPlan)을 작성해.

📌 사용자 선호도:
- 학습 스타일: {style}  (focus: 하루 한 과목 / multi, parallel: 하루 여러 과목)
- 학습 요일: {days}
- 하루 세션 수: {sessions}

📌 시험 정보:
{exams}

📌 가능한 학습 날짜 목록:
[{hint}]
※ 반드시 이 날짜들만 사용할 것. 이외 날짜는 절대 사용하지 마.

📌 출력 형식:
[
  {{
    "userId": "{user_id}",
    "subject": "과목명",
    "startDate": "YYYY-MM-DD",
    "endDate": "YYYY-MM-DD",
    "dailyPlan": [
      "6/1: Chapter 1 (p.1-25)",
      "6/3: Chapter 2 (p.1-30)",
      "6/5: Review"
    ],
    "databaseId": "{database_id}"
  }}
]
- dailyPlan의 각 항목은 반드시 "M/D: 내용" 형식이어야 한다.

반드시 지켜야 할 조건:

**챕터 순서 엄수 (최우선)**:
1. 한 과목 내에서 챕터는 반드시 등록된 순서대로 진행한다.
   - 앞 챕터가 완전히 끝나지 않으면 다음 챕터는 절대 시작할 수 없다.
2. 각 챕터의 contentVolume 전체 페이지를 빠짐없이 학습한 뒤에만 다음 챕터로 넘어간다.

**학습 계획 규칙**:
3. 한 과목은 하루에 한 줄만 가진다. 같은 날 같은 챕터의 분량은 한 문자열로 합친다.
   - 올바른 예: "6/3: Chapter 2 (p.1-30)"
   - 잘못된 예: "6/3: Chapter 2 (p.1-10)", "6/3: Chapter 2 (p.11-20)"
4. 하루에 배정되는 과목/챕터 수는 {sessions}개 이하로 한다.
5. 페이지 분할 기준 (difficulty 고려, 유연하게 조정 가능):
{throughput}

**일정 관리**:
6. 위 "가능한 학습 날짜 목록"에 있는 날짜만 사용한다.
7. 학습 스타일에 따른 과목 배치 (현재 스타일: {style}):
   - focus: 하루에 한 과목만 학습한다 (같은 과목이라면 여러 챕터 가능).
   - multi, parallel: 하루에 여러 과목을 병행할 수 있다 (각 과목의 챕터 순서는 엄수).
8. dailyPlan은 날짜 순서대로 정렬한다.
9. Review는 모든 과목의 모든 챕터가 완전히 끝난 뒤에만 추가할 수 있다.

📌 출력은 반드시 JSON 배열만 포함해야 하며, 설명 문장이나 코드 블록은 절대 포함하지 않는다."#,
        style = preference.style,
        days = preference.study_days.join(", "),
        sessions = sessions,
        exams = exams,
        hint = hint,
        user_id = input.user_id,
        database_id = input.database_id,
        throughput = render_throughput_table(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chapter, StudyStyle};

    fn preference(style: StudyStyle) -> Preference {
        Preference {
            style,
            study_days: vec!["월".to_string(), "수".to_string()],
            sessions_per_day: 2,
        }
    }

    fn exam(subject: &str, start: &str, end: &str) -> Exam {
        Exam {
            id: 1,
            subject: subject.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            importance: 5,
            chapters: vec![
                Chapter {
                    id: 1,
                    chapter_title: "Chapter 1 배열".to_string(),
                    difficulty: Difficulty::Easy,
                    content_volume: 40,
                },
                Chapter {
                    id: 2,
                    chapter_title: "Chapter 2 트리".to_string(),
                    difficulty: Difficulty::Hard,
                    content_volume: 30,
                },
            ],
        }
    }

    #[test]
    fn date_hint_is_deduplicated_and_chronological() {
        let exams = vec![
            exam("Math", "2025-06-02", "2025-06-11"),
            exam("History", "2025-06-04", "2025-06-09"),
        ];
        let hint = date_hint(&preference(StudyStyle::Focus), &exams).unwrap();
        // 문자열 정렬이었다면 "6/11"이 "6/2"보다 앞에 왔을 것
        assert_eq!(hint, vec!["6/2", "6/4", "6/9", "6/11"]);
    }

    #[test]
    fn prompt_contains_every_required_fact() {
        let exams = vec![exam("Math", "2025-06-02", "2025-06-06")];
        let prompt = build_prompt(PromptInput {
            user_id: "u1",
            database_id: "db-1",
            preference: &preference(StudyStyle::Focus),
            exams: &exams,
        })
        .unwrap();

        assert!(prompt.contains("학습 스타일: focus"));
        assert!(prompt.contains("학습 요일: 월, 수"));
        assert!(prompt.contains("하루 세션 수: 2"));
        assert!(prompt.contains("과목: Math"));
        assert!(prompt.contains("기간: 2025-06-02 ~ 2025-06-06"));
        assert!(prompt.contains("중요도: 5"));
        assert!(prompt.contains("    - Chapter 1 배열 (easy, 40p)"));
        assert!(prompt.contains("    - Chapter 2 트리 (hard, 30p)"));
        assert!(prompt.contains("[6/2, 6/4]"));
        assert!(prompt.contains(r#""userId": "u1""#));
        assert!(prompt.contains(r#""databaseId": "db-1""#));
        assert!(prompt.contains("평균 하루 25p"));
        assert!(prompt.contains("평균 하루 17p"));
        assert!(prompt.contains("평균 하루 12p"));
        assert!(prompt.contains("2개 이하"));
        assert!(prompt.contains("현재 스타일: focus"));
        assert!(prompt.contains("- focus: 하루에 한 과목만 학습한다"));
        assert!(prompt.contains("- multi, parallel: 하루에 여러 과목을 병행할 수 있다"));
        assert!(prompt.contains("Review"));
    }

    #[test]
    fn chapter_order_is_preserved() {
        let exams = vec![exam("Math", "2025-06-02", "2025-06-06")];
        let prompt = build_prompt(PromptInput {
            user_id: "u1",
            database_id: "default",
            preference: &preference(StudyStyle::Multi),
            exams: &exams,
        })
        .unwrap();

        let first = prompt.find("Chapter 1 배열").unwrap();
        let second = prompt.find("Chapter 2 트리").unwrap();
        assert!(first < second);
        assert!(prompt.contains("현재 스타일: multi"));
        assert!(prompt.contains("하루에 한 과목만"));
        assert!(prompt.contains("여러 과목을 병행"));
    }

    #[test]
    fn exam_paragraph_lists_chapters_or_notes_their_absence() {
        let paragraph = render_exam(&exam("Math", "2025-06-02", "2025-06-06"));
        assert_eq!(
            paragraph,
            "과목: Math\n기간: 2025-06-02 ~ 2025-06-06 (마지막 날은 시험일입니다)\n중요도: 5\n챕터:\n    - Chapter 1 배열 (easy, 40p)\n    - Chapter 2 트리 (hard, 30p)"
        );

        let mut empty = exam("History", "2025-06-02", "2025-06-06");
        empty.chapters.clear();
        assert!(render_exam(&empty).ends_with("챕터: (등록된 챕터 없음)"));
    }

    #[test]
    fn broken_exam_window_is_an_error() {
        let exams = vec![exam("Math", "2025-06-06", "2025-06-02")];
        let result = build_prompt(PromptInput {
            user_id: "u1",
            database_id: "default",
            preference: &preference(StudyStyle::Focus),
            exams: &exams,
        });
        assert!(result.is_err());
    }
}
