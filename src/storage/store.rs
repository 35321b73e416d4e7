//! SQLite store of analysed resumes

use crate::error::Result;
use crate::processing::{CandidateRecord, ScoreBreakdown};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection, FromRow};
use std::path::{Path, PathBuf};

const CREATE_RESUMES: &str = "CREATE TABLE IF NOT EXISTS resumes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    email TEXT,
    phone TEXT,
    skills TEXT,
    experience TEXT,
    education TEXT,
    resume_text TEXT,
    ats_score REAL,
    keyword_score REAL,
    skills_score REAL,
    experience_score REAL,
    education_score REAL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

const SELECT_RESUMES: &str = "SELECT id, name, email, phone, skills, experience, education, resume_text, \
     ats_score, keyword_score, skills_score, experience_score, education_score, created_at FROM resumes";

/// One stored analysis: flattened candidate fields plus weighted scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResume {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: Vec<String>,
    pub resume_text: String,
    pub total_score: f64,
    pub keyword_score: f64,
    pub skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub created_at: DateTime<Utc>,
}

/// Row as laid out in the `resumes` table; list columns hold JSON arrays.
#[derive(FromRow)]
struct ResumeRow {
    id: i64,
    name: String,
    email: String,
    phone: String,
    skills: String,
    experience: String,
    education: String,
    resume_text: String,
    ats_score: f64,
    keyword_score: f64,
    skills_score: f64,
    experience_score: f64,
    education_score: f64,
    created_at: DateTime<Utc>,
}

impl TryFrom<ResumeRow> for StoredResume {
    type Error = crate::error::AtsError;

    fn try_from(row: ResumeRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            skills: serde_json::from_str(&row.skills)?,
            experience: row.experience,
            education: serde_json::from_str(&row.education)?,
            resume_text: row.resume_text,
            total_score: row.ats_score,
            keyword_score: row.keyword_score,
            skills_score: row.skills_score,
            experience_score: row.experience_score,
            education_score: row.education_score,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_resumes: usize,
    pub avg_score: f64,
    pub max_score: f64,
}

/// Database-file-backed store. Every operation opens and closes its own connection.
#[derive(Debug, Clone)]
pub struct ResumeStore {
    path: PathBuf,
}

impl ResumeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut conn = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .connect()
            .await?;

        sqlx::query(CREATE_RESUMES).execute(&mut conn).await?;
        debug!("Opened resume store at {}", self.path.display());
        Ok(conn)
    }

    pub async fn insert(&self, record: &CandidateRecord, scores: &ScoreBreakdown) -> Result<StoredResume> {
        let created_at = Utc::now();
        let skills = serde_json::to_string(&record.skills)?;
        let education = serde_json::to_string(&record.education)?;

        let mut conn = self.connect().await?;
        let id = sqlx::query(
            "INSERT INTO resumes (name, email, phone, skills, experience, education, resume_text, \
             ats_score, keyword_score, skills_score, experience_score, education_score, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(&skills)
        .bind(&record.experience_summary)
        .bind(&education)
        .bind(&record.raw_text)
        .bind(scores.total_score)
        .bind(scores.keyword_score)
        .bind(scores.skills_score)
        .bind(scores.experience_score)
        .bind(scores.education_score)
        .bind(created_at)
        .execute(&mut conn)
        .await?
        .last_insert_rowid();
        conn.close().await?;

        let stored = StoredResume {
            id,
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            skills: record.skills.clone(),
            experience: record.experience_summary.clone(),
            education: record.education.clone(),
            resume_text: record.raw_text.clone(),
            total_score: scores.total_score,
            keyword_score: scores.keyword_score,
            skills_score: scores.skills_score,
            experience_score: scores.experience_score,
            education_score: scores.education_score,
            created_at,
        };

        info!("Stored resume #{} ({}) with score {:.1}", stored.id, stored.name, stored.total_score);
        Ok(stored)
    }

    /// Records scoring at least `min_score`, best first.
    pub async fn find_matches(&self, min_score: f64) -> Result<Vec<StoredResume>> {
        let query = format!("{} WHERE ats_score >= ? ORDER BY ats_score DESC, id ASC", SELECT_RESUMES);

        let mut conn = self.connect().await?;
        let rows = sqlx::query_as::<_, ResumeRow>(&query)
            .bind(min_score)
            .fetch_all(&mut conn)
            .await?;
        conn.close().await?;

        debug!("{} resumes at or above {:.1}", rows.len(), min_score);
        rows.into_iter().map(StoredResume::try_from).collect()
    }

    /// Every record, newest first.
    pub async fn list_all(&self) -> Result<Vec<StoredResume>> {
        let query = format!("{} ORDER BY created_at DESC, id DESC", SELECT_RESUMES);

        let mut conn = self.connect().await?;
        let rows = sqlx::query_as::<_, ResumeRow>(&query).fetch_all(&mut conn).await?;
        conn.close().await?;

        rows.into_iter().map(StoredResume::try_from).collect()
    }

    pub async fn analytics(&self) -> Result<Analytics> {
        let mut conn = self.connect().await?;
        let (count, avg, max) = sqlx::query_as::<_, (i64, Option<f64>, Option<f64>)>(
            "SELECT COUNT(*), AVG(ats_score), MAX(ats_score) FROM resumes",
        )
        .fetch_one(&mut conn)
        .await?;
        conn.close().await?;

        Ok(Analytics {
            total_resumes: usize::try_from(count).unwrap_or(0),
            avg_score: avg.unwrap_or(0.0),
            max_score: max.unwrap_or(0.0),
        })
    }

    pub async fn score_distribution(&self) -> Result<Vec<f64>> {
        let mut conn = self.connect().await?;
        let scores = sqlx::query_scalar::<_, f64>("SELECT ats_score FROM resumes")
            .fetch_all(&mut conn)
            .await?;
        conn.close().await?;
        Ok(scores)
    }

    /// Remove every record, returning how many there were.
    pub async fn clear(&self) -> Result<u64> {
        let mut conn = self.connect().await?;
        let removed = sqlx::query("DELETE FROM resumes")
            .execute(&mut conn)
            .await?
            .rows_affected();
        conn.close().await?;

        info!("Cleared {} resumes from {}", removed, self.path.display());
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AtsError;
    use crate::processing::ComponentScores;

    fn candidate(name: &str) -> CandidateRecord {
        CandidateRecord {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: "Phone not found".to_string(),
            skills: vec!["python".to_string(), "sql".to_string()],
            experience_summary: "4 years".to_string(),
            education: vec!["master".to_string()],
            raw_text: format!("{}\nPython and SQL", name),
        }
    }

    fn scores(total_components: f64) -> ScoreBreakdown {
        ScoreBreakdown::from_components(ComponentScores {
            keyword: total_components,
            skills: total_components,
            experience: total_components,
            education: total_components,
        })
    }

    /// Writes a row whose skills column is not a JSON array.
    async fn insert_unreadable_row(store: &ResumeStore) {
        let mut conn = store.connect().await.unwrap();
        sqlx::query(
            "INSERT INTO resumes (name, email, phone, skills, experience, education, resume_text, \
             ats_score, keyword_score, skills_score, experience_score, education_score, created_at) \
             VALUES ('Broken', 'b@example.com', '', 'not json', '', '[]', '', 50.0, 0, 0, 0, 0, '2024-01-01T00:00:00Z')",
        )
        .execute(&mut conn)
        .await
        .unwrap();
        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("none.db"));

        assert!(store.list_all().await.unwrap().is_empty());
        let stats = store.analytics().await.unwrap();
        assert_eq!(stats.total_resumes, 0);
        assert_eq!(stats.avg_score, 0.0);
        assert_eq!(stats.max_score, 0.0);
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("data").join("resumes.db"));

        let first = store.insert(&candidate("Ada Lovelace"), &scores(90.0)).await.unwrap();
        let second = store.insert(&candidate("Alan Turing"), &scores(60.0)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let all = store.list_all().await.unwrap();
        assert_eq!(all[0].experience, "4 years");
        assert_eq!(all[0].skills, vec!["python", "sql"]);
        assert_eq!(all[0].education, vec!["master"]);
    }

    #[tokio::test]
    async fn test_find_matches_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("resumes.db"));

        store.insert(&candidate("Low Scorer"), &scores(40.0)).await.unwrap();
        store.insert(&candidate("Top Scorer"), &scores(95.0)).await.unwrap();
        store.insert(&candidate("Edge Case"), &scores(70.0)).await.unwrap();

        let matches = store.find_matches(70.0).await.unwrap();
        let names: Vec<&str> = matches.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec!["Top Scorer", "Edge Case"]);
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("resumes.db"));

        store.insert(&candidate("First In"), &scores(50.0)).await.unwrap();
        store.insert(&candidate("Second In"), &scores(50.0)).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all[0].name, "Second In");
        assert_eq!(all[1].name, "First In");
    }

    #[tokio::test]
    async fn test_analytics_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("resumes.db"));

        store.insert(&candidate("Ada Lovelace"), &scores(80.0)).await.unwrap();
        store.insert(&candidate("Alan Turing"), &scores(60.0)).await.unwrap();

        let stats = store.analytics().await.unwrap();
        assert_eq!(stats.total_resumes, 2);
        assert!((stats.avg_score - 70.0).abs() < 1e-9);
        assert!((stats.max_score - 80.0).abs() < 1e-9);

        assert_eq!(store.clear().await.unwrap(), 2);
        assert!(store.score_distribution().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_row_does_not_block_insert_or_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("resumes.db"));

        store.insert(&candidate("Ada Lovelace"), &scores(80.0)).await.unwrap();
        insert_unreadable_row(&store).await;

        let err = store.list_all().await.unwrap_err();
        assert!(matches!(err, AtsError::Serialization(_)));

        let third = store.insert(&candidate("Alan Turing"), &scores(60.0)).await.unwrap();
        assert_eq!(third.id, 3);
        assert_eq!(store.analytics().await.unwrap().total_resumes, 3);

        assert_eq!(store.clear().await.unwrap(), 3);
        assert!(store.list_all().await.unwrap().is_empty());
    }
}
