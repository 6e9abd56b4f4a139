use async_trait::async_trait;
use sqlx::{query_as, query_scalar, FromRow, Pool, Sqlite};
use tokio::sync::RwLock;

use crate::{
    models::{types::UtcDateTime, Feedback, FeedbackId, NewFeedback},
    repository::conversion::{DBConvertible, DBFromConversionError, DBToConversionError},
};

use super::{FeedbackStore, StoreError, StoreStatus};

/// SQLite-backed feedback storage.
///
/// The pool is optional: the service keeps accepting submissions while the
/// database is unreachable, and a pool can be attached once it comes back.
pub struct FeedbackRepository {
    pool: RwLock<Option<Pool<Sqlite>>>,
}

impl FeedbackRepository {
    pub fn connected(pool: Pool<Sqlite>) -> FeedbackRepository {
        FeedbackRepository {
            pool: RwLock::new(Some(pool)),
        }
    }

    pub fn disconnected() -> FeedbackRepository {
        FeedbackRepository {
            pool: RwLock::new(None),
        }
    }

    pub async fn attach(&self, pool: Pool<Sqlite>) {
        *self.pool.write().await = Some(pool);
    }

    /// Detaches and closes the pool. The repository reports
    /// [`StoreStatus::Disconnected`] afterwards.
    pub async fn close(&self) {
        let pool = self.pool.write().await.take();
        if let Some(pool) = pool {
            pool.close().await;
        }
    }

    async fn pool(&self) -> Result<Pool<Sqlite>, StoreError> {
        self.pool.read().await.clone().ok_or(StoreError::Unavailable)
    }

    pub async fn add_feedback(&self, feedback: &NewFeedback) -> Result<Feedback, StoreError> {
        let pool = self.pool().await?;
        let mut transaction = pool.begin().await?;

        let added_feedback = {
            let rating = feedback.rating.to_db()?;
            let created_at = feedback.created_at.to_db()?;

            query_as::<_, SqlFeedback>(
                r#"
                    INSERT INTO feedback (
                        full_name, email, phone, roll_no, branch,
                        useful, rating, suggestions, created_at
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    RETURNING *
                "#,
            )
            .bind(&feedback.full_name)
            .bind(&feedback.email)
            .bind(&feedback.phone)
            .bind(&feedback.roll_no)
            .bind(&feedback.branch)
            .bind(&feedback.useful)
            .bind(rating)
            .bind(&feedback.suggestions)
            .bind(created_at)
            .fetch_one(&mut *transaction)
            .await?
        };

        transaction.commit().await?;

        Ok(Feedback::from_db(&added_feedback)?)
    }

    #[cfg(test)]
    pub async fn list_feedback(&self) -> Result<Vec<Feedback>, StoreError> {
        let pool = self.pool().await?;

        let rows = query_as::<_, SqlFeedback>("SELECT * FROM feedback ORDER BY id")
            .fetch_all(&pool)
            .await?;

        let feedback = rows
            .iter()
            .map(Feedback::from_db)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(feedback)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let pool = self.pool().await?;

        let count = query_scalar::<_, i64>("SELECT COUNT(*) FROM feedback")
            .fetch_one(&pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl FeedbackStore for FeedbackRepository {
    async fn status(&self) -> StoreStatus {
        match *self.pool.read().await {
            Some(ref pool) if !pool.is_closed() => StoreStatus::Connected,
            _ => StoreStatus::Disconnected,
        }
    }

    async fn save(&self, feedback: &NewFeedback) -> Result<Feedback, StoreError> {
        self.add_feedback(feedback).await
    }
}

#[derive(Debug, FromRow)]
pub struct SqlFeedback {
    id: i64,
    full_name: String,
    email: String,
    phone: String,
    roll_no: String,
    branch: String,
    useful: String,
    rating: i64,
    suggestions: String,
    created_at: String,
}

impl DBConvertible for Feedback {
    type DBType = SqlFeedback;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(SqlFeedback {
            id: self.id.to_db()?,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            roll_no: self.roll_no.clone(),
            branch: self.branch.clone(),
            useful: self.useful.clone(),
            rating: self.rating.to_db()?,
            suggestions: self.suggestions.clone(),
            created_at: self.created_at.to_db()?,
        })
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(Feedback {
            id: FeedbackId::from_db(&value.id)?,
            full_name: value.full_name.clone(),
            email: value.email.clone(),
            phone: value.phone.clone(),
            roll_no: value.roll_no.clone(),
            branch: value.branch.clone(),
            useful: value.useful.clone(),
            rating: u8::from_db(&value.rating)?,
            suggestions: value.suggestions.clone(),
            created_at: UtcDateTime::from_db(&value.created_at)?,
        })
    }
}
