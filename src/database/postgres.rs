use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::{ApplicationScope, OfferOrder, OfferQuery, Store, StoreError, StoreResult};
use crate::models::{
    application::{Application, ApplicationStatus},
    candidate::Candidate,
    company::Company,
    job_offer::JobOffer,
};

const COMPANY_COLUMNS: &str =
    "id, identity_id, name, description, location, phone, website, created_at";

const CANDIDATE_COLUMNS: &str =
    "id, identity_id, phone, location, skills, experience, resume, created_at";

const APPLICATION_COLUMNS: &str =
    "id, candidate_id, job_offer_id, application_date, status, cover_letter, notes";

const OFFER_COLUMNS: &str = r#"o.id, o.title, o.description, o.category, o.company_id, c.name AS company_name,
       o.location, o.salary, o.requirements, o.publication_date, o.deadline, o.is_active"#;

/// `source` must expose the offer columns under the alias `o`.
fn offer_select(source: &str) -> String {
    format!(
        "SELECT {} FROM {} JOIN companies c ON c.id = o.company_id",
        OFFER_COLUMNS, source
    )
}

#[derive(Debug, FromRow)]
struct JobOfferRow {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    company_id: Uuid,
    company_name: String,
    location: String,
    salary: Option<Decimal>,
    requirements: String,
    publication_date: DateTime<Utc>,
    deadline: NaiveDate,
    is_active: bool,
}

impl TryFrom<JobOfferRow> for JobOffer {
    type Error = StoreError;

    fn try_from(row: JobOfferRow) -> StoreResult<Self> {
        let category = row
            .category
            .parse()
            .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))?;
        Ok(JobOffer {
            id: row.id,
            title: row.title,
            description: row.description,
            category,
            company_id: row.company_id,
            company_name: row.company_name,
            location: row.location,
            salary: row.salary,
            requirements: row.requirements,
            publication_date: row.publication_date,
            deadline: row.deadline,
            is_active: row.is_active,
        })
    }
}

#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: Uuid,
    candidate_id: Uuid,
    job_offer_id: Uuid,
    application_date: DateTime<Utc>,
    status: String,
    cover_letter: String,
    notes: Option<String>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = StoreError;

    fn try_from(row: ApplicationRow) -> StoreResult<Self> {
        let status = row
            .status
            .parse()
            .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))?;
        Ok(Application {
            id: row.id,
            candidate_id: row.candidate_id,
            job_offer_id: row.job_offer_id,
            application_date: row.application_date,
            status,
            cover_letter: row.cover_letter,
            notes: row.notes,
        })
    }
}

fn collect<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Violation {
    Unique,
    ForeignKey,
}

fn violation(err: &sqlx::Error) -> Option<Violation> {
    let code = err.as_database_error()?.code()?;
    match &*code {
        "23505" => Some(Violation::Unique),
        "23503" => Some(Violation::ForeignKey),
        _ => None,
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a transaction in which `identity_id` is known to own no profile yet.
    async fn begin_profile_insert(
        &self,
        identity_id: Uuid,
    ) -> StoreResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;

        // Serializes registrations of the same identity across both profile tables.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(identity_id.to_string())
            .execute(&mut *tx)
            .await?;

        let taken: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM companies WHERE identity_id = $1)
                   OR EXISTS(SELECT 1 FROM candidates WHERE identity_id = $1)"#,
        )
        .bind(identity_id)
        .fetch_one(&mut *tx)
        .await?;
        if taken {
            return Err(StoreError::ProfileExists);
        }
        Ok(tx)
    }
}

fn profile_insert_error(err: sqlx::Error) -> StoreError {
    match violation(&err) {
        Some(Violation::Unique) => StoreError::ProfileExists,
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_company_by_identity(&self, identity_id: Uuid) -> StoreResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE identity_id = $1",
            COMPANY_COLUMNS
        ))
        .bind(identity_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn find_candidate_by_identity(
        &self,
        identity_id: Uuid,
    ) -> StoreResult<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {} FROM candidates WHERE identity_id = $1",
            CANDIDATE_COLUMNS
        ))
        .bind(identity_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(candidate)
    }

    async fn insert_company(&self, company: Company) -> StoreResult<Company> {
        let mut tx = self.begin_profile_insert(company.identity_id).await?;
        let inserted = sqlx::query_as::<_, Company>(&format!(
            r#"INSERT INTO companies (id, identity_id, name, description, location, phone, website, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {}"#,
            COMPANY_COLUMNS
        ))
        .bind(company.id)
        .bind(company.identity_id)
        .bind(&company.name)
        .bind(&company.description)
        .bind(&company.location)
        .bind(&company.phone)
        .bind(&company.website)
        .bind(company.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(profile_insert_error)?;
        tx.commit().await?;
        Ok(inserted)
    }

    async fn insert_candidate(&self, candidate: Candidate) -> StoreResult<Candidate> {
        let mut tx = self.begin_profile_insert(candidate.identity_id).await?;
        let inserted = sqlx::query_as::<_, Candidate>(&format!(
            r#"INSERT INTO candidates (id, identity_id, phone, location, skills, experience, resume, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {}"#,
            CANDIDATE_COLUMNS
        ))
        .bind(candidate.id)
        .bind(candidate.identity_id)
        .bind(&candidate.phone)
        .bind(&candidate.location)
        .bind(&candidate.skills)
        .bind(&candidate.experience)
        .bind(&candidate.resume)
        .bind(candidate.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(profile_insert_error)?;
        tx.commit().await?;
        Ok(inserted)
    }

    async fn update_company(&self, company: Company) -> StoreResult<Company> {
        let updated = sqlx::query_as::<_, Company>(&format!(
            r#"UPDATE companies
               SET name = $2, description = $3, location = $4, phone = $5, website = $6
               WHERE id = $1
               RETURNING {}"#,
            COMPANY_COLUMNS
        ))
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.description)
        .bind(&company.location)
        .bind(&company.phone)
        .bind(&company.website)
        .fetch_optional(&self.pool)
        .await?;
        updated.ok_or(StoreError::NotFound)
    }

    async fn update_candidate(&self, candidate: Candidate) -> StoreResult<Candidate> {
        let updated = sqlx::query_as::<_, Candidate>(&format!(
            r#"UPDATE candidates
               SET phone = $2, location = $3, skills = $4, experience = $5, resume = $6
               WHERE id = $1
               RETURNING {}"#,
            CANDIDATE_COLUMNS
        ))
        .bind(candidate.id)
        .bind(&candidate.phone)
        .bind(&candidate.location)
        .bind(&candidate.skills)
        .bind(&candidate.experience)
        .bind(&candidate.resume)
        .fetch_optional(&self.pool)
        .await?;
        updated.ok_or(StoreError::NotFound)
    }

    async fn delete_profiles(&self, identity_id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        let companies = sqlx::query("DELETE FROM companies WHERE identity_id = $1")
            .bind(identity_id)
            .execute(&mut *tx)
            .await?;
        let candidates = sqlx::query("DELETE FROM candidates WHERE identity_id = $1")
            .bind(identity_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(companies.rows_affected() + candidates.rows_affected() > 0)
    }

    async fn insert_offer(&self, offer: JobOffer) -> StoreResult<JobOffer> {
        let row = sqlx::query_as::<_, JobOfferRow>(&format!(
            r#"WITH o AS (
                   INSERT INTO job_offers (
                       id, title, description, category, company_id, location,
                       salary, requirements, publication_date, deadline, is_active
                   ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                   RETURNING *
               )
               {}"#,
            offer_select("o")
        ))
        .bind(offer.id)
        .bind(&offer.title)
        .bind(&offer.description)
        .bind(offer.category.as_str())
        .bind(offer.company_id)
        .bind(&offer.location)
        .bind(offer.salary)
        .bind(&offer.requirements)
        .bind(offer.publication_date)
        .bind(offer.deadline)
        .bind(offer.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match violation(&e) {
            Some(Violation::ForeignKey) => StoreError::NotFound,
            _ => StoreError::Database(e),
        })?;
        JobOffer::try_from(row)
    }

    async fn get_offer(&self, id: Uuid) -> StoreResult<Option<JobOffer>> {
        let row = sqlx::query_as::<_, JobOfferRow>(&format!(
            "{} WHERE o.id = $1",
            offer_select("job_offers o")
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(JobOffer::try_from).transpose()
    }

    async fn update_offer(&self, offer: JobOffer) -> StoreResult<JobOffer> {
        let row = sqlx::query_as::<_, JobOfferRow>(&format!(
            r#"WITH o AS (
                   UPDATE job_offers
                   SET title = $2, description = $3, category = $4, location = $5,
                       salary = $6, requirements = $7, deadline = $8, is_active = $9
                   WHERE id = $1
                   RETURNING *
               )
               {}"#,
            offer_select("o")
        ))
        .bind(offer.id)
        .bind(&offer.title)
        .bind(&offer.description)
        .bind(offer.category.as_str())
        .bind(&offer.location)
        .bind(offer.salary)
        .bind(&offer.requirements)
        .bind(offer.deadline)
        .bind(offer.is_active)
        .fetch_optional(&self.pool)
        .await?;
        row.map(JobOffer::try_from)
            .transpose()?
            .ok_or(StoreError::NotFound)
    }

    async fn delete_offer(&self, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM job_offers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_offers(&self, query: OfferQuery) -> StoreResult<Vec<JobOffer>> {
        let mut statement = QueryBuilder::<Postgres>::new(offer_select("job_offers o"));
        statement.push(" WHERE TRUE");

        // Mirrors JobOffer::is_open.
        if let Some(today) = query.open_on {
            statement
                .push(" AND o.is_active AND o.deadline >= ")
                .push_bind(today);
        }
        if let Some(company_id) = query.company_id {
            statement.push(" AND o.company_id = ").push_bind(company_id);
        }
        if let Some(category) = query.category {
            statement.push(" AND o.category = ").push_bind(category.as_str());
        }
        if let Some(last_day) = query.deadline_until {
            statement.push(" AND o.deadline <= ").push_bind(last_day);
        }
        if let Some(term) = &query.search {
            let pattern = format!("%{}%", escape_like(term));
            statement
                .push(" AND (o.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR o.description ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR c.name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        statement.push(match query.order {
            OfferOrder::NewestFirst => " ORDER BY o.publication_date DESC, o.id ASC",
            OfferOrder::DeadlineFirst => {
                " ORDER BY o.deadline ASC, o.publication_date DESC, o.id ASC"
            }
        });
        if let Some(limit) = query.limit {
            statement.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows = statement
            .build_query_as::<JobOfferRow>()
            .fetch_all(&self.pool)
            .await?;
        collect(rows)
    }

    async fn insert_application(
        &self,
        application: Application,
        today: NaiveDate,
    ) -> StoreResult<Application> {
        let mut tx = self.pool.begin().await?;

        // FOR SHARE keeps the offer from being retracted or edited until we commit.
        let offer = sqlx::query_as::<_, JobOfferRow>(&format!(
            "{} WHERE o.id = $1 FOR SHARE OF o",
            offer_select("job_offers o")
        ))
        .bind(application.job_offer_id)
        .fetch_optional(&mut *tx)
        .await?
        .map(JobOffer::try_from)
        .transpose()?
        .ok_or(StoreError::NotFound)?;

        let duplicate: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM applications WHERE candidate_id = $1 AND job_offer_id = $2)",
        )
        .bind(application.candidate_id)
        .bind(application.job_offer_id)
        .fetch_one(&mut *tx)
        .await?;
        if duplicate {
            return Err(StoreError::DuplicateApplication);
        }
        if !offer.is_open(today) {
            return Err(StoreError::OfferClosed);
        }

        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"INSERT INTO applications (id, candidate_id, job_offer_id, application_date, status, cover_letter, notes)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {}"#,
            APPLICATION_COLUMNS
        ))
        .bind(application.id)
        .bind(application.candidate_id)
        .bind(application.job_offer_id)
        .bind(application.application_date)
        .bind(application.status.as_str())
        .bind(&application.cover_letter)
        .bind(&application.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match violation(&e) {
            Some(Violation::Unique) => StoreError::DuplicateApplication,
            Some(Violation::ForeignKey) => StoreError::NotFound,
            None => StoreError::Database(e),
        })?;

        tx.commit().await?;
        Application::try_from(row)
    }

    async fn get_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {} FROM applications WHERE id = $1",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Application::try_from).transpose()
    }

    async fn find_application(
        &self,
        candidate_id: Uuid,
        job_offer_id: Uuid,
    ) -> StoreResult<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {} FROM applications WHERE candidate_id = $1 AND job_offer_id = $2",
            APPLICATION_COLUMNS
        ))
        .bind(candidate_id)
        .bind(job_offer_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Application::try_from).transpose()
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> StoreResult<Application> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "UPDATE applications SET status = $3 WHERE id = $1 AND status = $2 RETURNING {}",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Application::try_from(row),
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM applications WHERE id = $1)")
                        .bind(id)
                        .fetch_one(&self.pool)
                        .await?;
                Err(if exists {
                    StoreError::StaleStatus
                } else {
                    StoreError::NotFound
                })
            }
        }
    }

    async fn delete_application(&self, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_applications(&self, scope: ApplicationScope) -> StoreResult<Vec<Application>> {
        let (filter, owner) = match scope {
            ApplicationScope::Candidate(id) => ("a.candidate_id = $1", id),
            ApplicationScope::Offer(id) => ("a.job_offer_id = $1", id),
            ApplicationScope::Company(id) => (
                "a.job_offer_id IN (SELECT id FROM job_offers WHERE company_id = $1)",
                id,
            ),
        };
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"SELECT a.id, a.candidate_id, a.job_offer_id, a.application_date, a.status, a.cover_letter, a.notes
               FROM applications a
               WHERE {}
               ORDER BY a.application_date DESC, a.id ASC"#,
            filter
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        collect(rows)
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
