// Repository layer for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;

const EVENT_COLUMNS: &str = "id, event_type_id, venue_id, title, sub_title, description, \
     booking_code, image_filename, fee, conc_fee, multi_day_fee, multi_day_conc_fee, \
     event_state, created_at";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEventRow) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO events (event_type_id, venue_id, title, sub_title, description,
                booking_code, image_filename, fee, conc_fee, multi_day_fee, multi_day_conc_fee, event_state)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(input.event_type_id)
        .bind(input.venue_id)
        .bind(&input.title)
        .bind(&input.sub_title)
        .bind(&input.description)
        .bind(&input.booking_code)
        .bind(&input.image_filename)
        .bind(input.fee)
        .bind(input.conc_fee)
        .bind(input.multi_day_fee)
        .bind(input.multi_day_conc_fee)
        .bind(&input.event_state)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_events(&self) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            ORDER BY created_at ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_events_in_year(&self, year: i32) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events e
            WHERE EXISTS (
                SELECT 1 FROM event_dates d
                WHERE d.event_id = e.id AND EXTRACT(YEAR FROM d.event_datetime) = $1
            )
            ORDER BY created_at ASC
            "#
        ))
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_future_events(&self) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events e
            WHERE EXISTS (
                SELECT 1 FROM event_dates d
                WHERE d.event_id = e.id AND d.event_datetime >= CURRENT_DATE
            )
            ORDER BY created_at ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_event(&self, id: Uuid, input: UpdateEventRow) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            UPDATE events
            SET
                event_type_id = COALESCE($2, event_type_id),
                venue_id = COALESCE($3, venue_id),
                title = COALESCE($4, title),
                sub_title = COALESCE($5, sub_title),
                description = COALESCE($6, description),
                booking_code = COALESCE($7, booking_code),
                image_filename = COALESCE($8, image_filename),
                fee = COALESCE($9, fee),
                conc_fee = COALESCE($10, conc_fee),
                multi_day_fee = COALESCE($11, multi_day_fee),
                multi_day_conc_fee = COALESCE($12, multi_day_conc_fee),
                event_state = COALESCE($13, event_state)
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(input.event_type_id)
        .bind(input.venue_id)
        .bind(&input.title)
        .bind(&input.sub_title)
        .bind(&input.description)
        .bind(&input.booking_code)
        .bind(&input.image_filename)
        .bind(input.fee)
        .bind(input.conc_fee)
        .bind(input.multi_day_fee)
        .bind(input.multi_day_conc_fee)
        .bind(&input.event_state)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM event_date_speakers
            WHERE event_date_id IN (SELECT id FROM event_dates WHERE event_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM event_dates WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Occurrences (event dates)
    // ============================================

    /// Insert an occurrence together with its speaker assignments in one
    /// transaction
    pub async fn create_event_date(&self, input: CreateEventDateRow) -> Result<EventDateRow> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, EventDateRow>(
            r#"
            INSERT INTO event_dates (event_id, event_datetime, end_time)
            VALUES ($1, $2, $3)
            RETURNING id, event_id, event_datetime, end_time, created_at
            "#,
        )
        .bind(input.event_id)
        .bind(input.event_datetime)
        .bind(input.end_time)
        .fetch_one(&mut *tx)
        .await?;

        for speaker_id in &input.speaker_ids {
            sqlx::query(
                r#"
                INSERT INTO event_date_speakers (event_date_id, speaker_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(row.id)
            .bind(speaker_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(row)
    }

    pub async fn list_event_dates(&self, event_id: Uuid) -> Result<Vec<EventDateRow>> {
        let rows = sqlx::query_as::<_, EventDateRow>(
            r#"
            SELECT id, event_id, event_datetime, end_time, created_at
            FROM event_dates
            WHERE event_id = $1
            ORDER BY event_datetime ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn event_date_speaker_ids(&self, event_date_id: Uuid) -> Result<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT speaker_id
            FROM event_date_speakers
            WHERE event_date_id = $1
            ORDER BY speaker_id ASC
            "#,
        )
        .bind(event_date_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Replace an occurrence's speaker set wholesale
    pub async fn replace_event_date_speakers(
        &self,
        event_date_id: Uuid,
        speaker_ids: &[Uuid],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM event_date_speakers WHERE event_date_id = $1")
            .bind(event_date_id)
            .execute(&mut *tx)
            .await?;

        for speaker_id in speaker_ids {
            sqlx::query(
                r#"
                INSERT INTO event_date_speakers (event_date_id, speaker_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(event_date_id)
            .bind(speaker_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    // ============================================
    // Speakers
    // ============================================

    pub async fn create_speaker(&self, input: CreateSpeakerRow) -> Result<SpeakerRow> {
        let row = sqlx::query_as::<_, SpeakerRow>(
            r#"
            INSERT INTO speakers (name, parent_id)
            VALUES ($1, $2)
            RETURNING id, name, parent_id, created_at
            "#,
        )
        .bind(&input.name)
        .bind(input.parent_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_speaker(&self, id: Uuid) -> Result<Option<SpeakerRow>> {
        let row = sqlx::query_as::<_, SpeakerRow>(
            r#"
            SELECT id, name, parent_id, created_at
            FROM speakers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_speakers(&self) -> Result<Vec<SpeakerRow>> {
        let rows = sqlx::query_as::<_, SpeakerRow>(
            r#"
            SELECT id, name, parent_id, created_at
            FROM speakers
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Event types
    // ============================================

    pub async fn create_event_type(&self, input: CreateEventTypeRow) -> Result<EventTypeRow> {
        let row = sqlx::query_as::<_, EventTypeRow>(
            r#"
            INSERT INTO event_types (event_type, event_desc, duration)
            VALUES ($1, $2, $3)
            RETURNING id, event_type, event_desc, duration, created_at
            "#,
        )
        .bind(&input.event_type)
        .bind(&input.event_desc)
        .bind(input.duration)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event_type(&self, id: Uuid) -> Result<Option<EventTypeRow>> {
        let row = sqlx::query_as::<_, EventTypeRow>(
            r#"
            SELECT id, event_type, event_desc, duration, created_at
            FROM event_types
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_event_types(&self) -> Result<Vec<EventTypeRow>> {
        let rows = sqlx::query_as::<_, EventTypeRow>(
            r#"
            SELECT id, event_type, event_desc, duration, created_at
            FROM event_types
            ORDER BY event_type ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Venues
    // ============================================

    pub async fn create_venue(&self, input: CreateVenueRow) -> Result<VenueRow> {
        let row = sqlx::query_as::<_, VenueRow>(
            r#"
            INSERT INTO venues (name, address, directions)
            VALUES ($1, $2, $3)
            RETURNING id, name, address, directions, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.directions)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_venue(&self, id: Uuid) -> Result<Option<VenueRow>> {
        let row = sqlx::query_as::<_, VenueRow>(
            r#"
            SELECT id, name, address, directions, created_at
            FROM venues
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
