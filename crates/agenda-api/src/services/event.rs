// Event reconciliation coordinator
//
// Orchestrates one event mutation end to end: occurrence diffing, persistence
// of the create/update groups, pricing-gated payment-button sync, and image
// handling. Button failures on the update path are collected as non-fatal
// errors so a provider hiccup never rolls back a legitimate content edit.

use std::sync::Arc;

use chrono::Datelike;
use uuid::Uuid;

use agenda_contracts::{
    CreateEventRequest, Event, EventDate, EventDatePayload, Speaker as SpeakerDto,
    UpdateEventRequest, UpdatedEvent,
};
use agenda_core::{
    parse_event_datetime, reconcile, resolve_speakers, slot_key, validate_pricing, AssetStore,
    ButtonSpec, ButtonSync, EventError, EventState, OccurrencePlan, PersistedOccurrence,
    PricingSnapshot, PricingTierSet, Result, SubmittedOccurrence,
};
use agenda_storage::{CreateEventDateRow, CreateEventRow, EventRow, StorageBackend, UpdateEventRow};

pub struct EventService {
    store: StorageBackend,
    buttons: Arc<dyn ButtonSync>,
    assets: Arc<dyn AssetStore>,
}

impl EventService {
    pub fn new(
        store: StorageBackend,
        buttons: Arc<dyn ButtonSync>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            store,
            buttons,
            assets,
        }
    }

    /// Create an event with its initial occurrences. For priced events the
    /// payment button is created as part of the request, and a provider
    /// failure here is fatal.
    pub async fn create(&self, req: CreateEventRequest) -> Result<Event> {
        validate_pricing(req.fee, req.conc_fee)?;

        self.store
            .get_event_type(req.event_type_id)
            .await?
            .ok_or_else(|| EventError::not_found("event type", req.event_type_id))?;
        self.store
            .get_venue(req.venue_id)
            .await?
            .ok_or_else(|| EventError::not_found("venue", req.venue_id))?;

        let submitted = parse_submitted(&req.event_dates)?;

        let mut event = self
            .store
            .create_event(CreateEventRow {
                event_type_id: req.event_type_id,
                venue_id: req.venue_id,
                title: req.title.clone(),
                sub_title: req.sub_title.clone(),
                description: req.description.clone(),
                booking_code: None,
                image_filename: None,
                fee: req.fee,
                conc_fee: req.conc_fee,
                multi_day_fee: req.multi_day_fee,
                multi_day_conc_fee: req.multi_day_conc_fee,
                event_state: req.event_state.unwrap_or(EventState::Draft).to_string(),
            })
            .await?;

        // Initial occurrences run through the same plan as updates, which
        // de-duplicates slots within one submission
        let plan = reconcile(&[], &submitted);
        self.apply_plan(event.id, &plan).await?;

        if req.fee.is_some() {
            let snapshot = pricing_of(&event);
            let code = self
                .synchronize_pricing(event.id, event.title.clone(), &snapshot, None)
                .await?;
            event = self
                .store
                .update_event(
                    event.id,
                    UpdateEventRow {
                        booking_code: Some(code),
                        ..Default::default()
                    },
                )
                .await?
                .ok_or_else(|| EventError::not_found("event", event.id))?;
        }

        let event = self
            .store_image(
                &event,
                req.image_filename.as_deref(),
                req.image_data.as_deref(),
            )
            .await?;

        self.event_dto(event).await
    }

    /// Update an event: reconcile occurrences, detect pricing changes, sync
    /// the payment button, handle image assets. Returns the updated event
    /// plus the accumulated non-fatal error list.
    pub async fn update(&self, event_id: Uuid, req: UpdateEventRequest) -> Result<UpdatedEvent> {
        let event = self
            .store
            .get_event(event_id)
            .await?
            .ok_or_else(|| EventError::not_found("event", event_id))?;

        if req.fee.is_some() || req.conc_fee.is_some() {
            validate_pricing(req.fee, req.conc_fee)?;
        }

        let submitted = parse_submitted(&req.event_dates)?;
        let persisted = self.load_persisted(event_id).await?;
        let plan = reconcile(&persisted, &submitted);
        self.apply_plan(event_id, &plan).await?;

        let mut errors = Vec::new();
        let mut booking_code = req.booking_code.clone();

        // Only a changed pricing tuple touches the external button; unchanged
        // pricing must not invoke the synchronizer at all
        if req.fee.is_some() {
            let current = pricing_of(&event);
            let submitted_pricing = PricingSnapshot {
                fee: req.fee,
                conc_fee: req.conc_fee,
                multi_day_fee: req.multi_day_fee,
                multi_day_conc_fee: req.multi_day_conc_fee,
                event_type_id: req.event_type_id.unwrap_or(event.event_type_id),
            };

            if submitted_pricing != current {
                let title = req.title.clone().unwrap_or_else(|| event.title.clone());
                let known_code = booking_code
                    .clone()
                    .or_else(|| event.booking_code.clone())
                    .filter(|code| !code.is_empty());

                match self
                    .synchronize_pricing(event_id, title, &submitted_pricing, known_code)
                    .await
                {
                    Ok(code) => booking_code = Some(code),
                    Err(EventError::Payment(message)) => {
                        tracing::error!(event_id = %event_id, error = %message, "payment button sync failed");
                        errors.push(message);
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        let updated = self
            .store
            .update_event(
                event_id,
                UpdateEventRow {
                    event_type_id: req.event_type_id,
                    venue_id: req.venue_id,
                    title: req.title.clone(),
                    sub_title: req.sub_title.clone(),
                    description: req.description.clone(),
                    booking_code,
                    image_filename: None,
                    fee: req.fee,
                    conc_fee: req.conc_fee,
                    multi_day_fee: req.multi_day_fee,
                    multi_day_conc_fee: req.multi_day_conc_fee,
                    event_state: req.event_state.map(|state| state.to_string()),
                },
            )
            .await?
            .ok_or_else(|| EventError::not_found("event", event_id))?;

        // Image handling runs after occurrence persistence so the year of
        // the first occurrence reflects final data
        let updated = self
            .store_image(
                &updated,
                req.image_filename.as_deref(),
                req.image_data.as_deref(),
            )
            .await?;

        let event = self.event_dto(updated).await?;
        Ok(UpdatedEvent { event, errors })
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Event>> {
        match self.store.get_event(id).await? {
            Some(row) => Ok(Some(self.event_dto(row).await?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> Result<Vec<Event>> {
        self.collect_dtos(self.store.list_events().await?).await
    }

    pub async fn list_future(&self) -> Result<Vec<Event>> {
        self.collect_dtos(self.store.list_future_events().await?)
            .await
    }

    pub async fn list_in_year(&self, year: i32) -> Result<Vec<Event>> {
        self.collect_dtos(self.store.list_events_in_year(year).await?)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.store.delete_event(id).await?)
    }

    // ============================================
    // Internals
    // ============================================

    async fn load_persisted(&self, event_id: Uuid) -> Result<Vec<PersistedOccurrence>> {
        let rows = self.store.list_event_dates(event_id).await?;
        let mut occurrences = Vec::with_capacity(rows.len());
        for row in rows {
            let speaker_ids = self.store.event_date_speaker_ids(row.id).await?;
            occurrences.push(PersistedOccurrence {
                id: row.id,
                event_datetime: row.event_datetime,
                end_time: row.end_time,
                speaker_ids,
            });
        }
        Ok(occurrences)
    }

    /// Persist a reconciliation plan: creates first, then in-place speaker
    /// replacements in slot order. Every submitted speaker id resolves
    /// through the store; the first unresolvable one aborts the request.
    async fn apply_plan(&self, event_id: Uuid, plan: &OccurrencePlan) -> Result<()> {
        for occ in &plan.to_create {
            let speakers = resolve_speakers(&self.store, &occ.speaker_ids).await?;
            tracing::info!(event_id = %event_id, slot = %occ.slot(), "adding event date");
            self.store
                .create_event_date(CreateEventDateRow {
                    event_id,
                    event_datetime: occ.event_datetime,
                    end_time: occ.end_time,
                    speaker_ids: speakers.iter().map(|s| s.id).collect(),
                })
                .await?;
        }

        for update in &plan.to_update {
            let speakers = resolve_speakers(&self.store, &update.speaker_ids).await?;
            let speaker_ids: Vec<Uuid> = speakers.iter().map(|s| s.id).collect();
            self.store
                .replace_event_date_speakers(update.occurrence_id, &speaker_ids)
                .await?;
        }

        Ok(())
    }

    async fn synchronize_pricing(
        &self,
        event_id: Uuid,
        title: String,
        snapshot: &PricingSnapshot,
        booking_code: Option<String>,
    ) -> Result<String> {
        let fee = snapshot
            .fee
            .ok_or_else(|| EventError::validation("pricing sync requires a fee"))?;
        let conc_fee = snapshot
            .conc_fee
            .ok_or_else(|| EventError::validation("pricing sync requires a conc_fee"))?;

        let event_type = self
            .store
            .get_event_type(snapshot.event_type_id)
            .await?
            .ok_or_else(|| EventError::not_found("event type", snapshot.event_type_id))?;

        let multi_day = match (snapshot.multi_day_fee, snapshot.multi_day_conc_fee) {
            (Some(all_fee), Some(all_conc_fee)) => Some((all_fee, all_conc_fee)),
            _ => None,
        };
        let tiers = PricingTierSet::build(
            fee,
            conc_fee,
            multi_day,
            event_type.event_type == "Talk",
        );

        self.buttons
            .synchronize(&ButtonSpec {
                item_id: event_id.to_string(),
                title,
                tiers,
                booking_code,
                require_existing: false,
            })
            .await
    }

    async fn store_image(
        &self,
        event: &EventRow,
        image_filename: Option<&str>,
        image_data: Option<&str>,
    ) -> Result<EventRow> {
        if let Some(data) = image_data {
            let dates = self.store.list_event_dates(event.id).await?;
            let first = dates.first().ok_or_else(|| {
                EventError::validation("cannot store an image for an event with no dates")
            })?;
            let destination = format!("{}/{}", first.event_datetime.year(), event.id);

            self.assets
                .upload_from_base64(image_filename.unwrap_or("upload"), &destination, data)
                .await?;

            let row = self
                .store
                .update_event(
                    event.id,
                    UpdateEventRow {
                        image_filename: Some(destination),
                        ..Default::default()
                    },
                )
                .await?
                .ok_or_else(|| EventError::not_found("event", event.id))?;
            return Ok(row);
        }

        if let Some(filename) = image_filename {
            if !self.assets.blob_exists(filename).await? {
                return Err(EventError::validation(format!("{filename} does not exist")));
            }
            let row = self
                .store
                .update_event(
                    event.id,
                    UpdateEventRow {
                        image_filename: Some(filename.to_string()),
                        ..Default::default()
                    },
                )
                .await?
                .ok_or_else(|| EventError::not_found("event", event.id))?;
            return Ok(row);
        }

        Ok(event.clone())
    }

    async fn collect_dtos(&self, rows: Vec<EventRow>) -> Result<Vec<Event>> {
        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            events.push(self.event_dto(row).await?);
        }
        // Events list in first-occurrence order; date-less events sort first
        events.sort_by(|a, b| start_key(a).cmp(&start_key(b)));
        Ok(events)
    }

    async fn event_dto(&self, row: EventRow) -> Result<Event> {
        let date_rows = self.store.list_event_dates(row.id).await?;
        let mut event_dates = Vec::with_capacity(date_rows.len());

        for date in date_rows {
            let speaker_ids = self.store.event_date_speaker_ids(date.id).await?;
            let mut speakers = Vec::with_capacity(speaker_ids.len());
            for id in speaker_ids {
                // Weak references: a dangling assignment is skipped, not fatal
                if let Some(speaker) = self.store.get_speaker(id).await? {
                    speakers.push(SpeakerDto {
                        id: speaker.id,
                        name: speaker.name,
                        parent_id: speaker.parent_id,
                    });
                }
            }
            event_dates.push(EventDate {
                id: date.id,
                event_id: date.event_id,
                event_datetime: slot_key(&date.event_datetime),
                end_time: date.end_time.map(|t| slot_key(&t)),
                speakers,
            });
        }

        Ok(Event {
            id: row.id,
            event_type_id: row.event_type_id,
            venue_id: row.venue_id,
            title: row.title,
            sub_title: row.sub_title,
            description: row.description,
            booking_code: row.booking_code,
            image_filename: row.image_filename,
            fee: row.fee,
            conc_fee: row.conc_fee,
            multi_day_fee: row.multi_day_fee,
            multi_day_conc_fee: row.multi_day_conc_fee,
            event_state: EventState::from(row.event_state.as_str()),
            event_dates,
            created_at: row.created_at,
        })
    }
}

fn parse_submitted(dates: &[EventDatePayload]) -> Result<Vec<SubmittedOccurrence>> {
    dates
        .iter()
        .map(|payload| {
            let event_datetime = parse_event_datetime(&payload.event_date)?;
            let end_time = payload
                .end_time
                .as_deref()
                .map(parse_event_datetime)
                .transpose()?;
            let speaker_ids = payload.speakers.iter().map(|s| s.speaker_id).collect();
            Ok(SubmittedOccurrence::new(
                event_datetime,
                end_time,
                speaker_ids,
            ))
        })
        .collect()
}

fn pricing_of(event: &EventRow) -> PricingSnapshot {
    PricingSnapshot {
        fee: event.fee,
        conc_fee: event.conc_fee,
        multi_day_fee: event.multi_day_fee,
        multi_day_conc_fee: event.multi_day_conc_fee,
        event_type_id: event.event_type_id,
    }
}

fn start_key(event: &Event) -> Option<String> {
    event
        .event_dates
        .first()
        .map(|date| date.event_datetime.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_contracts::SpeakerRef;
    use agenda_storage::{CreateEventTypeRow, CreateSpeakerRow, CreateVenueRow};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeButtonSync {
        calls: AtomicUsize,
        fail_with: Option<String>,
    }

    impl FakeButtonSync {
        fn succeeding() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_with: None,
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_with: Some(message.to_string()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ButtonSync for FakeButtonSync {
        async fn synchronize(&self, _spec: &ButtonSpec) -> agenda_core::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(message) => Err(EventError::payment(message.clone())),
                None => Ok("BTN-1".to_string()),
            }
        }
    }

    #[derive(Default)]
    struct FakeAssetStore {
        uploads: Mutex<Vec<(String, String)>>,
        existing: Mutex<HashSet<String>>,
    }

    #[async_trait]
    impl AssetStore for FakeAssetStore {
        async fn blob_exists(&self, path: &str) -> agenda_core::Result<bool> {
            Ok(self.existing.lock().unwrap().contains(path))
        }

        async fn upload_from_base64(
            &self,
            filename: &str,
            destination: &str,
            _data: &str,
        ) -> agenda_core::Result<()> {
            self.uploads
                .lock()
                .unwrap()
                .push((filename.to_string(), destination.to_string()));
            Ok(())
        }
    }

    struct Harness {
        service: EventService,
        store: StorageBackend,
        buttons: Arc<FakeButtonSync>,
        assets: Arc<FakeAssetStore>,
        event_type_id: Uuid,
        venue_id: Uuid,
    }

    async fn harness(buttons: Arc<FakeButtonSync>) -> Harness {
        let store = StorageBackend::in_memory();
        let event_type = store
            .create_event_type(CreateEventTypeRow {
                event_type: "Talk".into(),
                event_desc: None,
                duration: Some(90),
            })
            .await
            .unwrap();
        let venue = store
            .create_venue(CreateVenueRow {
                name: "Main hall".into(),
                address: "1 High Street".into(),
                directions: None,
            })
            .await
            .unwrap();
        let assets = Arc::new(FakeAssetStore::default());

        Harness {
            service: EventService::new(store.clone(), buttons.clone(), assets.clone()),
            store,
            buttons,
            assets,
            event_type_id: event_type.id,
            venue_id: venue.id,
        }
    }

    impl Harness {
        async fn seed_event(&self, fee: Option<i32>, conc_fee: Option<i32>) -> EventRow {
            self.store
                .create_event(CreateEventRow {
                    event_type_id: self.event_type_id,
                    venue_id: self.venue_id,
                    title: "Annual lecture".into(),
                    sub_title: None,
                    description: "A talk".into(),
                    booking_code: None,
                    image_filename: None,
                    fee,
                    conc_fee,
                    multi_day_fee: None,
                    multi_day_conc_fee: None,
                    event_state: "draft".into(),
                })
                .await
                .unwrap()
        }

        async fn seed_speaker(&self, name: &str) -> Uuid {
            self.store
                .create_speaker(CreateSpeakerRow {
                    name: name.into(),
                    parent_id: None,
                })
                .await
                .unwrap()
                .id
        }

        async fn seed_date(&self, event_id: Uuid, datetime: &str, speakers: &[Uuid]) {
            self.store
                .create_event_date(CreateEventDateRow {
                    event_id,
                    event_datetime: parse_event_datetime(datetime).unwrap(),
                    end_time: None,
                    speaker_ids: speakers.to_vec(),
                })
                .await
                .unwrap();
        }
    }

    fn date_payload(datetime: &str, speakers: &[Uuid]) -> EventDatePayload {
        EventDatePayload {
            event_date: datetime.into(),
            end_time: None,
            speakers: speakers
                .iter()
                .map(|id| SpeakerRef { speaker_id: *id })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_unchanged_pricing_does_not_invoke_the_synchronizer() {
        let h = harness(FakeButtonSync::succeeding()).await;
        let event = h.seed_event(Some(5), Some(3)).await;

        let result = h
            .service
            .update(
                event.id,
                UpdateEventRequest {
                    fee: Some(5),
                    conc_fee: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(h.buttons.call_count(), 0);
        assert!(result.errors.is_empty());
        assert_eq!(result.event.booking_code, None);
    }

    #[tokio::test]
    async fn test_changed_pricing_syncs_and_stores_booking_code() {
        let h = harness(FakeButtonSync::succeeding()).await;
        let event = h.seed_event(Some(5), Some(3)).await;

        let result = h
            .service
            .update(
                event.id,
                UpdateEventRequest {
                    fee: Some(10),
                    conc_fee: Some(6),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(h.buttons.call_count(), 1);
        assert_eq!(result.event.booking_code.as_deref(), Some("BTN-1"));
        assert_eq!(result.event.fee, Some(10));
    }

    #[tokio::test]
    async fn test_payment_failure_is_non_fatal_on_update() {
        let h = harness(FakeButtonSync::failing("Paypal error: no connection")).await;
        let event = h.seed_event(Some(5), Some(3)).await;

        let result = h
            .service
            .update(
                event.id,
                UpdateEventRequest {
                    title: Some("Renamed lecture".into()),
                    fee: Some(10),
                    conc_fee: Some(6),
                    event_dates: vec![date_payload("2019-03-01 19:00", &[])],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // The content edit persisted despite the provider failure
        assert_eq!(result.event.title, "Renamed lecture");
        assert_eq!(result.event.fee, Some(10));
        assert_eq!(result.event.event_dates.len(), 1);
        assert_eq!(result.errors, vec!["Paypal error: no connection"]);
        assert_eq!(result.event.booking_code, None);
    }

    #[tokio::test]
    async fn test_update_reconciles_occurrences() {
        let h = harness(FakeButtonSync::succeeding()).await;
        let event = h.seed_event(None, None).await;
        let ada = h.seed_speaker("Ada Lovelace").await;
        let brian = h.seed_speaker("Brian Kernighan").await;
        h.seed_date(event.id, "2019-02-01 19:00", &[ada, brian]).await;

        let result = h
            .service
            .update(
                event.id,
                UpdateEventRequest {
                    event_dates: vec![
                        date_payload("2019-02-01 19:00", &[brian]),
                        date_payload("2019-02-02 19:00", &[ada]),
                    ],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(result.event.event_dates.len(), 2);
        let first = &result.event.event_dates[0];
        assert_eq!(first.event_datetime, "2019-02-01 19:00");
        // Speaker set replaced wholesale: Ada is gone from the matched slot
        assert_eq!(first.speakers.len(), 1);
        assert_eq!(first.speakers[0].id, brian);

        let second = &result.event.event_dates[1];
        assert_eq!(second.event_datetime, "2019-02-02 19:00");
        assert_eq!(second.speakers[0].id, ada);
    }

    #[tokio::test]
    async fn test_omitted_persisted_slot_survives_update() {
        let h = harness(FakeButtonSync::succeeding()).await;
        let event = h.seed_event(None, None).await;
        h.seed_date(event.id, "2019-02-01 19:00", &[]).await;
        h.seed_date(event.id, "2019-02-02 19:00", &[]).await;

        let result = h
            .service
            .update(
                event.id,
                UpdateEventRequest {
                    event_dates: vec![date_payload("2019-02-01 19:00", &[])],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // The omitted slot is intentionally left in place, not deleted
        assert_eq!(result.event.event_dates.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_speaker_fails_the_update() {
        let h = harness(FakeButtonSync::succeeding()).await;
        let event = h.seed_event(None, None).await;
        let ghost = Uuid::now_v7();

        let err = h
            .service
            .update(
                event.id,
                UpdateEventRequest {
                    event_dates: vec![date_payload("2019-02-01 19:00", &[ghost])],
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        match err {
            EventError::NotFound { kind, id } => {
                assert_eq!(kind, "speaker");
                assert_eq!(id, ghost.to_string());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_event_date_is_rejected_before_mutation() {
        let h = harness(FakeButtonSync::succeeding()).await;
        let event = h.seed_event(None, None).await;

        let err = h
            .service
            .update(
                event.id,
                UpdateEventRequest {
                    event_dates: vec![date_payload("next tuesday", &[])],
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EventError::Validation(_)));
        let dates = h.store.list_event_dates(event.id).await.unwrap();
        assert!(dates.is_empty());
    }

    #[tokio::test]
    async fn test_create_priced_event_creates_button() {
        let h = harness(FakeButtonSync::succeeding()).await;

        let event = h
            .service
            .create(CreateEventRequest {
                event_type_id: h.event_type_id,
                venue_id: h.venue_id,
                title: "History of Tea".into(),
                sub_title: None,
                description: "With tasting".into(),
                fee: Some(5),
                conc_fee: Some(3),
                multi_day_fee: None,
                multi_day_conc_fee: None,
                event_state: None,
                event_dates: vec![date_payload("2019-03-01 19:00", &[])],
                image_filename: None,
                image_data: None,
            })
            .await
            .unwrap();

        assert_eq!(h.buttons.call_count(), 1);
        assert_eq!(event.booking_code.as_deref(), Some("BTN-1"));
        assert_eq!(event.event_dates.len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_provider_failure_is_fatal() {
        let h = harness(FakeButtonSync::failing("Paypal error: rejected")).await;

        let err = h
            .service
            .create(CreateEventRequest {
                event_type_id: h.event_type_id,
                venue_id: h.venue_id,
                title: "History of Tea".into(),
                sub_title: None,
                description: "With tasting".into(),
                fee: Some(5),
                conc_fee: Some(3),
                multi_day_fee: None,
                multi_day_conc_fee: None,
                event_state: None,
                event_dates: vec![],
                image_filename: None,
                image_data: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EventError::Payment(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_event_type() {
        let h = harness(FakeButtonSync::succeeding()).await;

        let err = h
            .service
            .create(CreateEventRequest {
                event_type_id: Uuid::now_v7(),
                venue_id: h.venue_id,
                title: "Orphan".into(),
                sub_title: None,
                description: "No type".into(),
                fee: None,
                conc_fee: None,
                multi_day_fee: None,
                multi_day_conc_fee: None,
                event_state: None,
                event_dates: vec![],
                image_filename: None,
                image_data: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EventError::NotFound { kind: "event type", .. }));
    }

    #[tokio::test]
    async fn test_image_upload_keys_by_first_occurrence_year() {
        let h = harness(FakeButtonSync::succeeding()).await;
        let event = h.seed_event(None, None).await;
        h.seed_date(event.id, "2019-06-01 19:00", &[]).await;

        let result = h
            .service
            .update(
                event.id,
                UpdateEventRequest {
                    image_filename: Some("poster.png".into()),
                    image_data: Some("aGVsbG8=".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let expected = format!("2019/{}", event.id);
        assert_eq!(result.event.image_filename.as_deref(), Some(expected.as_str()));
        let uploads = h.assets.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0], ("poster.png".to_string(), expected));
    }

    #[tokio::test]
    async fn test_missing_image_filename_is_rejected() {
        let h = harness(FakeButtonSync::succeeding()).await;
        let event = h.seed_event(None, None).await;

        let err = h
            .service
            .update(
                event.id,
                UpdateEventRequest {
                    image_filename: Some("nope.png".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EventError::Validation(_)));
        assert!(err.to_string().contains("nope.png"));
    }

    #[tokio::test]
    async fn test_update_of_unknown_event_is_not_found() {
        let h = harness(FakeButtonSync::succeeding()).await;

        let err = h
            .service
            .update(Uuid::now_v7(), UpdateEventRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, EventError::NotFound { kind: "event", .. }));
    }
}
