use crate::models::{
    DepartmentRequest, Notice, Notification, StockRequest, TrackedRequest, VacationRequest,
};
use crate::workflow::RequestStatus;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};
use portal_core::error::AppError;

/// Upper bound on cards loaded into one board.
pub const BOARD_CARD_LIMIT: i64 = 500;

#[derive(Clone)]
pub struct PortalDb {
    client: MongoClient,
    db: Database,
}

/// Who moved a request and why, written alongside the new status.
#[derive(Debug, Clone)]
pub struct StatusChange<'a> {
    pub from: RequestStatus,
    pub to: RequestStatus,
    pub actor_id: &'a str,
    pub actor_name: &'a str,
    pub note: Option<&'a str>,
}

impl PortalDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for portal-service");

        for collection in [
            VacationRequest::COLLECTION,
            StockRequest::COLLECTION,
            DepartmentRequest::COLLECTION,
        ] {
            let requests = self.db.collection::<Document>(collection);
            let mut indexes = vec![
                index(doc! { "requester_id": 1, "created_at": -1 }, "requester_idx"),
                index(doc! { "status": 1 }, "status_idx"),
            ];
            if collection == DepartmentRequest::COLLECTION {
                indexes.push(index(doc! { "receiver_department": 1 }, "receiver_idx"));
                indexes.push(index(doc! { "sender_department": 1 }, "sender_idx"));
            } else {
                indexes.push(index(doc! { "department": 1 }, "department_idx"));
            }
            requests.create_indexes(indexes, None).await.map_err(|e| {
                tracing::error!("Failed to create indexes on {}: {}", collection, e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        }

        self.notifications()
            .create_indexes(
                vec![index(
                    doc! { "recipient_id": 1, "read": 1, "created_at": -1 },
                    "recipient_idx",
                )],
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to create notification indexes: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        self.notices()
            .create_indexes(
                vec![index(
                    doc! { "archived": 1, "pinned": -1, "created_at": -1 },
                    "live_notices_idx",
                )],
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to create notice indexes: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn requests<T: TrackedRequest>(&self) -> Collection<T> {
        self.db.collection(T::COLLECTION)
    }

    pub fn notifications(&self) -> Collection<Notification> {
        self.db.collection("notifications")
    }

    pub fn notices(&self) -> Collection<Notice> {
        self.db.collection("notices")
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    pub async fn insert_request<T: TrackedRequest>(&self, request: &T) -> Result<(), AppError> {
        self.requests::<T>()
            .insert_one(request, None)
            .await
            .map_err(|e| {
                tracing::error!(kind = %T::KIND, "Failed to insert request: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub async fn find_request<T: TrackedRequest>(&self, id: &str) -> Result<Option<T>, AppError> {
        self.requests::<T>()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(AppError::from)
    }

    /// Newest first, with the total matching count for pagination.
    pub async fn list_requests<T: TrackedRequest>(
        &self,
        filter: Document,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<T>, u64), AppError> {
        let total = self
            .requests::<T>()
            .count_documents(filter.clone(), None)
            .await
            .map_err(AppError::from)?;

        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let cursor = self
            .requests::<T>()
            .find(filter, find_options)
            .await
            .map_err(AppError::from)?;
        let items: Vec<T> = cursor.try_collect().await.map_err(AppError::from)?;

        Ok((items, total))
    }

    /// Cards for a board, most recently touched first.
    pub async fn board_requests<T: TrackedRequest>(
        &self,
        filter: Document,
    ) -> Result<Vec<T>, AppError> {
        let find_options = FindOptions::builder()
            .sort(doc! { "updated_at": -1 })
            .limit(BOARD_CARD_LIMIT)
            .build();

        let cursor = self
            .requests::<T>()
            .find(filter, find_options)
            .await
            .map_err(AppError::from)?;
        cursor.try_collect().await.map_err(AppError::from)
    }

    pub async fn count_requests<T: TrackedRequest>(&self, filter: Document) -> Result<u64, AppError> {
        self.requests::<T>()
            .count_documents(filter, None)
            .await
            .map_err(AppError::from)
    }

    /// Move `id` from `change.from` to `change.to` only if it is still in
    /// `change.from`. Returns the updated document, or `None` when the
    /// stored status no longer matches.
    pub async fn compare_and_set_status<T: TrackedRequest>(
        &self,
        id: &str,
        change: &StatusChange<'_>,
    ) -> Result<Option<T>, AppError> {
        let filter = doc! { "_id": id, "status": change.from.as_str() };
        let update = doc! {
            "$set": {
                "status": change.to.as_str(),
                "updated_at": BsonDateTime::now(),
                "handled_by": change.actor_id,
                "handled_by_name": change.actor_name,
                "handler_note": change.note,
            }
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.requests::<T>()
            .find_one_and_update(filter, update, options)
            .await
            .map_err(|e| {
                tracing::error!(kind = %T::KIND, request_id = %id, "Failed to update status: {}", e);
                AppError::from(e)
            })
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub async fn insert_notification(&self, notification: &Notification) -> Result<(), AppError> {
        self.notifications()
            .insert_one(notification, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert notification: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub async fn list_notifications(
        &self,
        recipient_id: &str,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, AppError> {
        let mut filter = doc! { "recipient_id": recipient_id };
        if unread_only {
            filter.insert("read", false);
        }

        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .build();

        let cursor = self
            .notifications()
            .find(filter, find_options)
            .await
            .map_err(AppError::from)?;
        cursor.try_collect().await.map_err(AppError::from)
    }

    pub async fn unread_count(&self, recipient_id: &str) -> Result<u64, AppError> {
        self.notifications()
            .count_documents(doc! { "recipient_id": recipient_id, "read": false }, None)
            .await
            .map_err(AppError::from)
    }

    /// Returns whether a notification addressed to `recipient_id` was found.
    pub async fn mark_notification_read(
        &self,
        id: &str,
        recipient_id: &str,
    ) -> Result<bool, AppError> {
        let result = self
            .notifications()
            .update_one(
                doc! { "_id": id, "recipient_id": recipient_id },
                doc! { "$set": { "read": true } },
                None,
            )
            .await
            .map_err(AppError::from)?;
        Ok(result.matched_count > 0)
    }

    pub async fn mark_all_notifications_read(&self, recipient_id: &str) -> Result<u64, AppError> {
        let result = self
            .notifications()
            .update_many(
                doc! { "recipient_id": recipient_id, "read": false },
                doc! { "$set": { "read": true } },
                None,
            )
            .await
            .map_err(AppError::from)?;
        Ok(result.modified_count)
    }

    // ------------------------------------------------------------------
    // Notices
    // ------------------------------------------------------------------

    pub async fn insert_notice(&self, notice: &Notice) -> Result<(), AppError> {
        self.notices()
            .insert_one(notice, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert notice: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub async fn find_notice(&self, id: &str) -> Result<Option<Notice>, AppError> {
        self.notices()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(AppError::from)
    }

    /// Live notices for the hospital and for `department`, pinned first.
    pub async fn live_notices(
        &self,
        department: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Notice>, AppError> {
        let filter = doc! {
            "archived": false,
            "$and": [
                { "$or": [
                    { "audience": null },
                    { "audience": department },
                ] },
                { "$or": [
                    { "expires_at": { "$exists": false } },
                    { "expires_at": { "$gt": BsonDateTime::from_chrono(now) } },
                ] },
            ],
        };

        let find_options = FindOptions::builder()
            .sort(doc! { "pinned": -1, "created_at": -1 })
            .build();

        let cursor = self
            .notices()
            .find(filter, find_options)
            .await
            .map_err(AppError::from)?;
        cursor.try_collect().await.map_err(AppError::from)
    }

    pub async fn archive_notice(&self, id: &str) -> Result<bool, AppError> {
        let result = self
            .notices()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "archived": true } },
                None,
            )
            .await
            .map_err(AppError::from)?;
        Ok(result.matched_count > 0)
    }
}

fn index(keys: Document, name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().name(name.to_string()).build())
        .build()
}
