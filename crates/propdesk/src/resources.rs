//! Typed CRUD clients for plots, rooms and tenants.
//!
//! All three resources share the same REST shape:
//!
//! ```text
//! GET    /{resource}          list
//! GET    /{resource}/{id}     get
//! POST   /{resource}          create
//! PUT    /{resource}/{id}     update
//! DELETE /{resource}/{id}     delete
//! POST   /{resource}/{id}/{field}  multipart image upload
//! ```
//!
//! [`Collection`] implements that shape once; the public clients add the
//! model types and the resource-specific filters.

use propdesk_http::{Body, HttpClient, RequestOptions, multipart, path_segment};
use propdesk_protocol::{
    ApiError, ApiResponse, NewPlot, NewRoom, NewTenant, Plot, PlotUpdate, Room, RoomUpdate,
    Tenant, TenantUpdate,
};
use propdesk_store::KeyValueStore;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Checks the envelope of an endpoint whose `data` is irrelevant. A
/// response with no body at all counts as success.
pub(crate) fn expect_success(
    resp: Option<ApiResponse<serde_json::Value>>,
) -> Result<(), ApiError> {
    match resp {
        Some(resp) => resp.into_checked().map(drop),
        None => Ok(()),
    }
}

/// A file to upload as `multipart/form-data`.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// A form with this file as its only part, under `field`.
    pub(crate) fn into_form(self, field: &'static str) -> Result<multipart::Form, ApiError> {
        let part = multipart::Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)
            .map_err(|e| ApiError::unknown(e.to_string()))?;
        Ok(multipart::Form::new().part(field, part))
    }
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

struct Collection<S> {
    http: HttpClient<S>,
    base: &'static str,
}

impl<S> Clone for Collection<S> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base: self.base,
        }
    }
}

impl<S: KeyValueStore> Collection<S> {
    fn item(&self, id: &str) -> Result<String, ApiError> {
        Ok(format!("{}/{}", self.base, path_segment(id)?))
    }

    async fn list<T: DeserializeOwned>(&self, options: RequestOptions) -> Result<Vec<T>, ApiError> {
        let resp: ApiResponse<Vec<T>> = self.http.get(self.base, options).await?;
        resp.into_data()
    }

    async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T, ApiError> {
        let resp: ApiResponse<T> = self.http.get(&self.item(id)?, RequestOptions::new()).await?;
        resp.into_data()
    }

    async fn create<B, T>(&self, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let resp: ApiResponse<T> = self
            .http
            .post(self.base, Body::json(body)?, RequestOptions::new())
            .await?;
        resp.into_data()
    }

    async fn update<B, T>(&self, id: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let resp: ApiResponse<T> = self
            .http
            .put(&self.item(id)?, Body::json(body)?, RequestOptions::new())
            .await?;
        resp.into_data()
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let resp = self.http.delete(&self.item(id)?, RequestOptions::new()).await?;
        expect_success(resp)
    }

    async fn upload<T: DeserializeOwned>(
        &self,
        id: &str,
        field: &'static str,
        upload: Upload,
    ) -> Result<T, ApiError> {
        tracing::debug!(
            resource = self.base,
            id,
            file_name = %upload.file_name,
            size = upload.bytes.len(),
            "uploading file"
        );
        let form = upload.into_form(field)?;
        let path = format!("{}/{field}", self.item(id)?);
        let resp: ApiResponse<T> = self
            .http
            .post(&path, form.into(), RequestOptions::new())
            .await?;
        resp.into_data()
    }
}

// ---------------------------------------------------------------------------
// Plots
// ---------------------------------------------------------------------------

/// `/plots`: the properties being managed.
pub struct PlotsApi<S>(Collection<S>);

impl<S> Clone for PlotsApi<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S: KeyValueStore> PlotsApi<S> {
    pub fn new(http: HttpClient<S>) -> Self {
        Self(Collection {
            http,
            base: "/plots",
        })
    }

    pub async fn list(&self) -> Result<Vec<Plot>, ApiError> {
        self.0.list(RequestOptions::new()).await
    }

    pub async fn get(&self, id: &str) -> Result<Plot, ApiError> {
        self.0.get(id).await
    }

    pub async fn create(&self, plot: &NewPlot) -> Result<Plot, ApiError> {
        self.0.create(plot).await
    }

    pub async fn update(&self, id: &str, changes: &PlotUpdate) -> Result<Plot, ApiError> {
        self.0.update(id, changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.0.delete(id).await
    }

    /// Replaces the plot's picture. Sent as the `image` form field.
    pub async fn upload_image(&self, id: &str, image: Upload) -> Result<Plot, ApiError> {
        self.0.upload(id, "image", image).await
    }
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

/// `/rooms`: rentable units within a plot.
pub struct RoomsApi<S>(Collection<S>);

impl<S> Clone for RoomsApi<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S: KeyValueStore> RoomsApi<S> {
    pub fn new(http: HttpClient<S>) -> Self {
        Self(Collection {
            http,
            base: "/rooms",
        })
    }

    pub async fn list(&self) -> Result<Vec<Room>, ApiError> {
        self.0.list(RequestOptions::new()).await
    }

    /// Rooms belonging to one plot (`?plotId=`).
    pub async fn list_for_plot(&self, plot_id: &str) -> Result<Vec<Room>, ApiError> {
        self.0
            .list(RequestOptions::new().query("plotId", plot_id))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Room, ApiError> {
        self.0.get(id).await
    }

    pub async fn create(&self, room: &NewRoom) -> Result<Room, ApiError> {
        self.0.create(room).await
    }

    pub async fn update(&self, id: &str, changes: &RoomUpdate) -> Result<Room, ApiError> {
        self.0.update(id, changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.0.delete(id).await
    }

    pub async fn upload_image(&self, id: &str, image: Upload) -> Result<Room, ApiError> {
        self.0.upload(id, "image", image).await
    }
}

// ---------------------------------------------------------------------------
// Tenants
// ---------------------------------------------------------------------------

/// `/tenants`: people renting rooms.
pub struct TenantsApi<S>(Collection<S>);

impl<S> Clone for TenantsApi<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S: KeyValueStore> TenantsApi<S> {
    pub fn new(http: HttpClient<S>) -> Self {
        Self(Collection {
            http,
            base: "/tenants",
        })
    }

    pub async fn list(&self) -> Result<Vec<Tenant>, ApiError> {
        self.0.list(RequestOptions::new()).await
    }

    /// Tenants of one room (`?roomId=`).
    pub async fn list_for_room(&self, room_id: &str) -> Result<Vec<Tenant>, ApiError> {
        self.0
            .list(RequestOptions::new().query("roomId", room_id))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Tenant, ApiError> {
        self.0.get(id).await
    }

    pub async fn create(&self, tenant: &NewTenant) -> Result<Tenant, ApiError> {
        self.0.create(tenant).await
    }

    pub async fn update(&self, id: &str, changes: &TenantUpdate) -> Result<Tenant, ApiError> {
        self.0.update(id, changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.0.delete(id).await
    }

    /// Sent as the `avatar` form field.
    pub async fn upload_avatar(&self, id: &str, avatar: Upload) -> Result<Tenant, ApiError> {
        self.0.upload(id, "avatar", avatar).await
    }
}
