use gloo_net::http::{Request, Response};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use tracker_core::model::{
    CreateNoteArgs, Folder, FolderId, FolderPathArgs, MainFolder, Note, NoteId, PathArgs, ProgressArgs,
    Subfolder, Tag, TagNameArgs, Video, VideoId,
};
use tracker_core::ApiError;

use crate::app::config::ApiConfig;

fn encode(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}

fn network(e: gloo_net::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

/// Thin wrapper over the backend's REST surface. One method per endpoint,
/// no retries.
#[derive(Clone, Debug)]
pub struct ApiClient {
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// URL the `<video>` element streams from.
    pub fn video_source(&self, path: &str) -> String {
        self.config.url(&format!("/videos/?video_path={}", encode(path)))
    }

    fn check(resp: Response) -> Result<Response, ApiError> {
        if resp.ok() {
            Ok(resp)
        } else {
            Err(ApiError::Status { status: resp.status(), url: resp.url() })
        }
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let resp = Self::check(resp)?;
        resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = Request::get(&self.config.url(path)).send().await.map_err(network)?;
        Self::decode(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let resp = Request::delete(&self.config.url(path)).send().await.map_err(network)?;
        Self::check(resp).map(|_| ())
    }

    // scanning

    pub async fn scan_main_folder(&self, path: &str) -> Result<Vec<Folder>, ApiError> {
        let body = PathArgs { path };
        let resp = Request::post(&self.config.url("/mainfolders/scan"))
            .json(&body)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        Self::decode(resp).await
    }

    /// Registers a root with the backend. Only a 2xx answer counts; the
    /// created record is returned when the body carries one.
    pub async fn register_main_folder(&self, path: &str) -> Result<Option<MainFolder>, ApiError> {
        let body = PathArgs { path };
        let resp = Request::post(&self.config.url("/mainfolders"))
            .json(&body)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        let resp = Self::check(resp)?;
        Ok(resp.json::<MainFolder>().await.ok())
    }

    pub async fn scan_folder(&self, folder_path: &str) -> Result<Folder, ApiError> {
        let body = FolderPathArgs { folder_path };
        let resp = Request::post(&self.config.url("/folders/scan"))
            .json(&body)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        Self::decode(resp).await
    }

    /// `Ok(true)` on 200, `Ok(false)` on any other status. Transport
    /// failures stay errors.
    pub async fn folder_exists(&self, folder_path: &str) -> Result<bool, ApiError> {
        let url = self.config.url(&format!("/folder-exists/?folder_path={}", encode(folder_path)));
        let resp = Request::get(&url).send().await.map_err(network)?;
        Ok(resp.ok())
    }

    pub async fn subfolders(&self, folder_id: FolderId) -> Result<Vec<Subfolder>, ApiError> {
        self.get(&format!("/folders/{}/subfolders", folder_id)).await
    }

    // search

    pub async fn search_folders(&self, query: &str) -> Result<Vec<Folder>, ApiError> {
        self.get(&format!("/folder?query={}", encode(query))).await
    }

    pub async fn search_videos(&self, query: &str) -> Result<Vec<Video>, ApiError> {
        self.get(&format!("/video?query={}", encode(query))).await
    }

    /// Tags matching `query`; an empty query lists all of them.
    pub async fn tags(&self, query: &str) -> Result<Vec<Tag>, ApiError> {
        self.get(&format!("/tags?query={}", encode(query))).await
    }

    // tags

    pub async fn add_tag(&self, folder_id: FolderId, name: &str) -> Result<Tag, ApiError> {
        let body = TagNameArgs { name };
        let resp = Request::put(&self.config.url(&format!("/folders/{}/tags", folder_id)))
            .json(&body)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        Self::decode(resp).await
    }

    pub async fn remove_tag(&self, folder_id: FolderId, name: &str) -> Result<(), ApiError> {
        self.delete(&format!("/folders/{}/tags/{}", folder_id, encode(name))).await
    }

    pub async fn delete_unmapped_tags(&self) -> Result<(), ApiError> {
        self.delete("/tags/unmapped").await
    }

    // progress and notes

    pub async fn update_progress(&self, video_id: VideoId, seconds: u32) -> Result<(), ApiError> {
        let body = ProgressArgs { progress: seconds.to_string() };
        let resp = Request::put(&self.config.url(&format!("/videos/{}", video_id)))
            .json(&body)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        Self::check(resp).map(|_| ())
    }

    pub async fn notes(&self, video_id: VideoId) -> Result<Vec<Note>, ApiError> {
        self.get(&format!("/videos/{}/notes", video_id)).await
    }

    pub async fn add_note(&self, video_id: VideoId, content: &str) -> Result<Note, ApiError> {
        let body = CreateNoteArgs { content, video_id };
        let resp = Request::post(&self.config.url(&format!("/videos/{}/notes", video_id)))
            .json(&body)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        Self::decode(resp).await
    }

    pub async fn delete_note(&self, note_id: NoteId) -> Result<(), ApiError> {
        self.delete(&format!("/notes/{}", note_id)).await
    }
}

pub fn use_api() -> ApiClient {
    expect_context::<ApiClient>()
}
