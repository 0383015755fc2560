use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::duration::parse_duration;
use crate::error::DurationError;

pub type FolderId = u32;
pub type VideoId = u32;
pub type TagId = u32;
pub type NoteId = u32;

/// A root directory registered by the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MainFolder {
    pub id: u32,
    pub name: String,
    pub path: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Video length as sent by the backend, validated when the payload is decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoDuration {
    raw: String,
    seconds: u32,
}

impl VideoDuration {
    pub fn seconds(&self) -> u32 {
        self.seconds
    }
}

impl TryFrom<String> for VideoDuration {
    type Error = DurationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let seconds = parse_duration(&raw)?;
        Ok(Self { raw: raw.trim().to_string(), seconds })
    }
}

impl From<VideoDuration> for String {
    fn from(d: VideoDuration) -> Self {
        d.raw
    }
}

impl std::str::FromStr for VideoDuration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub name: String,
    pub path: String,
    pub duration: VideoDuration,
    #[serde(deserialize_with = "whole_seconds")]
    pub progress: u32,
    #[serde(default)]
    pub folder_id: Option<FolderId>,
}

impl Video {
    pub fn duration_secs(&self) -> u32 {
        self.duration.seconds()
    }
}

/// One section of a course: a directory holding videos.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subfolder {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub videos: Vec<Video>,
}

/// A scanned course folder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub main_folder_path: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub last_played_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub last_played_video: Option<Video>,
    #[serde(default)]
    pub subfolders: Vec<Subfolder>,
}

impl Folder {
    pub fn has_tag(&self, tag_id: TagId) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    pub fn videos(&self) -> impl Iterator<Item = &Video> {
        self.subfolders.iter().flat_map(|s| s.videos.iter())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub video_id: VideoId,
    pub content: String,
    #[serde(deserialize_with = "timestamp")]
    pub created_at: NaiveDateTime,
}

#[derive(Serialize)]
pub struct PathArgs<'a> {
    pub path: &'a str,
}

#[derive(Serialize)]
pub struct FolderPathArgs<'a> {
    pub folder_path: &'a str,
}

#[derive(Serialize)]
pub struct TagNameArgs<'a> {
    pub name: &'a str,
}

#[derive(Serialize)]
pub struct ProgressArgs {
    pub progress: String,
}

#[derive(Serialize)]
pub struct CreateNoteArgs<'a> {
    pub content: &'a str,
    pub video_id: VideoId,
}

// The backend stores progress as a float column; the UI only deals in whole seconds.
fn whole_seconds<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }
    let secs = match Raw::deserialize(d)? {
        Raw::Int(v) => v as f64,
        Raw::Float(v) => v,
        Raw::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom)?,
    };
    if !secs.is_finite() {
        return Err(serde::de::Error::custom("progress is not a finite number"));
    }
    Ok(secs.round().clamp(0.0, u32::MAX as f64) as u32)
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(d)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("bad timestamp `{}`", raw)))
}

fn optional_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDateTime>, D::Error> {
    match Option::<String>::deserialize(d)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("bad timestamp `{}`", raw))),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn video(id: VideoId, name: &str, duration: &str, progress: u32) -> Video {
        Video {
            id,
            name: name.to_string(),
            path: format!("/media/{}", name),
            duration: duration.parse().expect("fixture duration"),
            progress,
            folder_id: None,
        }
    }

    pub fn section(id: FolderId, name: &str, videos: Vec<Video>) -> Subfolder {
        Subfolder { id, name: name.to_string(), videos }
    }

    pub fn folder(id: FolderId, name: &str, tags: &[(TagId, &str)]) -> Folder {
        Folder {
            id,
            name: name.to_string(),
            path: format!("/courses/{}", name),
            main_folder_path: "/courses".to_string(),
            tags: tags.iter().map(|(id, n)| Tag { id: *id, name: n.to_string() }).collect(),
            last_played_at: None,
            last_played_video: None,
            subfolders: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_folder_payload() {
        let payload = json!({
            "id": 7,
            "name": "Rust Basics",
            "main_folder_name": "courses",
            "path": "/courses/Rust Basics",
            "main_folder_path": "/courses",
            "tags": [{"id": 3, "name": "rust"}],
            "last_played_video": {
                "id": 11, "name": "01 intro.mp4", "path": "/courses/Rust Basics/01 intro.mp4",
                "progress": 42.6, "duration": "10:00", "notes": []
            },
            "last_played_at": "2024-10-05T15:15:30.123456",
            "subfolders": [
                {"id": 8, "name": "1. Intro", "videos": [
                    {"id": 11, "name": "01 intro.mp4", "path": "/x/01 intro.mp4", "progress": 0, "duration": "1:05:00"}
                ]}
            ]
        });
        let folder: Folder = serde_json::from_value(payload).unwrap();
        assert!(folder.has_tag(3));
        assert_eq!(folder.last_played_video.as_ref().unwrap().progress, 43);
        assert_eq!(folder.subfolders[0].videos[0].duration_secs(), 3900);
        assert!(folder.last_played_at.is_some());
    }

    #[test]
    fn decodes_registered_root() {
        let payload = json!({"id": 4, "name": "courses", "path": "/courses"});
        let root: MainFolder = serde_json::from_value(payload).unwrap();
        assert_eq!(root, MainFolder { id: 4, name: "courses".into(), path: "/courses".into() });
    }

    #[test]
    fn malformed_duration_rejects_the_payload() {
        let payload = json!({"id": 1, "name": "a.mp4", "path": "/a.mp4", "progress": 0, "duration": "soon"});
        assert!(serde_json::from_value::<Video>(payload).is_err());
    }

    #[test]
    fn negative_progress_is_clamped() {
        let payload = json!({"id": 1, "name": "a.mp4", "path": "/a.mp4", "progress": -4, "duration": "1:00"});
        let video: Video = serde_json::from_value(payload).unwrap();
        assert_eq!(video.progress, 0);
    }

    #[test]
    fn note_timestamps_accept_offsets() {
        let payload = json!({"id": 2, "video_id": 1, "content": "<b>hi</b>", "created_at": "2024-10-05T15:15:30+05:30"});
        let note: Note = serde_json::from_value(payload).unwrap();
        assert_eq!(note.created_at.format("%H:%M").to_string(), "15:15");
    }
}
