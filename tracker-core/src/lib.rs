//! View-state logic for the course tracker front end.
//!
//! Nothing in here touches the DOM. The UI crate feeds explicit inputs in
//! (payloads from the API, media element timings, key presses) and renders
//! whatever comes back out.

pub mod collection;
pub mod duration;
pub mod error;
pub mod explorer;
pub mod filter;
pub mod model;
pub mod notes;
pub mod palette;
pub mod playback;
pub mod prefs;
pub mod progress;
pub mod search;

pub use error::{ApiError, DurationError, PrefsError};
pub use model::{Folder, FolderId, MainFolder, Note, NoteId, Subfolder, Tag, TagId, Video, VideoDuration, VideoId};
