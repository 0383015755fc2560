pub mod confirm_modal;
pub mod course_card;
pub mod course_detail;
pub mod header;
pub mod home;
pub mod library_explorer;
pub mod notes;
pub mod popup;
pub mod search;
pub mod tag_chip;
pub mod tag_manager;
pub mod video_player;
