pub mod summary;
pub mod timestamp;
pub mod track;
pub mod track_point;
