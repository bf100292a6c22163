pub mod constants;
pub mod db;
pub mod repository;

pub use db::TrackDatabase;
pub use repository::TrackRepository;
