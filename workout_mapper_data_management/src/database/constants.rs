pub const TRACKS_TABLE_NAME: &str = "Tracks";
pub const TRACK_ID: &str = "track_id";
pub const NAME: &str = "name";
pub const TIMESTAMP: &str = "timestamp";

pub const TRACK_POINTS_TABLE_NAME: &str = "TrackPoints";
pub const POINT_ID: &str = "point_id";
// Track id
pub const LONGITUDE: &str = "longitude";
pub const LATITUDE: &str = "latitude";
// Timestamp
