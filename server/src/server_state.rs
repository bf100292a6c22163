use tokio_util::sync::CancellationToken;
use workout_mapper_data_management::DataManager;

pub struct ServerState {
    pub data_manager: DataManager,
    // Cancelled when the server shuts down. Requests work with child tokens.
    pub shutdown: CancellationToken,
}
