use std::fmt;
use uuid::Uuid;

/// The authentication identity of a worker.
#[derive(Clone)]
pub struct WorkerCredentials {
    pub worker_id: Uuid,
    pub username: String,
    pub password_hash: String,
}

impl fmt::Debug for WorkerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerCredentials")
            .field("worker_id", &self.worker_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
