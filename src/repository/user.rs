use crate::domain::types::UserId;
use crate::domain::user::{User, UserRequest};
use crate::repository::errors::RepositoryResult;
use crate::repository::{BackendRepository, UserReader, UserWriter};

impl UserReader for BackendRepository {
    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        self.get("/users").await
    }

    async fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        self.find(&format!("/users/{id}")).await
    }
}

impl UserWriter for BackendRepository {
    async fn create_user(&self, request: &UserRequest) -> RepositoryResult<User> {
        self.post("/users", request).await
    }

    async fn update_user(&self, id: UserId, request: &UserRequest) -> RepositoryResult<User> {
        self.put(&format!("/users/{id}"), request).await
    }

    async fn delete_user(&self, id: UserId) -> RepositoryResult<()> {
        self.delete(&format!("/users/{id}")).await
    }
}
