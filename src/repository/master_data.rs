//! Companies, locations and products.

use crate::domain::company::{Company, CompanyRequest};
use crate::domain::location::{Location, LocationRequest};
use crate::domain::product::{Product, ProductRequest};
use crate::domain::types::{CompanyId, LocationId, ProductId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    BackendRepository, CompanyReader, CompanyWriter, LocationReader, LocationWriter,
    ProductReader, ProductWriter,
};

impl CompanyReader for BackendRepository {
    async fn list_companies(&self) -> RepositoryResult<Vec<Company>> {
        self.get("/companies").await
    }

    async fn get_company_by_id(&self, id: CompanyId) -> RepositoryResult<Option<Company>> {
        self.find(&format!("/companies/{id}")).await
    }
}

impl CompanyWriter for BackendRepository {
    async fn create_company(&self, request: &CompanyRequest) -> RepositoryResult<Company> {
        self.post("/companies", request).await
    }

    async fn update_company(
        &self,
        id: CompanyId,
        request: &CompanyRequest,
    ) -> RepositoryResult<Company> {
        self.put(&format!("/companies/{id}"), request).await
    }

    async fn delete_company(&self, id: CompanyId) -> RepositoryResult<()> {
        self.delete(&format!("/companies/{id}")).await
    }
}

impl LocationReader for BackendRepository {
    async fn list_locations(&self) -> RepositoryResult<Vec<Location>> {
        self.get("/locations").await
    }

    async fn get_location_by_id(&self, id: LocationId) -> RepositoryResult<Option<Location>> {
        self.find(&format!("/locations/{id}")).await
    }
}

impl LocationWriter for BackendRepository {
    async fn create_location(&self, request: &LocationRequest) -> RepositoryResult<Location> {
        self.post("/locations", request).await
    }

    async fn update_location(
        &self,
        id: LocationId,
        request: &LocationRequest,
    ) -> RepositoryResult<Location> {
        self.put(&format!("/locations/{id}"), request).await
    }

    async fn delete_location(&self, id: LocationId) -> RepositoryResult<()> {
        self.delete(&format!("/locations/{id}")).await
    }
}

impl ProductReader for BackendRepository {
    async fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        self.get("/products").await
    }

    async fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        self.find(&format!("/products/{id}")).await
    }
}

impl ProductWriter for BackendRepository {
    async fn create_product(&self, request: &ProductRequest) -> RepositoryResult<Product> {
        self.post("/products", request).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        request: &ProductRequest,
    ) -> RepositoryResult<Product> {
        self.put(&format!("/products/{id}"), request).await
    }

    async fn delete_product(&self, id: ProductId) -> RepositoryResult<()> {
        self.delete(&format!("/products/{id}")).await
    }
}
