use crate::ADMIN_ROLES;
use crate::auth::AuthenticatedUser;
use crate::domain::product::{Product, ProductRequest};
use crate::domain::types::ProductId;
use crate::dto::master_data::ProductsPageData;
use crate::forms::master_data::ProductForm;
use crate::repository::{ProductReader, ProductWriter};
use crate::services::{ServiceResult, ensure_role, log_failure};

pub async fn list_products<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<ProductsPageData>
where
    R: ProductReader + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let products = repo
        .list_products()
        .await
        .map_err(log_failure("list products"))?;

    Ok(ProductsPageData { products })
}

pub async fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let request = ProductRequest::try_from(form)?;

    repo.create_product(&request)
        .await
        .map_err(log_failure("create the product"))
}

pub async fn update_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i64,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let product_id = ProductId::new(product_id)?;
    let request = ProductRequest::try_from(form)?;

    repo.update_product(product_id, &request)
        .await
        .map_err(log_failure("update the product"))
}

pub async fn delete_product<R>(repo: &R, user: &AuthenticatedUser, product_id: i64) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    repo.delete_product(ProductId::new(product_id)?)
        .await
        .map_err(log_failure("delete the product"))
}
