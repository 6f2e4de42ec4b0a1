//! Product handlers, including images and tag links

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::error::{ApiResult, OrStatus, StatusTable};
use crate::domain::{
    ErrorKind, Pagination, Product, ProductCreate, ProductImage, ProductImageCreate,
    ProductUpdate, Tag,
};
use crate::infrastructure::AppState;

pub static PRODUCT_ERRORS: StatusTable = StatusTable(&[
    (ErrorKind::ProductAlreadyExists, StatusCode::BAD_REQUEST),
    (ErrorKind::InvalidReference, StatusCode::BAD_REQUEST),
    (ErrorKind::ProductNotFound, StatusCode::NOT_FOUND),
    (ErrorKind::ProductImageNotFound, StatusCode::NOT_FOUND),
    (ErrorKind::NoProductsFound, StatusCode::NOT_FOUND),
    (ErrorKind::SellerNotFound, StatusCode::NOT_FOUND),
    (ErrorKind::TagNotFound, StatusCode::NOT_FOUND),
    (ErrorKind::StillReferenced, StatusCode::CONFLICT),
    (ErrorKind::Validation, StatusCode::UNPROCESSABLE_ENTITY),
]);

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductCreate,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Name already taken"),
        (status = 404, description = "Unknown seller or tag"),
        (status = 422, description = "Invalid field")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductCreate>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let input = payload.validate().or_status(&PRODUCT_ERRORS)?;
    let product = state
        .product_repo
        .create(input)
        .await
        .or_status(&PRODUCT_ERRORS)?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(Pagination),
    responses((status = 200, description = "Page of products", body = [Product]))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .product_repo
        .find_all(page)
        .await
        .or_status(&PRODUCT_ERRORS)?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product with images and tags", body = Product),
        (status = 404, description = "No such product")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Product>> {
    let product = state
        .product_repo
        .find_by_id(id)
        .await
        .or_status(&PRODUCT_ERRORS)?;
    Ok(Json(product))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    request_body = ProductUpdate,
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 404, description = "No such product or seller")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductUpdate>,
) -> ApiResult<Json<Product>> {
    let changes = payload.validate().or_status(&PRODUCT_ERRORS)?;
    let product = state
        .product_repo
        .update(id, changes)
        .await
        .or_status(&PRODUCT_ERRORS)?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "No such product")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state
        .product_repo
        .delete(id)
        .await
        .or_status(&PRODUCT_ERRORS)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/products/sellers/{seller_id}/products",
    params(("seller_id" = i32, Path, description = "Seller id"), Pagination),
    responses(
        (status = 200, description = "Products of the seller", body = [Product]),
        (status = 404, description = "Seller has no products")
    )
)]
pub async fn products_by_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<i32>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .product_repo
        .find_by_seller(seller_id, page)
        .await
        .or_status(&PRODUCT_ERRORS)?;
    Ok(Json(products))
}

// Images

#[utoipa::path(
    post,
    path = "/api/products/{id}/images",
    request_body = ProductImageCreate,
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 201, description = "Image attached", body = ProductImage),
        (status = 404, description = "No such product")
    )
)]
pub async fn create_product_image(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductImageCreate>,
) -> ApiResult<(StatusCode, Json<ProductImage>)> {
    let image_url = payload.validate().or_status(&PRODUCT_ERRORS)?;
    let image = state
        .product_repo
        .add_image(id, image_url)
        .await
        .or_status(&PRODUCT_ERRORS)?;
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn list_product_images(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<ProductImage>>> {
    let images = state
        .product_repo
        .images_for(id)
        .await
        .or_status(&PRODUCT_ERRORS)?;
    Ok(Json(images))
}

pub async fn get_product_image(
    State(state): State<AppState>,
    Path(image_id): Path<i32>,
) -> ApiResult<Json<ProductImage>> {
    let image = state
        .product_repo
        .find_image(image_id)
        .await
        .or_status(&PRODUCT_ERRORS)?;
    Ok(Json(image))
}

pub async fn delete_product_image(
    State(state): State<AppState>,
    Path(image_id): Path<i32>,
) -> ApiResult<StatusCode> {
    state
        .product_repo
        .delete_image(image_id)
        .await
        .or_status(&PRODUCT_ERRORS)?;
    Ok(StatusCode::NO_CONTENT)
}

// Tag links

pub async fn list_product_tags(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<Tag>>> {
    let tags = state
        .product_repo
        .tags_for(id)
        .await
        .or_status(&PRODUCT_ERRORS)?;
    Ok(Json(tags))
}

/// Link a tag to a product and return the product's tags. Linking twice is a no-op.
#[utoipa::path(
    put,
    path = "/api/products/{id}/tags/{tag_id}",
    params(
        ("id" = i32, Path, description = "Product id"),
        ("tag_id" = i32, Path, description = "Tag id")
    ),
    responses(
        (status = 200, description = "Tags of the product", body = [Tag]),
        (status = 404, description = "No such product or tag")
    )
)]
pub async fn attach_tag(
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Vec<Tag>>> {
    let tags = state
        .product_repo
        .attach_tag(id, tag_id)
        .await
        .or_status(&PRODUCT_ERRORS)?;
    Ok(Json(tags))
}

pub async fn detach_tag(
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(i32, i32)>,
) -> ApiResult<StatusCode> {
    state
        .product_repo
        .detach_tag(id, tag_id)
        .await
        .or_status(&PRODUCT_ERRORS)?;
    Ok(StatusCode::NO_CONTENT)
}
