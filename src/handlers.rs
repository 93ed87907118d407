use std::sync::Arc;

use actix_web::{dev::Payload, web, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::error::{parse_id, ShopError};
use crate::models::*;
use crate::response::ApiResponse;
use crate::service::ShopService;

pub const USER_ID_HEADER: &str = "X-User-Id";

pub struct AppState {
    pub service: Arc<dyn ShopService>,
}

impl AppState {
    pub fn new(service: Arc<dyn ShopService>) -> Self {
        AppState { service }
    }
}

/// Caller identity, resolved upstream and forwarded in `X-User-Id`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthUser {
    type Error = ShopError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user_id = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok());

        match user_id {
            Some(user_id) => ready(Ok(AuthUser { user_id })),
            None => ready(Err(ShopError::Unauthorized(format!(
                "missing or invalid {USER_ID_HEADER} header"
            )))),
        }
    }
}

fn validated(handler: &'static str, outcome: Result<(), String>) -> Result<(), ShopError> {
    outcome.map_err(|message| {
        tracing::warn!(%message, "handler::{handler} - invalid request");
        ShopError::Validation(message)
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/shops")
            .route(web::get().to(list_shops))
            .route(web::post().to(create_shop)),
    )
    .service(
        web::resource("/shops/{id}")
            .route(web::get().to(get_shop))
            .route(web::patch().to(update_shop))
            .route(web::delete().to(delete_shop)),
    )
    .route("/product", web::post().to(create_product))
    .route("/detailshop/{id}", web::post().to(get_detail_shop_and_product))
    .route("/product-all", web::post().to(search_products))
    .route("/product/{id}", web::get().to(get_detail_product))
    .route("/delete/{id}", web::patch().to(delete_product))
    .route("/update/{id}", web::put().to(update_product));
}

async fn create_shop(
    data: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<CreateShopRequest>,
) -> Result<HttpResponse, ShopError> {
    let mut req = body.into_inner();
    req.user_id = auth.user_id;
    validated("create_shop", req.validate())?;

    let resp = data.service.create_shop(&req).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(resp, "")))
}

async fn get_shop(data: web::Data<AppState>, id: web::Path<String>) -> Result<HttpResponse, ShopError> {
    let id = parse_id(&id)?;
    let resp = data.service.get_shop(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "")))
}

async fn update_shop(
    data: web::Data<AppState>,
    auth: AuthUser,
    id: web::Path<String>,
    body: web::Json<UpdateShopRequest>,
) -> Result<HttpResponse, ShopError> {
    let mut req = body.into_inner();
    req.user_id = auth.user_id;
    req.id = parse_id(&id)?;
    validated("update_shop", req.validate())?;

    let resp = data.service.update_shop(&req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "")))
}

async fn delete_shop(
    data: web::Data<AppState>,
    auth: AuthUser,
    id: web::Path<String>,
) -> Result<HttpResponse, ShopError> {
    let req = DeleteShopRequest {
        user_id: auth.user_id,
        id: parse_id(&id)?,
    };

    data.service.delete_shop(&req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success((), "shop deleted")))
}

async fn list_shops(
    data: web::Data<AppState>,
    auth: AuthUser,
    query: web::Query<ShopsRequest>,
) -> Result<HttpResponse, ShopError> {
    let mut req = query.into_inner();
    req.user_id = auth.user_id;
    req.set_default();

    let resp = data.service.list_shops(&req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "")))
}

async fn create_product(
    data: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, ShopError> {
    let mut req = body.into_inner();
    req.user_id = auth.user_id;
    validated("create_product", req.validate())?;

    let resp = data.service.create_product(&req).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(resp, "")))
}

async fn get_detail_shop_and_product(
    data: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<DetailShopQuery>,
) -> Result<HttpResponse, ShopError> {
    let id = parse_id(&id)?;
    let page = clamp_page(query.page.unwrap_or(1));
    let paginate = query.paginate.unwrap_or(DEFAULT_PAGE_SIZE);

    let resp = data.service.get_detail_shop_and_product(id, paginate, page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "")))
}

async fn search_products(
    data: web::Data<AppState>,
    body: web::Json<ProductFilter>,
) -> Result<HttpResponse, ShopError> {
    let mut filter = body.into_inner();
    filter.set_default_filter();

    let resp = data.service.search_products(&filter).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "")))
}

async fn get_detail_product(
    data: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ShopError> {
    let resp = data.service.get_detail_product(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "")))
}

async fn delete_product(
    data: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ShopError> {
    data.service.delete_product_by_id(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success((), "product deleted")))
}

async fn update_product(
    data: web::Data<AppState>,
    auth: AuthUser,
    id: web::Path<String>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, ShopError> {
    let mut req = body.into_inner();
    req.user_id = auth.user_id;
    req.id = parse_id(&id)?;
    validated("update_product", req.validate())?;

    let resp = data.service.update_product_by_id(&req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "")))
}
