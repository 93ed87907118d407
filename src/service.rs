use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::ShopRepository;
use crate::error::ShopError;
use crate::models::*;

#[async_trait]
pub trait ShopService: Send + Sync {
    async fn create_shop(&self, req: &CreateShopRequest) -> Result<CreateShopResponse, ShopError>;
    async fn get_shop(&self, id: Uuid) -> Result<GetShopResponse, ShopError>;
    async fn update_shop(&self, req: &UpdateShopRequest) -> Result<UpdateShopResponse, ShopError>;
    async fn delete_shop(&self, req: &DeleteShopRequest) -> Result<(), ShopError>;
    async fn list_shops(&self, req: &ShopsRequest) -> Result<ShopsResponse, ShopError>;
    async fn create_product(&self, req: &CreateProductRequest) -> Result<ProductResponse, ShopError>;
    async fn get_detail_shop_and_product(
        &self,
        id: Uuid,
        paginate: i64,
        page: i64,
    ) -> Result<ShopDetail, ShopError>;
    async fn search_products(&self, filter: &ProductFilter) -> Result<ProductsResponse, ShopError>;
    async fn get_detail_product(&self, id: &str) -> Result<ProductResponse, ShopError>;
    async fn delete_product_by_id(&self, id: &str) -> Result<(), ShopError>;
    /// Only the user who owns the stored product may update it.
    async fn update_product_by_id(&self, req: &UpdateProductRequest) -> Result<UpdatedProduct, ShopError>;
}

pub struct CatalogService {
    repo: Arc<dyn ShopRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn ShopRepository>) -> Self {
        CatalogService { repo }
    }
}

#[async_trait]
impl ShopService for CatalogService {
    async fn create_shop(&self, req: &CreateShopRequest) -> Result<CreateShopResponse, ShopError> {
        self.repo.create_shop(req).await
    }

    async fn get_shop(&self, id: Uuid) -> Result<GetShopResponse, ShopError> {
        self.repo.get_shop(id).await
    }

    async fn update_shop(&self, req: &UpdateShopRequest) -> Result<UpdateShopResponse, ShopError> {
        self.repo.update_shop(req).await
    }

    async fn delete_shop(&self, req: &DeleteShopRequest) -> Result<(), ShopError> {
        self.repo.delete_shop(req).await
    }

    async fn list_shops(&self, req: &ShopsRequest) -> Result<ShopsResponse, ShopError> {
        self.repo.list_shops(req).await
    }

    async fn create_product(&self, req: &CreateProductRequest) -> Result<ProductResponse, ShopError> {
        self.repo.create_product(req).await
    }

    async fn get_detail_shop_and_product(
        &self,
        id: Uuid,
        paginate: i64,
        page: i64,
    ) -> Result<ShopDetail, ShopError> {
        self.repo.get_detail_shop_and_product(id, paginate, page).await
    }

    async fn search_products(&self, filter: &ProductFilter) -> Result<ProductsResponse, ShopError> {
        self.repo.search_products(filter).await
    }

    async fn get_detail_product(&self, id: &str) -> Result<ProductResponse, ShopError> {
        self.repo.get_detail_product(id).await
    }

    async fn delete_product_by_id(&self, id: &str) -> Result<(), ShopError> {
        self.repo.delete_product_by_id(id).await
    }

    async fn update_product_by_id(&self, req: &UpdateProductRequest) -> Result<UpdatedProduct, ShopError> {
        let current = self.repo.get_detail_product(&req.id.to_string()).await?;

        if current.user_id != req.user_id {
            tracing::warn!(
                product_id = %req.id,
                owner = %current.user_id,
                caller = %req.user_id,
                "service::update_product_by_id - caller does not own product"
            );
            return Err(ShopError::Forbidden(format!(
                "user {} does not own product {}",
                req.user_id, req.id
            )));
        }

        self.repo.update_product_by_id(req).await
    }
}
