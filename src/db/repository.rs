use std::fmt::Debug;

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use uuid::Uuid;

use crate::db::aggregate::{self, parse_price};
use crate::db::connection::PgPool;
use crate::db::models::{NewProduct, NewShop, ProductChanges, ProductRow, ShopChanges};
use crate::db::queries;
use crate::error::{parse_id, ShopError};
use crate::models::*;

/// Data access for shops, products and their categories.
#[async_trait]
pub trait ShopRepository: Send + Sync {
    async fn create_shop(&self, req: &CreateShopRequest) -> Result<CreateShopResponse, ShopError>;
    async fn get_shop(&self, id: Uuid) -> Result<GetShopResponse, ShopError>;
    async fn update_shop(&self, req: &UpdateShopRequest) -> Result<UpdateShopResponse, ShopError>;
    /// Soft-deletes the shop and then the owner's products under it. The two
    /// writes are separate statements: a failure on the second leaves the
    /// shop deleted and its products live.
    async fn delete_shop(&self, req: &DeleteShopRequest) -> Result<(), ShopError>;
    async fn list_shops(&self, req: &ShopsRequest) -> Result<ShopsResponse, ShopError>;
    /// Writes the product, then its categories one by one. A failed category
    /// insert does not remove the product row.
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
    /// Replaces the scalar fields and the whole category set of a live
    /// product.
    async fn update_product_by_id(&self, req: &UpdateProductRequest) -> Result<UpdatedProduct, ShopError>;
}

/// Postgres-backed repository. Every operation runs its diesel statements on
/// the blocking pool with a connection of its own.
#[derive(Clone)]
pub struct PgShopRepository {
    pool: PgPool,
}

impl PgShopRepository {
    pub fn new(pool: PgPool) -> Self {
        PgShopRepository { pool }
    }

    async fn run<T, F>(&self, op: F) -> Result<T, ShopError>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, ShopError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            op(&mut conn)
        })
        .await?
    }
}

fn report<'a, P>(op: &'static str, payload: &'a P) -> impl FnOnce(ShopError) -> ShopError + 'a
where
    P: Debug + ?Sized,
{
    move |err| {
        match &err {
            ShopError::Persistence(_) => {
                tracing::error!(error = %err, ?payload, "repository::{op} - failed")
            }
            _ => tracing::debug!(error = %err, ?payload, "repository::{op} - rejected"),
        }
        err
    }
}

fn product_response(row: ProductRow, categories: Vec<Category>) -> Result<ProductResponse, ShopError> {
    Ok(ProductResponse {
        price: parse_price(&row.harga)?,
        id: row.id,
        user_id: row.user_id,
        shop_id: row.shop_id,
        shop_name: None,
        name: row.name,
        description: row.description,
        categories,
        stock: row.stok,
        brand: row.merek,
        rating: row.penilaian,
    })
}

#[async_trait]
impl ShopRepository for PgShopRepository {
    async fn create_shop(&self, req: &CreateShopRequest) -> Result<CreateShopResponse, ShopError> {
        let shop = req.clone();
        self.run(move |conn| {
            let id = queries::insert_shop(
                conn,
                NewShop {
                    user_id: shop.user_id,
                    name: &shop.name,
                    description: &shop.description,
                    terms: &shop.terms,
                },
            )?;
            Ok(CreateShopResponse { id })
        })
        .await
        .map_err(report("create_shop", req))
    }

    async fn get_shop(&self, id: Uuid) -> Result<GetShopResponse, ShopError> {
        self.run(move |conn| {
            let row = queries::find_active_shop(conn, id)?.ok_or(ShopError::NotFound("shop"))?;
            Ok(GetShopResponse {
                name: row.name,
                description: row.description,
                terms: row.terms,
            })
        })
        .await
        .map_err(report("get_shop", &id))
    }

    async fn update_shop(&self, req: &UpdateShopRequest) -> Result<UpdateShopResponse, ShopError> {
        let shop = req.clone();
        self.run(move |conn| {
            let changes = ShopChanges {
                name: &shop.name,
                description: &shop.description,
                terms: &shop.terms,
                updated_at: Utc::now().naive_utc(),
            };
            let id = queries::update_owned_shop(conn, shop.id, shop.user_id, changes)?
                .ok_or(ShopError::NotFoundOrForbidden("shop"))?;
            Ok(UpdateShopResponse { id })
        })
        .await
        .map_err(report("update_shop", req))
    }

    async fn delete_shop(&self, req: &DeleteShopRequest) -> Result<(), ShopError> {
        let (id, user_id) = (req.id, req.user_id);
        self.run(move |conn| {
            let now = Utc::now().naive_utc();
            if queries::soft_delete_owned_shop(conn, id, user_id, now)? == 0 {
                return Err(ShopError::NotFoundOrForbidden("shop"));
            }
            let products = queries::soft_delete_shop_products(conn, id, user_id, now)?;
            tracing::debug!(shop_id = %id, products, "soft-deleted shop and its products");
            Ok(())
        })
        .await
        .map_err(report("delete_shop", req))
    }

    async fn list_shops(&self, req: &ShopsRequest) -> Result<ShopsResponse, ShopError> {
        let mut req = req.clone();
        req.set_default();
        let (user_id, page, paginate, offset) = (req.user_id, req.page, req.paginate, req.offset());

        let rows = self
            .run(move |conn| Ok(queries::list_owned_shops(conn, user_id, paginate, offset)?))
            .await
            .map_err(report("list_shops", &req))?;

        Ok(aggregate::shop_page(rows, page, paginate))
    }

    async fn create_product(&self, req: &CreateProductRequest) -> Result<ProductResponse, ShopError> {
        let new = req.clone();
        self.run(move |conn| {
            let row = queries::insert_product(
                conn,
                NewProduct {
                    user_id: new.user_id,
                    shop_id: new.shop_id,
                    name: &new.name,
                    description: &new.description,
                    harga: new.price.to_string(),
                    stok: new.stock,
                    merek: &new.brand,
                },
            )?;
            let categories = queries::insert_categories(conn, row.id, &new.categories)?;
            product_response(row, categories)
        })
        .await
        .map_err(report("create_product", req))
    }

    async fn get_detail_shop_and_product(
        &self,
        id: Uuid,
        paginate: i64,
        page: i64,
    ) -> Result<ShopDetail, ShopError> {
        let page = clamp_page(page);
        if paginate != DETAIL_PAGE_SIZE {
            tracing::debug!(paginate, "shop detail pages by {DETAIL_PAGE_SIZE} regardless of paginate");
        }

        let shop = self.run(move |conn| {
            queries::find_active_shop(conn, id)?.ok_or(ShopError::NotFound("shop"))
        });
        let products = self.run(move |conn| Ok(queries::shop_product_rows(conn, id, page)?));

        let (shop, rows) = tokio::try_join!(shop, products)
            .map_err(report("get_detail_shop_and_product", &id))?;

        aggregate::build_shop_detail(id, shop, rows, page)
    }

    async fn search_products(&self, filter: &ProductFilter) -> Result<ProductsResponse, ShopError> {
        let mut filter = filter.clone();
        filter.set_default_filter();

        let query = filter.clone();
        let rows = self
            .run(move |conn| Ok(queries::search_rows(conn, &query)?))
            .await
            .map_err(report("search_products", &filter))?;

        let products = aggregate::flatten_search_rows(rows)?;
        Ok(ProductsResponse::echo(&filter, products))
    }

    async fn get_detail_product(&self, id: &str) -> Result<ProductResponse, ShopError> {
        let id = parse_id(id).map_err(report("get_detail_product", id))?;
        tracing::debug!(%id, "loading product detail");

        let rows = self
            .run(move |conn| Ok(queries::product_detail_rows(conn, id)?))
            .await
            .map_err(report("get_detail_product", &id))?;

        aggregate::flatten_product_detail(rows)
    }

    async fn delete_product_by_id(&self, id: &str) -> Result<(), ShopError> {
        let id = parse_id(id).map_err(report("delete_product_by_id", id))?;
        let now = Utc::now().naive_utc();

        // Neither branch is undone if the other one fails.
        let product = self.run(move |conn| Ok(queries::soft_delete_product(conn, id, now)?));
        let categories = self.run(move |conn| Ok(queries::soft_delete_categories(conn, id, now)?));

        let (deleted, _) = tokio::try_join!(product, categories)
            .map_err(report("delete_product_by_id", &id))?;
        if deleted == 0 {
            return Err(ShopError::NotFound("product"));
        }
        Ok(())
    }

    async fn update_product_by_id(&self, req: &UpdateProductRequest) -> Result<UpdatedProduct, ShopError> {
        let update = req.clone();
        self.run(move |conn| {
            let changes = ProductChanges {
                name: &update.name,
                description: &update.description,
                harga: update.price.to_string(),
                stok: update.stock,
                merek: &update.brand,
                updated_at: Utc::now().naive_utc(),
            };
            let row = queries::update_live_product(conn, update.id, changes)?
                .ok_or(ShopError::NotFound("product"))?;

            queries::delete_categories(conn, update.id)?;
            let categories = queries::insert_categories(conn, update.id, &update.categories)?;

            Ok(UpdatedProduct {
                price: parse_price(&row.harga)?,
                id: row.id,
                name: row.name,
                description: row.description,
                categories,
                stock: row.stok,
                brand: row.merek,
            })
        })
        .await
        .map_err(report("update_product_by_id", req))
    }
}
