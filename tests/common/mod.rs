#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use shop_catalog::db::aggregate;
use shop_catalog::db::models::{ProductDetailRow, SearchRow, ShopListRow, ShopProductRow, ShopRow};
use shop_catalog::db::ShopRepository;
use shop_catalog::error::parse_id;
use shop_catalog::models::*;
use shop_catalog::service::CatalogService;
use shop_catalog::ShopError;

struct StoredShop {
    id: Uuid,
    user_id: Uuid,
    name: String,
    description: String,
    terms: String,
    deleted: bool,
}

struct StoredProduct {
    id: Uuid,
    user_id: Uuid,
    shop_id: Uuid,
    name: String,
    description: String,
    harga: String,
    stok: i32,
    merek: String,
    penilaian: i32,
    deleted: bool,
}

struct StoredKategori {
    product_id: Uuid,
    name: String,
    deleted: bool,
}

#[derive(Default)]
struct State {
    shops: Vec<StoredShop>,
    products: Vec<StoredProduct>,
    kategori: Vec<StoredKategori>,
}

/// Keeps the three tables in memory and answers with the same row shapes
/// the Postgres queries produce, so flattening runs through the real code.
#[derive(Default)]
pub struct MemoryShopRepository {
    state: Mutex<State>,
}

impl MemoryShopRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ratings have no write path in the API; tests seed them directly.
    pub fn set_rating(&self, product_id: Uuid, rating: i32) {
        let mut state = self.state.lock().unwrap();
        for product in state.products.iter_mut().filter(|p| p.id == product_id) {
            product.penilaian = rating;
        }
    }

    pub fn category_names(&self, product_id: Uuid) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let names = state
            .kategori
            .iter()
            .filter(|k| k.product_id == product_id)
            .map(|k| k.name.clone())
            .collect();
        names
    }

    pub fn product_is_deleted(&self, product_id: Uuid) -> bool {
        let state = self.state.lock().unwrap();
        let deleted = state
            .products
            .iter()
            .any(|p| p.id == product_id && p.deleted);
        deleted
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn window<T>(rows: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    rows.into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl ShopRepository for MemoryShopRepository {
    async fn create_shop(&self, req: &CreateShopRequest) -> Result<CreateShopResponse, ShopError> {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().shops.push(StoredShop {
            id,
            user_id: req.user_id,
            name: req.name.clone(),
            description: req.description.clone(),
            terms: req.terms.clone(),
            deleted: false,
        });
        Ok(CreateShopResponse { id })
    }

    async fn get_shop(&self, id: Uuid) -> Result<GetShopResponse, ShopError> {
        let state = self.state.lock().unwrap();
        let shop = state
            .shops
            .iter()
            .find(|s| s.id == id && !s.deleted)
            .map(|s| GetShopResponse {
                name: s.name.clone(),
                description: s.description.clone(),
                terms: s.terms.clone(),
            });
        shop.ok_or(ShopError::NotFound("shop"))
    }

    async fn update_shop(&self, req: &UpdateShopRequest) -> Result<UpdateShopResponse, ShopError> {
        let mut state = self.state.lock().unwrap();
        let shop = state
            .shops
            .iter_mut()
            .find(|s| s.id == req.id && s.user_id == req.user_id && !s.deleted)
            .ok_or(ShopError::NotFoundOrForbidden("shop"))?;
        shop.name = req.name.clone();
        shop.description = req.description.clone();
        shop.terms = req.terms.clone();
        Ok(UpdateShopResponse { id: shop.id })
    }

    async fn delete_shop(&self, req: &DeleteShopRequest) -> Result<(), ShopError> {
        let mut state = self.state.lock().unwrap();
        let shop = state
            .shops
            .iter_mut()
            .find(|s| s.id == req.id && s.user_id == req.user_id && !s.deleted)
            .ok_or(ShopError::NotFoundOrForbidden("shop"))?;
        shop.deleted = true;
        for product in state
            .products
            .iter_mut()
            .filter(|p| p.shop_id == req.id && p.user_id == req.user_id)
        {
            product.deleted = true;
        }
        Ok(())
    }

    async fn list_shops(&self, req: &ShopsRequest) -> Result<ShopsResponse, ShopError> {
        let mut req = req.clone();
        req.set_default();

        let state = self.state.lock().unwrap();
        let mut owned: Vec<_> = state
            .shops
            .iter()
            .filter(|s| s.user_id == req.user_id && !s.deleted)
            .collect();
        owned.sort_by_key(|s| s.id);

        let total = owned.len() as i64;
        let rows = owned
            .into_iter()
            .map(|s| ShopListRow {
                total_data: total,
                id: s.id,
                name: s.name.clone(),
            })
            .collect();
        let rows = window(rows, req.paginate, req.offset());

        Ok(aggregate::shop_page(rows, req.page, req.paginate))
    }

    async fn create_product(&self, req: &CreateProductRequest) -> Result<ProductResponse, ShopError> {
        let id = Uuid::new_v4();
        let mut state = self.state.lock().unwrap();
        state.products.push(StoredProduct {
            id,
            user_id: req.user_id,
            shop_id: req.shop_id,
            name: req.name.clone(),
            description: req.description.clone(),
            harga: req.price.to_string(),
            stok: req.stock,
            merek: req.brand.clone(),
            penilaian: 0,
            deleted: false,
        });

        let categories: Vec<Category> = req
            .categories
            .iter()
            .map(|c| Category {
                product_id: id,
                name: c.name.clone(),
            })
            .collect();
        for category in &categories {
            state.kategori.push(StoredKategori {
                product_id: id,
                name: category.name.clone(),
                deleted: false,
            });
        }

        Ok(ProductResponse {
            id,
            user_id: req.user_id,
            shop_id: req.shop_id,
            shop_name: None,
            name: req.name.clone(),
            description: req.description.clone(),
            categories,
            price: req.price,
            stock: req.stock,
            brand: req.brand.clone(),
            rating: 0,
        })
    }

    async fn get_detail_shop_and_product(
        &self,
        id: Uuid,
        _paginate: i64,
        page: i64,
    ) -> Result<ShopDetail, ShopError> {
        let page = clamp_page(page);
        let state = self.state.lock().unwrap();
        let shop = state
            .shops
            .iter()
            .find(|s| s.id == id && !s.deleted)
            .map(|s| ShopRow {
                name: s.name.clone(),
                description: s.description.clone(),
                terms: s.terms.clone(),
            })
            .ok_or(ShopError::NotFound("shop"))?;

        let mut rows: Vec<ShopProductRow> = state
            .products
            .iter()
            .filter(|p| p.shop_id == id && !p.deleted)
            .flat_map(|p| {
                state
                    .kategori
                    .iter()
                    .filter(move |k| k.product_id == p.id)
                    .map(move |k| ShopProductRow {
                        product_id: p.id,
                        name: p.name.clone(),
                        description: p.description.clone(),
                        harga: p.harga.clone(),
                        stok: p.stok,
                        kategori: k.name.clone(),
                    })
            })
            .collect();
        rows.sort_by(|a, b| {
            (&a.name, a.product_id, &a.kategori).cmp(&(&b.name, b.product_id, &b.kategori))
        });
        let rows = window(rows, DETAIL_PAGE_SIZE, page_offset(page, DETAIL_PAGE_SIZE));

        aggregate::build_shop_detail(id, shop, rows, page)
    }

    async fn search_products(&self, filter: &ProductFilter) -> Result<ProductsResponse, ShopError> {
        let mut filter = filter.clone();
        filter.set_default_filter();

        let state = self.state.lock().unwrap();
        let mut rows: Vec<SearchRow> = Vec::new();
        for p in state.products.iter().filter(|p| !p.deleted) {
            let price: i64 = p.harga.parse().unwrap();
            if !contains(&p.merek, &filter.brand)
                || !contains(&p.name, &filter.name)
                || price < filter.min_price
                || price > filter.max_price
                || (filter.rating > 0 && p.penilaian != filter.rating)
            {
                continue;
            }
            let Some(shop) = state.shops.iter().find(|s| s.id == p.shop_id) else {
                continue;
            };
            for k in state
                .kategori
                .iter()
                .filter(|k| k.product_id == p.id && contains(&k.name, &filter.category))
            {
                let row = SearchRow {
                    id: p.id,
                    user_id: p.user_id,
                    shop_name: shop.name.clone(),
                    name: p.name.clone(),
                    harga: p.harga.clone(),
                    penilaian: p.penilaian,
                    merek: p.merek.clone(),
                    stok: p.stok,
                    kategori: k.name.clone(),
                };
                if !rows.iter().any(|r| r.id == row.id && r.kategori == row.kategori) {
                    rows.push(row);
                }
            }
        }
        rows.sort_by(|a, b| (a.id, &a.kategori).cmp(&(b.id, &b.kategori)));
        let rows = window(rows, filter.pagination, filter.offset());

        let products = aggregate::flatten_search_rows(rows)?;
        Ok(ProductsResponse::echo(&filter, products))
    }

    async fn get_detail_product(&self, id: &str) -> Result<ProductResponse, ShopError> {
        let id = parse_id(id)?;
        let state = self.state.lock().unwrap();

        let mut rows: Vec<ProductDetailRow> = Vec::new();
        if let Some(p) = state.products.iter().find(|p| p.id == id && !p.deleted) {
            if let Some(shop) = state.shops.iter().find(|s| s.id == p.shop_id) {
                for k in state.kategori.iter().filter(|k| k.product_id == id) {
                    rows.push(ProductDetailRow {
                        id: p.id,
                        user_id: p.user_id,
                        shop_id: p.shop_id,
                        shop_name: shop.name.clone(),
                        name: p.name.clone(),
                        harga: p.harga.clone(),
                        description: p.description.clone(),
                        stok: p.stok,
                        penilaian: p.penilaian,
                        merek: p.merek.clone(),
                        kategori: k.name.clone(),
                    });
                }
            }
        }
        rows.sort_by(|a, b| a.kategori.cmp(&b.kategori));

        aggregate::flatten_product_detail(rows)
    }

    async fn delete_product_by_id(&self, id: &str) -> Result<(), ShopError> {
        let id = parse_id(id)?;
        let mut state = self.state.lock().unwrap();

        let mut deleted = 0;
        for product in state.products.iter_mut().filter(|p| p.id == id && !p.deleted) {
            product.deleted = true;
            deleted += 1;
        }
        for k in state.kategori.iter_mut().filter(|k| k.product_id == id) {
            k.deleted = true;
        }
        if deleted == 0 {
            return Err(ShopError::NotFound("product"));
        }
        Ok(())
    }

    async fn update_product_by_id(&self, req: &UpdateProductRequest) -> Result<UpdatedProduct, ShopError> {
        let mut state = self.state.lock().unwrap();
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == req.id && !p.deleted)
            .ok_or(ShopError::NotFound("product"))?;
        product.name = req.name.clone();
        product.description = req.description.clone();
        product.harga = req.price.to_string();
        product.stok = req.stock;
        product.merek = req.brand.clone();

        state.kategori.retain(|k| k.product_id != req.id);
        let categories: Vec<Category> = req
            .categories
            .iter()
            .map(|c| Category {
                product_id: req.id,
                name: c.name.clone(),
            })
            .collect();
        for category in &categories {
            state.kategori.push(StoredKategori {
                product_id: req.id,
                name: category.name.clone(),
                deleted: false,
            });
        }

        Ok(UpdatedProduct {
            id: req.id,
            name: req.name.clone(),
            description: req.description.clone(),
            categories,
            price: req.price,
            stock: req.stock,
            brand: req.brand.clone(),
        })
    }
}

pub fn memory_service() -> (Arc<MemoryShopRepository>, CatalogService) {
    let repo = Arc::new(MemoryShopRepository::new());
    let service = CatalogService::new(repo.clone());
    (repo, service)
}

pub fn categories(names: &[&str]) -> Vec<Category> {
    names
        .iter()
        .map(|name| Category {
            product_id: Uuid::nil(),
            name: (*name).to_string(),
        })
        .collect()
}

pub fn shop_request(user_id: Uuid, name: &str) -> CreateShopRequest {
    CreateShopRequest {
        user_id,
        name: name.to_string(),
        description: "desc".to_string(),
        terms: "terms".to_string(),
    }
}

pub fn product_request(
    user_id: Uuid,
    shop_id: Uuid,
    name: &str,
    category_names: &[&str],
    price: i64,
) -> CreateProductRequest {
    CreateProductRequest {
        user_id,
        shop_id,
        name: name.to_string(),
        description: format!("{name} description"),
        categories: categories(category_names),
        price,
        stock: 5,
        brand: "Acme".to_string(),
    }
}

pub fn update_request(
    id: Uuid,
    user_id: Uuid,
    name: &str,
    category_names: &[&str],
    price: i64,
) -> UpdateProductRequest {
    UpdateProductRequest {
        id,
        user_id,
        shop_id: None,
        name: name.to_string(),
        description: format!("{name} description"),
        categories: categories(category_names),
        price,
        stock: 7,
        brand: "Acme".to_string(),
    }
}
