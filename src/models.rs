use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper price bound used when a search leaves `max_harga` unset.
pub const NO_PRICE_CEILING: i64 = 99_999_999_999_999;

/// The shop detail view always pages its products four at a time.
pub const DETAIL_PAGE_SIZE: i64 = 4;

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bounds for client-supplied paging. Keeps every offset well inside `i64`.
pub const MAX_PAGE_SIZE: i64 = 100;
pub const MAX_PAGE: i64 = 1_000_000;

const DESCRIPTION_MAX_LEN: usize = 255;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    pub page: i64,
    pub paginate: i64,
    pub total_data: i64,
    pub total_page: i64,
}

impl Meta {
    pub fn new(page: i64, paginate: i64, total_data: i64) -> Self {
        let mut meta = Meta {
            page,
            paginate,
            total_data,
            total_page: 0,
        };
        meta.count_total_page();
        meta
    }

    pub fn count_total_page(&mut self) {
        self.total_page = if self.paginate < 1 || self.total_data < 1 {
            0
        } else {
            self.total_data / self.paginate + i64::from(self.total_data % self.paginate != 0)
        };
    }
}

/// Clamps a 1-based page number into `1..=MAX_PAGE`.
pub fn clamp_page(page: i64) -> i64 {
    page.clamp(1, MAX_PAGE)
}

/// Resolves a requested page size: unset falls back to the default, anything
/// larger than `MAX_PAGE_SIZE` is capped.
pub fn clamp_page_size(size: i64) -> i64 {
    if size < 1 {
        DEFAULT_PAGE_SIZE
    } else {
        size.min(MAX_PAGE_SIZE)
    }
}

/// Row offset of a page. Saturates rather than overflowing.
pub fn page_offset(page: i64, size: i64) -> i64 {
    size.saturating_mul(page.saturating_sub(1).max(0))
}

fn required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shops
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateShopRequest {
    #[serde(skip)]
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub terms: String,
}

impl CreateShopRequest {
    pub fn validate(&self) -> Result<(), String> {
        required("name", &self.name)?;
        required("description", &self.description)?;
        if self.description.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(format!("description cannot exceed {DESCRIPTION_MAX_LEN} characters"));
        }
        required("terms", &self.terms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CreateShopResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GetShopResponse {
    pub name: String,
    pub description: String,
    pub terms: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateShopRequest {
    #[serde(skip)]
    pub user_id: Uuid,
    #[serde(skip)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub terms: String,
}

impl UpdateShopRequest {
    pub fn validate(&self) -> Result<(), String> {
        required("name", &self.name)?;
        required("description", &self.description)?;
        required("terms", &self.terms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UpdateShopResponse {
    pub id: Uuid,
}

#[derive(Debug, Clone)]
pub struct DeleteShopRequest {
    pub user_id: Uuid,
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ShopsRequest {
    #[serde(skip)]
    pub user_id: Uuid,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub paginate: i64,
}

impl ShopsRequest {
    pub fn set_default(&mut self) {
        self.page = clamp_page(self.page);
        self.paginate = clamp_page_size(self.paginate);
    }

    pub fn offset(&self) -> i64 {
        page_offset(self.page, self.paginate)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ShopItem {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShopsResponse {
    pub items: Vec<ShopItem>,
    pub meta: Meta,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Category {
    #[serde(default)]
    pub product_id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateProductRequest {
    #[serde(skip)]
    pub user_id: Uuid,
    pub shop_id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "kategori")]
    pub categories: Vec<Category>,
    #[serde(rename = "harga")]
    pub price: i64,
    #[serde(rename = "stok")]
    pub stock: i32,
    #[serde(rename = "merek")]
    pub brand: String,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), String> {
        required("name", &self.name)?;
        required("description", &self.description)?;
        required("merek", &self.brand)?;
        validate_categories(&self.categories)?;
        validate_price_and_stock(self.price, self.stock)
    }
}

fn validate_categories(categories: &[Category]) -> Result<(), String> {
    if categories.is_empty() {
        return Err("kategori must contain at least one category".to_string());
    }
    for category in categories {
        required("kategori name", &category.name)?;
    }
    Ok(())
}

fn validate_price_and_stock(price: i64, stock: i32) -> Result<(), String> {
    if price <= 0 {
        return Err("harga must be greater than 0".to_string());
    }
    if stock < 0 {
        return Err("stok cannot be negative".to_string());
    }
    Ok(())
}

/// Full product view, as returned by creation and by the detail lookup.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProductResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shop_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub shop_name: Option<String>,
    pub name: String,
    #[serde(rename = "deskripsi")]
    pub description: String,
    #[serde(rename = "kategori")]
    pub categories: Vec<Category>,
    #[serde(rename = "harga")]
    pub price: i64,
    #[serde(rename = "stok")]
    pub stock: i32,
    #[serde(rename = "merek")]
    pub brand: String,
    #[serde(rename = "penilaian")]
    pub rating: i32,
}

/// One search hit. Only a single matching category is carried.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shop_name: String,
    pub name: String,
    #[serde(rename = "kategori")]
    pub category: String,
    #[serde(rename = "harga")]
    pub price: i64,
    #[serde(rename = "stok")]
    pub stock: i32,
    #[serde(rename = "penilaian")]
    pub rating: i32,
    #[serde(rename = "merek")]
    pub brand: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProductFilter {
    #[serde(rename = "kategori")]
    pub category: String,
    pub name: String,
    #[serde(rename = "min_harga")]
    pub min_price: i64,
    #[serde(rename = "max_harga")]
    pub max_price: i64,
    #[serde(rename = "merek")]
    pub brand: String,
    pub rating: i32,
    pub page: i64,
    pub pagination: i64,
}

impl ProductFilter {
    pub fn set_default_filter(&mut self) {
        if self.max_price < 1 {
            self.max_price = NO_PRICE_CEILING;
        }
        self.page = clamp_page(self.page);
        self.pagination = clamp_page_size(self.pagination);
    }

    pub fn offset(&self) -> i64 {
        page_offset(self.page, self.pagination)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductsResponse {
    #[serde(rename = "product")]
    pub products: Vec<ProductSummary>,
    #[serde(rename = "kategorifilter")]
    pub category_filter: String,
    #[serde(rename = "namefilter")]
    pub name_filter: String,
    #[serde(rename = "min_harga")]
    pub min_price: i64,
    #[serde(rename = "max_harga")]
    pub max_price: i64,
    #[serde(rename = "merekfilter")]
    pub brand_filter: String,
    pub rating: i32,
    pub page: i64,
    pub pagination: i64,
    pub meta: Meta,
}

impl ProductsResponse {
    /// `meta` counts the flattened products of this page.
    pub fn echo(filter: &ProductFilter, products: Vec<ProductSummary>) -> Self {
        let meta = Meta::new(filter.page, filter.pagination, products.len() as i64);
        ProductsResponse {
            products,
            category_filter: filter.category.clone(),
            name_filter: filter.name.clone(),
            min_price: filter.min_price,
            max_price: filter.max_price,
            brand_filter: filter.brand.clone(),
            rating: filter.rating,
            page: filter.page,
            pagination: filter.pagination,
            meta,
        }
    }
}

/// A product as listed inside a shop's detail view.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProductDetailEntry {
    pub id: Uuid,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "deskripsi")]
    pub description: String,
    #[serde(rename = "kategori")]
    pub categories: Vec<Category>,
    #[serde(rename = "harga")]
    pub price: i64,
    #[serde(rename = "stok")]
    pub stock: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShopDetail {
    pub shop_id: Uuid,
    pub name: String,
    pub description: String,
    pub terms: String,
    #[serde(rename = "terjual")]
    pub sold: i64,
    #[serde(rename = "daftar_products")]
    pub products: Vec<ProductDetailEntry>,
    pub meta: Meta,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateProductRequest {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip)]
    pub user_id: Uuid,
    /// Accepted for compatibility; ownership is always checked against the
    /// stored product, never against this value.
    #[serde(default)]
    pub shop_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Replaces the stored set, so it may not be empty.
    #[serde(rename = "kategori", default)]
    pub categories: Vec<Category>,
    #[serde(rename = "harga")]
    pub price: i64,
    #[serde(rename = "stok")]
    pub stock: i32,
    #[serde(rename = "merek", default)]
    pub brand: String,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<(), String> {
        required("name", &self.name)?;
        validate_categories(&self.categories)?;
        validate_price_and_stock(self.price, self.stock)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UpdatedProduct {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "kategori")]
    pub categories: Vec<Category>,
    #[serde(rename = "harga")]
    pub price: i64,
    #[serde(rename = "stok")]
    pub stock: i32,
    #[serde(rename = "merek")]
    pub brand: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct DetailShopQuery {
    pub page: Option<i64>,
    pub paginate: Option<i64>,
}
