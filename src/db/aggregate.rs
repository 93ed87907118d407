//! Row flattening for the join queries.
//!
//! Every join against `kategori` yields one row per category. These helpers
//! group those rows back into one entry per entity in a single pass, keyed
//! through a `BTreeMap` so the output order does not depend on row order.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use uuid::Uuid;

use crate::db::models::{ProductDetailRow, SearchRow, ShopListRow, ShopProductRow, ShopRow};
use crate::error::{PersistenceError, ShopError};
use crate::models::{
    Category, Meta, ProductDetailEntry, ProductResponse, ProductSummary, ShopDetail, ShopItem,
    ShopsResponse, DETAIL_PAGE_SIZE,
};

/// `harga` is persisted as text; anything that is not an integer is a
/// corrupted row, not a zero price.
pub fn parse_price(raw: &str) -> Result<i64, PersistenceError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|source| PersistenceError::MalformedPrice {
            value: raw.to_string(),
            source,
        })
}

/// Collapses the per-category rows of a single product into one response.
pub fn flatten_product_detail(rows: Vec<ProductDetailRow>) -> Result<ProductResponse, ShopError> {
    let mut rows = rows.into_iter();
    let first = rows.next().ok_or(ShopError::NotFound("product"))?;

    let mut categories = vec![Category {
        product_id: first.id,
        name: first.kategori.clone(),
    }];
    categories.extend(rows.map(|row| Category {
        product_id: row.id,
        name: row.kategori,
    }));

    Ok(ProductResponse {
        id: first.id,
        user_id: first.user_id,
        shop_id: first.shop_id,
        shop_name: Some(first.shop_name),
        price: parse_price(&first.harga)?,
        name: first.name,
        description: first.description,
        categories,
        stock: first.stok,
        brand: first.merek,
        rating: first.penilaian,
    })
}

/// Groups shop-page rows by product name, accumulating every category.
///
/// Two distinct products sharing a name collapse into one entry; the id and
/// scalar fields of the first row seen win.
pub fn flatten_shop_products(
    rows: Vec<ShopProductRow>,
) -> Result<Vec<ProductDetailEntry>, ShopError> {
    let mut by_name: BTreeMap<String, ProductDetailEntry> = BTreeMap::new();

    for row in rows {
        let category = Category {
            product_id: row.product_id,
            name: row.kategori,
        };
        match by_name.entry(row.name) {
            Entry::Occupied(mut entry) => entry.get_mut().categories.push(category),
            Entry::Vacant(entry) => {
                let price = parse_price(&row.harga)?;
                let name = entry.key().clone();
                entry.insert(ProductDetailEntry {
                    id: row.product_id,
                    name,
                    description: row.description,
                    categories: vec![category],
                    price,
                    stock: row.stok,
                });
            }
        }
    }

    Ok(by_name.into_values().collect())
}

/// Groups search rows by product id, keeping only the first matching
/// category of each product.
pub fn flatten_search_rows(rows: Vec<SearchRow>) -> Result<Vec<ProductSummary>, ShopError> {
    let mut by_id: BTreeMap<Uuid, ProductSummary> = BTreeMap::new();

    for row in rows {
        if let Entry::Vacant(entry) = by_id.entry(row.id) {
            entry.insert(ProductSummary {
                id: row.id,
                user_id: row.user_id,
                shop_name: row.shop_name,
                name: row.name,
                category: row.kategori,
                price: parse_price(&row.harga)?,
                stock: row.stok,
                rating: row.penilaian,
                brand: row.merek,
            });
        }
    }

    Ok(by_id.into_values().collect())
}

pub fn build_shop_detail(
    shop_id: Uuid,
    shop: ShopRow,
    rows: Vec<ShopProductRow>,
    page: i64,
) -> Result<ShopDetail, ShopError> {
    let products = flatten_shop_products(rows)?;
    let meta = Meta::new(page, DETAIL_PAGE_SIZE, products.len() as i64);

    Ok(ShopDetail {
        shop_id,
        name: shop.name,
        description: shop.description,
        terms: shop.terms,
        sold: 0,
        products,
        meta,
    })
}

pub fn shop_page(rows: Vec<ShopListRow>, page: i64, paginate: i64) -> ShopsResponse {
    let total = rows.first().map(|row| row.total_data).unwrap_or(0);
    let items = rows
        .into_iter()
        .map(|row| ShopItem {
            id: row.id,
            name: row.name,
        })
        .collect();

    ShopsResponse {
        items,
        meta: Meta::new(page, paginate, total),
    }
}
