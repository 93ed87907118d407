//! Statements against the catalog tables.
//!
//! Each function runs exactly one statement (or one per category for the
//! category inserts) on the connection it is handed. Nothing here opens a
//! transaction; callers sequence the statements themselves.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use uuid::Uuid;

use crate::db::models::*;
use crate::db::schema::{kategori, product, shops};
use crate::models::{page_offset, Category, ProductFilter, DETAIL_PAGE_SIZE};

const LIST_SHOPS_SQL: &str = "
    SELECT
        COUNT(id) OVER() AS total_data,
        id,
        name
    FROM shops
    WHERE deleted_at IS NULL
      AND user_id = $1
    ORDER BY id
    LIMIT $2 OFFSET $3";

macro_rules! search_sql {
    ($rating:literal, $window:literal) => {
        concat!(
            "SELECT DISTINCT
                product.id AS id,
                product.user_id AS user_id,
                shops.name AS shop_name,
                product.name AS name,
                product.harga AS harga,
                product.penilaian AS penilaian,
                product.merek AS merek,
                product.stok AS stok,
                kategori.name AS kategori
            FROM product
            JOIN kategori ON product.id = kategori.product_id
            JOIN shops ON shops.id = product.shop_id
            WHERE product.merek ILIKE '%' || $1 || '%'
              AND product.name ILIKE '%' || $2 || '%'
              AND CAST(product.harga AS numeric) >= $3
              AND CAST(product.harga AS numeric) <= $4
              AND kategori.name ILIKE '%' || $5 || '%'
              AND product.deleted_at IS NULL",
            $rating,
            " ORDER BY id, kategori ",
            $window
        )
    };
}

const SEARCH_SQL: &str = search_sql!("", "LIMIT $6 OFFSET $7");
const SEARCH_BY_RATING_SQL: &str =
    search_sql!(" AND product.penilaian = $6", "LIMIT $7 OFFSET $8");

pub fn insert_shop(conn: &mut PgConnection, new_shop: NewShop<'_>) -> QueryResult<Uuid> {
    diesel::insert_into(shops::table)
        .values(&new_shop)
        .returning(shops::id)
        .get_result(conn)
}

pub fn find_active_shop(conn: &mut PgConnection, id: Uuid) -> QueryResult<Option<ShopRow>> {
    shops::table
        .filter(shops::id.eq(id))
        .filter(shops::deleted_at.is_null())
        .select((shops::name, shops::description, shops::terms))
        .first::<ShopRow>(conn)
        .optional()
}

/// `None` when no live shop matches both the id and the owner.
pub fn update_owned_shop(
    conn: &mut PgConnection,
    id: Uuid,
    user_id: Uuid,
    changes: ShopChanges<'_>,
) -> QueryResult<Option<Uuid>> {
    diesel::update(
        shops::table
            .filter(shops::id.eq(id))
            .filter(shops::user_id.eq(user_id))
            .filter(shops::deleted_at.is_null()),
    )
    .set(&changes)
    .returning(shops::id)
    .get_result(conn)
    .optional()
}

pub fn soft_delete_owned_shop(
    conn: &mut PgConnection,
    id: Uuid,
    user_id: Uuid,
    at: NaiveDateTime,
) -> QueryResult<usize> {
    diesel::update(
        shops::table
            .filter(shops::id.eq(id))
            .filter(shops::user_id.eq(user_id))
            .filter(shops::deleted_at.is_null()),
    )
    .set(shops::deleted_at.eq(Some(at)))
    .execute(conn)
}

pub fn soft_delete_shop_products(
    conn: &mut PgConnection,
    shop_id: Uuid,
    user_id: Uuid,
    at: NaiveDateTime,
) -> QueryResult<usize> {
    diesel::update(
        product::table
            .filter(product::shop_id.eq(shop_id))
            .filter(product::user_id.eq(user_id))
            .filter(product::deleted_at.is_null()),
    )
    .set(product::deleted_at.eq(Some(at)))
    .execute(conn)
}

pub fn list_owned_shops(
    conn: &mut PgConnection,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> QueryResult<Vec<ShopListRow>> {
    diesel::sql_query(LIST_SHOPS_SQL)
        .bind::<diesel::sql_types::Uuid, _>(user_id)
        .bind::<BigInt, _>(limit)
        .bind::<BigInt, _>(offset)
        .load(conn)
}

fn product_columns() -> (
    product::id,
    product::user_id,
    product::shop_id,
    product::name,
    product::description,
    product::harga,
    product::stok,
    product::merek,
    product::penilaian,
) {
    (
        product::id,
        product::user_id,
        product::shop_id,
        product::name,
        product::description,
        product::harga,
        product::stok,
        product::merek,
        product::penilaian,
    )
}

pub fn insert_product(conn: &mut PgConnection, new_product: NewProduct<'_>) -> QueryResult<ProductRow> {
    diesel::insert_into(product::table)
        .values(&new_product)
        .returning(product_columns())
        .get_result(conn)
}

/// Inserts one row per category, stopping at the first failure. Rows that
/// were already written stay written.
pub fn insert_categories(
    conn: &mut PgConnection,
    product_id: Uuid,
    categories: &[Category],
) -> QueryResult<Vec<Category>> {
    let mut inserted = Vec::with_capacity(categories.len());
    for category in categories {
        diesel::insert_into(kategori::table)
            .values(NewKategori {
                product_id,
                name: &category.name,
            })
            .execute(conn)?;
        inserted.push(Category {
            product_id,
            name: category.name.clone(),
        });
    }
    Ok(inserted)
}

pub fn product_detail_rows(conn: &mut PgConnection, id: Uuid) -> QueryResult<Vec<ProductDetailRow>> {
    product::table
        .inner_join(shops::table)
        .inner_join(kategori::table)
        .filter(product::id.eq(id))
        .filter(product::deleted_at.is_null())
        .select((
            product::id,
            product::user_id,
            product::shop_id,
            shops::name,
            product::name,
            product::harga,
            product::description,
            product::stok,
            product::penilaian,
            product::merek,
            kategori::name,
        ))
        .order(kategori::name.asc())
        .load(conn)
}

/// One fixed-size page of a shop's live products, one row per category.
pub fn shop_product_rows(
    conn: &mut PgConnection,
    shop_id: Uuid,
    page: i64,
) -> QueryResult<Vec<ShopProductRow>> {
    product::table
        .inner_join(kategori::table)
        .filter(product::shop_id.eq(shop_id))
        .filter(product::deleted_at.is_null())
        .select((
            product::id,
            product::name,
            product::description,
            product::harga,
            product::stok,
            kategori::name,
        ))
        .order((product::name.asc(), product::id.asc(), kategori::name.asc()))
        .limit(DETAIL_PAGE_SIZE)
        .offset(page_offset(page, DETAIL_PAGE_SIZE))
        .load(conn)
}

/// Runs the search with or without the rating predicate. `filter` must
/// already carry its defaults.
pub fn search_rows(conn: &mut PgConnection, filter: &ProductFilter) -> QueryResult<Vec<SearchRow>> {
    let sql = if filter.rating > 0 {
        SEARCH_BY_RATING_SQL
    } else {
        SEARCH_SQL
    };

    let query = diesel::sql_query(sql)
        .bind::<Text, _>(filter.brand.as_str())
        .bind::<Text, _>(filter.name.as_str())
        .bind::<BigInt, _>(filter.min_price)
        .bind::<BigInt, _>(filter.max_price)
        .bind::<Text, _>(filter.category.as_str());

    if filter.rating > 0 {
        query
            .bind::<Integer, _>(filter.rating)
            .bind::<BigInt, _>(filter.pagination)
            .bind::<BigInt, _>(filter.offset())
            .load(conn)
    } else {
        query
            .bind::<BigInt, _>(filter.pagination)
            .bind::<BigInt, _>(filter.offset())
            .load(conn)
    }
}

/// `None` when the product does not exist or is soft-deleted.
pub fn update_live_product(
    conn: &mut PgConnection,
    id: Uuid,
    changes: ProductChanges<'_>,
) -> QueryResult<Option<ProductRow>> {
    diesel::update(
        product::table
            .filter(product::id.eq(id))
            .filter(product::deleted_at.is_null()),
    )
    .set(&changes)
    .returning(product_columns())
    .get_result(conn)
    .optional()
}

pub fn delete_categories(conn: &mut PgConnection, product_id: Uuid) -> QueryResult<usize> {
    diesel::delete(kategori::table.filter(kategori::product_id.eq(product_id))).execute(conn)
}

pub fn soft_delete_product(conn: &mut PgConnection, id: Uuid, at: NaiveDateTime) -> QueryResult<usize> {
    diesel::update(
        product::table
            .filter(product::id.eq(id))
            .filter(product::deleted_at.is_null()),
    )
    .set(product::deleted_at.eq(Some(at)))
    .execute(conn)
}

pub fn soft_delete_categories(
    conn: &mut PgConnection,
    product_id: Uuid,
    at: NaiveDateTime,
) -> QueryResult<usize> {
    diesel::update(
        kategori::table
            .filter(kategori::product_id.eq(product_id))
            .filter(kategori::deleted_at.is_null()),
    )
    .set(kategori::deleted_at.eq(Some(at)))
    .execute(conn)
}
