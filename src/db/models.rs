use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use uuid::Uuid;

use crate::db::schema::{kategori, product, shops};

#[derive(Insertable, Debug)]
#[diesel(table_name = shops)]
pub struct NewShop<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub terms: &'a str,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = shops)]
pub struct ShopChanges<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub terms: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Debug, Clone)]
pub struct ShopRow {
    pub name: String,
    pub description: String,
    pub terms: String,
}

/// One page entry of the owner's shop listing, carrying the windowed total.
#[derive(QueryableByName, Debug, Clone)]
pub struct ShopListRow {
    #[diesel(sql_type = BigInt)]
    pub total_data: i64,
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: Uuid,
    #[diesel(sql_type = Text)]
    pub name: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = product)]
pub struct NewProduct<'a> {
    pub user_id: Uuid,
    pub shop_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub harga: String,
    pub stok: i32,
    pub merek: &'a str,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = product)]
pub struct ProductChanges<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub harga: String,
    pub stok: i32,
    pub merek: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = kategori)]
pub struct NewKategori<'a> {
    pub product_id: Uuid,
    pub name: &'a str,
}

/// Scalar product columns as written back by an insert or update.
#[derive(Queryable, Debug, Clone)]
pub struct ProductRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shop_id: Uuid,
    pub name: String,
    pub description: String,
    pub harga: String,
    pub stok: i32,
    pub merek: String,
    pub penilaian: i32,
}

/// product ⋈ shops ⋈ kategori, one row per category of a single product.
#[derive(Queryable, Debug, Clone)]
pub struct ProductDetailRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shop_id: Uuid,
    pub shop_name: String,
    pub name: String,
    pub harga: String,
    pub description: String,
    pub stok: i32,
    pub penilaian: i32,
    pub merek: String,
    pub kategori: String,
}

/// product ⋈ kategori for the shop detail page.
#[derive(Queryable, Debug, Clone)]
pub struct ShopProductRow {
    pub product_id: Uuid,
    pub name: String,
    pub description: String,
    pub harga: String,
    pub stok: i32,
    pub kategori: String,
}

/// product ⋈ kategori ⋈ shops, one row per matching category.
#[derive(QueryableByName, Debug, Clone)]
pub struct SearchRow {
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: Uuid,
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub user_id: Uuid,
    #[diesel(sql_type = Text)]
    pub shop_name: String,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub harga: String,
    #[diesel(sql_type = Integer)]
    pub penilaian: i32,
    #[diesel(sql_type = Text)]
    pub merek: String,
    #[diesel(sql_type = Integer)]
    pub stok: i32,
    #[diesel(sql_type = Text)]
    pub kategori: String,
}
