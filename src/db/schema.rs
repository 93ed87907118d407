diesel::table! {
    shops (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
        description -> Varchar,
        terms -> Text,
        deleted_at -> Nullable<Timestamp>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    product (id) {
        id -> Uuid,
        user_id -> Uuid,
        shop_id -> Uuid,
        name -> Varchar,
        description -> Text,
        harga -> Varchar,
        stok -> Int4,
        merek -> Varchar,
        penilaian -> Int4,
        deleted_at -> Nullable<Timestamp>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

// The table has no primary key; diesel only needs one declared.
diesel::table! {
    kategori (product_id, name) {
        product_id -> Uuid,
        name -> Varchar,
        deleted_at -> Nullable<Timestamp>,
    }
}

diesel::joinable!(product -> shops (shop_id));
diesel::joinable!(kategori -> product (product_id));

diesel::allow_tables_to_appear_in_same_query!(
    shops,
    product,
    kategori,
);
