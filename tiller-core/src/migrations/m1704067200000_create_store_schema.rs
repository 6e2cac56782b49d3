//! Baseline storefront schema.
//!
//! Order statuses live in a reference table rather than a native enum type,
//! so extending the status ladder later is a plain insert.

use duckdb::Connection;

use crate::adapters::duckdb::table_exists;
use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1704067200000-CreateStoreSchema",
    up,
    down: Revert::Reversible(down),
};

fn up(conn: &Connection) -> Result<()> {
    if table_exists(conn, "users")? {
        return Ok(());
    }

    conn.execute_batch(
        "CREATE TABLE users (
             id UUID PRIMARY KEY DEFAULT uuid(),
             email VARCHAR NOT NULL UNIQUE,
             password_hash VARCHAR NOT NULL,
             role VARCHAR NOT NULL DEFAULT 'customer',
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );

         CREATE TABLE user_profiles (
             id UUID PRIMARY KEY DEFAULT uuid(),
             user_id UUID NOT NULL,
             first_name VARCHAR,
             last_name VARCHAR,
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );
         CREATE INDEX idx_user_profiles_user ON user_profiles (user_id);

         CREATE TABLE categories (
             id UUID PRIMARY KEY DEFAULT uuid(),
             name VARCHAR NOT NULL,
             slug VARCHAR NOT NULL UNIQUE,
             description VARCHAR,
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );

         CREATE TABLE category_images (
             id UUID PRIMARY KEY DEFAULT uuid(),
             category_id UUID NOT NULL,
             image_url VARCHAR NOT NULL,
             alt_text VARCHAR,
             display_order INTEGER NOT NULL DEFAULT 0,
             is_default BOOLEAN NOT NULL DEFAULT false,
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );

         CREATE TABLE products (
             id UUID PRIMARY KEY DEFAULT uuid(),
             name VARCHAR NOT NULL,
             slug VARCHAR NOT NULL UNIQUE,
             description VARCHAR,
             category_id UUID,
             price DECIMAL(10,2) NOT NULL DEFAULT 0,
             stock INTEGER NOT NULL DEFAULT 0,
             is_active BOOLEAN NOT NULL DEFAULT true,
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );
         CREATE INDEX idx_products_category ON products (category_id);

         CREATE TABLE product_attributes (
             id UUID PRIMARY KEY DEFAULT uuid(),
             product_id UUID NOT NULL,
             name VARCHAR NOT NULL,
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );
         CREATE INDEX idx_product_attributes_product ON product_attributes (product_id);

         CREATE TABLE product_images (
             id UUID PRIMARY KEY DEFAULT uuid(),
             product_id UUID NOT NULL,
             image_url VARCHAR NOT NULL,
             alt_text VARCHAR,
             display_order INTEGER NOT NULL DEFAULT 0,
             is_default BOOLEAN NOT NULL DEFAULT false,
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );
         CREATE INDEX idx_product_images_product ON product_images (product_id);
         CREATE INDEX idx_product_images_order ON product_images (display_order, is_default);

         CREATE TABLE product_variants (
             id UUID PRIMARY KEY DEFAULT uuid(),
             product_id UUID NOT NULL,
             weight VARCHAR NOT NULL,
             price DECIMAL(10,2) NOT NULL DEFAULT 0,
             stock INTEGER NOT NULL DEFAULT 0,
             offer VARCHAR,
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );
         CREATE INDEX idx_product_variants_product ON product_variants (product_id);

         CREATE TABLE product_views (
             id UUID PRIMARY KEY DEFAULT uuid(),
             product_id UUID NOT NULL,
             user_id UUID,
             viewed_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );
         CREATE INDEX idx_product_views_product ON product_views (product_id);

         CREATE TABLE order_statuses (
             value VARCHAR PRIMARY KEY,
             sort_order INTEGER NOT NULL
         );
         INSERT INTO order_statuses (value, sort_order) VALUES
             ('pending', 10),
             ('confirmed', 20),
             ('packed', 30),
             ('shipped', 40),
             ('delivered', 50),
             ('cancelled', 60);

         CREATE TABLE orders (
             id UUID PRIMARY KEY DEFAULT uuid(),
             user_id UUID NOT NULL,
             status VARCHAR NOT NULL DEFAULT 'pending' REFERENCES order_statuses (value),
             total DECIMAL(10,2) NOT NULL DEFAULT 0,
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );
         CREATE INDEX idx_orders_user ON orders (user_id);

         CREATE TABLE order_status_history (
             id UUID PRIMARY KEY DEFAULT uuid(),
             order_id UUID NOT NULL,
             from_status VARCHAR REFERENCES order_statuses (value),
             to_status VARCHAR NOT NULL REFERENCES order_statuses (value),
             changed_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );
         CREATE INDEX idx_order_status_history_order ON order_status_history (order_id);

         CREATE TABLE carts (
             id UUID PRIMARY KEY DEFAULT uuid(),
             user_id UUID,
             session_id VARCHAR,
             currency VARCHAR NOT NULL DEFAULT 'INR',
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );

         CREATE TABLE cart_items (
             id UUID PRIMARY KEY DEFAULT uuid(),
             cart_id UUID NOT NULL,
             product_id UUID NOT NULL,
             variant VARCHAR,
             quantity INTEGER NOT NULL DEFAULT 1,
             price DECIMAL(10,2) NOT NULL DEFAULT 0,
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );
         CREATE INDEX idx_cart_items_cart ON cart_items (cart_id);

         CREATE TABLE wishlists (
             id UUID PRIMARY KEY DEFAULT uuid(),
             user_id UUID NOT NULL,
             product_id UUID NOT NULL,
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );
         CREATE UNIQUE INDEX uq_wishlists_user_product ON wishlists (user_id, product_id);",
    )?;
    Ok(())
}

fn down(conn: &Connection) -> Result<()> {
    // Reverse creation order so foreign key references drop cleanly
    conn.execute_batch(
        "DROP TABLE IF EXISTS wishlists;
         DROP TABLE IF EXISTS cart_items;
         DROP TABLE IF EXISTS carts;
         DROP TABLE IF EXISTS order_status_history;
         DROP TABLE IF EXISTS orders;
         DROP TABLE IF EXISTS order_statuses;
         DROP TABLE IF EXISTS product_views;
         DROP TABLE IF EXISTS product_variants;
         DROP TABLE IF EXISTS product_images;
         DROP TABLE IF EXISTS product_attributes;
         DROP TABLE IF EXISTS products;
         DROP TABLE IF EXISTS category_images;
         DROP TABLE IF EXISTS categories;
         DROP TABLE IF EXISTS user_profiles;
         DROP TABLE IF EXISTS users;",
    )?;
    Ok(())
}
