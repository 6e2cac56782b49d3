//! Built-in migration registry for the storefront database
//!
//! One module per migration. Names carry a millisecond timestamp prefix and
//! the registry must stay in ascending name order; the runner validates this
//! before applying anything.
//!
//! IMPORTANT: When adding a new migration:
//! 1. Create the module: m<timestamp>_<description>.rs with a RECORD const
//! 2. Add the RECORD at the end of the list below
//! 3. Never edit the body of a migration that has shipped - add a new one

mod m1704067200000_create_store_schema;
mod m1705600800000_create_master_admin_preferences;
mod m1733513400000_drop_product_attributes_table;
mod m1733584800000_remove_duplicate_products;
mod m1734748800000_drop_category_images_add_alt_text;
mod m1734783600000_add_category_fields_to_tables;
mod m1734787200000_update_product_images_for_variants;
mod m1734789000001_remove_offer_from_product_variants;
mod m1734793200002_remove_display_order_from_product_images;
mod m1734793300003_remove_is_default_from_product_images;
mod m1736630000000_update_wishlist_and_cart_variants;
mod m1736630000001_add_guest_wishlist_and_remove_currency;
mod m1736631000000_add_middle_name_to_user_profiles;
mod m1736700000000_add_phone_to_users;
mod m1737811200000_add_out_for_delivery_status;

use crate::domain::MigrationRecord;

/// All storefront migrations, in apply order.
pub const STORE_MIGRATIONS: &[MigrationRecord] = &[
    m1704067200000_create_store_schema::RECORD,
    m1705600800000_create_master_admin_preferences::RECORD,
    m1733513400000_drop_product_attributes_table::RECORD,
    m1733584800000_remove_duplicate_products::RECORD,
    m1734748800000_drop_category_images_add_alt_text::RECORD,
    m1734783600000_add_category_fields_to_tables::RECORD,
    m1734787200000_update_product_images_for_variants::RECORD,
    m1734789000001_remove_offer_from_product_variants::RECORD,
    m1734793200002_remove_display_order_from_product_images::RECORD,
    m1734793300003_remove_is_default_from_product_images::RECORD,
    m1736630000000_update_wishlist_and_cart_variants::RECORD,
    m1736630000001_add_guest_wishlist_and_remove_currency::RECORD,
    m1736631000000_add_middle_name_to_user_profiles::RECORD,
    m1736700000000_add_phone_to_users::RECORD,
    m1737811200000_add_out_for_delivery_status::RECORD,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::migration::validate_registry;

    #[test]
    fn test_registry_is_well_ordered() {
        validate_registry(STORE_MIGRATIONS).unwrap();
    }

    #[test]
    fn test_registry_is_not_empty() {
        assert!(!STORE_MIGRATIONS.is_empty());
    }
}
