//! Raw-to-domain conversion functions.
//!
//! Normalization is deliberately defensive: the platform marks almost
//! everything optional, and a half-filled product must render as a
//! record with empty fields, never as an error.

use wildberry_core::{AddressId, CustomerId, Money, Version};

use super::types::{CustomerProfile, Image, Product, ProfileAddress};
use super::wire::{
    RawAddress, RawCustomer, RawImage, RawProduct, RawProductProjection, RawVariant, pick_locale,
};

// =============================================================================
// Product conversions
// =============================================================================

/// Convert a search projection into a display product.
///
/// Projections identify products by URL slug.
#[must_use]
pub fn product_from_projection(projection: RawProductProjection) -> Product {
    let key = pick_locale(projection.slug.as_ref());
    product_with_key(key, projection)
}

/// Convert a full product resource into a display product.
///
/// Full products identify themselves by the master variant SKU.
#[must_use]
pub fn product_from_raw(product: RawProduct) -> Product {
    let current = product.master_data.current;
    let key = current
        .master_variant
        .sku
        .clone()
        .or(product.key)
        .unwrap_or_default();
    product_with_key(key, current)
}

fn product_with_key(key: String, projection: RawProductProjection) -> Product {
    let (price, discounted) = variant_pricing(&projection.master_variant);

    Product {
        key,
        name: pick_locale(projection.name.as_ref()),
        description: pick_locale(projection.description.as_ref()),
        price,
        discounted,
        images: projection
            .master_variant
            .images
            .into_iter()
            .map(convert_image)
            .collect(),
    }
}

/// Extract the first price entry and its discount, if any.
///
/// A variant without price entries yields `(None, None)`.
fn variant_pricing(variant: &RawVariant) -> (Option<Money>, Option<Money>) {
    let Some(entry) = variant.prices.first() else {
        return (None, None);
    };

    let price = Money::new(entry.value.cent_amount, entry.value.currency_code.clone());
    let discounted = entry
        .discounted
        .as_ref()
        .map(|d| Money::new(d.value.cent_amount, d.value.currency_code.clone()));

    (Some(price), discounted)
}

fn convert_image(image: RawImage) -> Image {
    let (width, height) = image
        .dimensions
        .map_or((None, None), |d| (Some(d.w), Some(d.h)));
    Image {
        url: image.url,
        label: image.label,
        width,
        height,
    }
}

// =============================================================================
// Customer conversions
// =============================================================================

/// Convert the customer resource into a profile, resolving each
/// address's default shipping/billing role flags.
#[must_use]
pub fn profile_from_customer(customer: RawCustomer) -> CustomerProfile {
    let default_shipping = customer.default_shipping_address_id;
    let default_billing = customer.default_billing_address_id;

    let addresses = customer
        .addresses
        .into_iter()
        .map(|address| {
            convert_address(address, default_shipping.as_deref(), default_billing.as_deref())
        })
        .collect();

    CustomerProfile {
        id: CustomerId::new(customer.id),
        version: Version::new(customer.version),
        email: customer.email,
        first_name: customer.first_name.unwrap_or_default(),
        last_name: customer.last_name.unwrap_or_default(),
        addresses,
    }
}

fn convert_address(
    address: RawAddress,
    default_shipping: Option<&str>,
    default_billing: Option<&str>,
) -> ProfileAddress {
    let matches_default =
        |default: Option<&str>| match (&address.id, default) {
            (Some(id), Some(default_id)) => id == default_id,
            _ => false,
        };

    ProfileAddress {
        is_default_shipping: matches_default(default_shipping),
        is_default_billing: matches_default(default_billing),
        id: address.id.map(AddressId::new),
        first_name: address.first_name,
        last_name: address.last_name,
        street_name: address.street_name,
        city: address.city,
        postal_code: address.postal_code,
        country: address.country,
    }
}
