//! Built-in selector lists and keyword defaults.
//!
//! Shopify-oriented: the price and review selectors target common theme
//! classes and popular review apps (Judge.me, Loox, Yotpo, Stamped.io,
//! Rivyo). Broad patterns like `[class*="review"]` are intentional; the
//! review classifier filters the noise they pull in.

/// Common price classes and patterns.
pub(crate) const PRICE_SELECTORS: &[&str] = &[
    ".price",
    ".product-price",
    ".product__price",
    ".price__regular",
    ".price-item",
    "[class*=\"price\"]",
    "[data-price]",
    ".money",
    ".product-single__price",
    ".price-container",
    ".current_price",
    "span.price-item--sale",
];

/// Review widget selectors for popular review apps plus generic patterns.
pub(crate) const REVIEW_SELECTORS: &[&str] = &[
    // Judge.me
    ".jdgm-widget",
    ".jdgm-preview-badge",
    ".jdgm-star-rating",
    "[data-jdgm]",
    // Loox
    ".loox-rating",
    "[class*=\"loox\"]",
    // Yotpo
    ".yotpo",
    ".yotpo-widget",
    ".yotpo-bottomline",
    "[data-yotpo]",
    // Stamped.io
    ".stamped-badge",
    ".stamped-reviews",
    "[data-stamped]",
    // Rivyo
    ".rivyo-widget",
    // Generic
    ".product-reviews",
    ".reviews",
    ".review-widget",
    ".star-rating",
    ".rating",
    "[class*=\"review\"]",
    "[class*=\"rating\"]",
    "[data-reviews]",
    ".shopify-product-reviews",
    "#shopify-product-reviews",
];

/// Shipping-related phrases searched in the page body text.
pub(crate) const SHIPPING_PHRASES: &[&str] = &[
    "free shipping",
    "free delivery",
    "shipping",
    "delivery",
    "ships free",
    "complimentary shipping",
    "we ship",
    "standard shipping",
    "express shipping",
    "shipping cost",
    "shipping info",
    "delivery time",
];

/// Dialog/modal patterns for the semantic fast path: ARIA dialogs, common
/// open/active state classes and well-known popup libraries.
pub(crate) const DIALOG_SELECTORS: &[&str] = &[
    "[aria-modal=\"true\"]",
    "[role=\"dialog\"]",
    "[role=\"alertdialog\"]",
    "dialog[open]",
    ".modal.open",
    ".modal.show",
    ".modal.active",
    ".modal.is-open",
    ".modal.is-visible",
    ".popup.open",
    ".popup.active",
    ".popup.is-visible",
    // Magnific Popup
    ".mfp-ready",
    // Fancybox
    ".fancybox-is-open",
    // Popup Maker
    ".pum-active",
    // Klaviyo forms
    ".klaviyo-form-modal",
];
