//! Metafield namespace and key vocabulary for reservation tracking.

/// Namespace for every metafield this service owns.
pub const NAMESPACE: &str = "reservation";

/// Product metafield keys.
pub const K_AVAILABILITY_STATUS: &str = "availability_status";
pub const K_RESERVATION_NUMBER: &str = "reservation_number";

/// Descriptive keys written onto the created draft order for downstream
/// consumers (notification templates and back-office tooling).
pub const K_PRODUCT_HANDLE: &str = "product_handle";
pub const K_PRACTICE_NAME: &str = "practice_name";
pub const K_CUSTOMER_EMAIL: &str = "customer_email";
pub const K_POSTAL_CODE: &str = "postal_code";
pub const K_ROLE: &str = "role";
pub const K_PRODUCT_TITLE: &str = "product_title";
pub const K_RESERVED_AT: &str = "reserved_at";
pub const K_HOLD_DURATION: &str = "hold_duration";

/// Metafield value type used for every entry we write.
pub const SINGLE_LINE_TEXT: &str = "single_line_text_field";
