//! Configuration access for receipt-service.
//!
//! All business-profile and delivery settings come from the host system's
//! configuration store, keyed by the option names the administration screen
//! writes.

/// Option keys written by the administration screen.
pub mod keys {
    pub const BUSINESS_NAME: &str = "mm-pdf-business-name";
    pub const BUSINESS_ADDRESS: &str = "mm-pdf-business-address";
    pub const BUSINESS_TAX_LABEL: &str = "mm-pdf-business-tax-label";
    pub const BUSINESS_TAX_ID: &str = "mm-pdf-business-tax-id";
    pub const FOOTER_SECTION_1: &str = "mm-pdf-footer-section-1";
    pub const FOOTER_SECTION_2: &str = "mm-pdf-footer-section-2";
    pub const EMAIL_FROM: &str = "mm-pdf-email-from";
    pub const EMAIL_FROM_NAME: &str = "mm-pdf-email-from-name";
    pub const EMAIL_SUBJECT: &str = "mm-pdf-email-subject";
    pub const EMAIL_BODY: &str = "mm-pdf-email-body";
    pub const BILLING_CUSTOM_FIELD_ID: &str = "mm-pdf-email-billing-custom-field-id";
    pub const CC_CUSTOM_FIELD_ID: &str = "mm-pdf-email-cc-field-id";
}

/// Read-only key/value configuration supplied by the host system.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Merchant identity and branding shown on every receipt.
#[derive(Debug, Clone)]
pub struct BusinessProfile {
    pub business_name: String,
    pub business_address: String,
    pub tax_label: Option<String>,
    pub tax_id: Option<String>,
    /// Free-text blocks rendered verbatim below the line-item table. Both
    /// may carry their own markup.
    pub footer_section_1: String,
    pub footer_section_2: String,
}

/// From identity and message templates for the delivery email. Subject and
/// body are passed through verbatim for the host templating system.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub from_address: String,
    pub from_name: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Ids of the administrator-defined custom fields the mapper reads.
#[derive(Debug, Clone, Default)]
pub struct CustomFieldIds {
    pub billing_notes: Option<String>,
    pub cc_email: Option<String>,
}

/// Complete receipt configuration snapshot, loaded once per generation.
#[derive(Debug, Clone)]
pub struct ReceiptSettings {
    pub profile: BusinessProfile,
    pub email: EmailSettings,
    pub custom_fields: CustomFieldIds,
}

impl ReceiptSettings {
    /// Load settings from the host configuration store.
    ///
    /// Returns `None` unless the business name, business address, from
    /// address, email subject and email body are all configured. An
    /// incomplete profile disables receipt generation entirely.
    pub fn load(store: &dyn ConfigStore) -> Option<Self> {
        let business_name = non_empty(store, keys::BUSINESS_NAME)?;
        let business_address = non_empty(store, keys::BUSINESS_ADDRESS)?;
        let from_address = non_empty(store, keys::EMAIL_FROM)?;
        let subject = non_empty(store, keys::EMAIL_SUBJECT)?;
        let body = non_empty(store, keys::EMAIL_BODY)?;

        Some(ReceiptSettings {
            profile: BusinessProfile {
                business_name,
                business_address,
                tax_label: non_empty(store, keys::BUSINESS_TAX_LABEL),
                tax_id: non_empty(store, keys::BUSINESS_TAX_ID),
                footer_section_1: store.get(keys::FOOTER_SECTION_1).unwrap_or_default(),
                footer_section_2: store.get(keys::FOOTER_SECTION_2).unwrap_or_default(),
            },
            email: EmailSettings {
                from_address,
                from_name: non_empty(store, keys::EMAIL_FROM_NAME),
                subject,
                body,
            },
            custom_fields: CustomFieldIds {
                billing_notes: non_empty(store, keys::BILLING_CUSTOM_FIELD_ID),
                cc_email: non_empty(store, keys::CC_CUSTOM_FIELD_ID),
            },
        })
    }
}

fn non_empty(store: &dyn ConfigStore, key: &str) -> Option<String> {
    store
        .get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
