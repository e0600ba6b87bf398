//! Static page catalog
//!
//! Every page of the onboarding flow is described here as data: its sections,
//! their default edit mode, and each field's kind and validation format. The
//! wizard engine and the renderer are driven entirely by these tables.

use super::step::{Route, StepId};

/// Input widget kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Text that is masked when displayed
    Secret,
    /// Checkbox
    Flag,
    /// One of a fixed set of options
    Choice(&'static [&'static str]),
}

/// Format check applied on top of the required check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Email,
    Password,
    /// Must equal the named field
    Matches(&'static str),
    /// Digits only after stripping separators, length within the bounds
    Digits { min: usize, max: usize },
    /// Calendar date as YYYY-MM-DD
    Date,
    /// Card expiry as MM/YY
    CardExpiry,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub label_key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub format: Option<FieldFormat>,
}

#[derive(Debug, Clone, Copy)]
pub struct SectionDef {
    pub key: &'static str,
    pub title_key: &'static str,
    /// Overrides the page default when set
    pub default_editable: Option<bool>,
    pub fields: &'static [FieldDef],
}

#[derive(Debug, Clone, Copy)]
pub struct PageDef {
    pub route: Route,
    pub title_key: &'static str,
    pub default_editable: bool,
    pub sections: &'static [SectionDef],
}

impl PageDef {
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields().find(|field| field.name == name)
    }

    pub fn section(&self, key: &str) -> Option<&'static SectionDef> {
        self.sections.iter().find(|section| section.key == key)
    }

    /// Section that owns the named field
    pub fn section_of(&self, field: &str) -> Option<&'static SectionDef> {
        self.sections
            .iter()
            .find(|section| section.fields.iter().any(|f| f.name == field))
    }
}

impl SectionDef {
    pub fn is_editable_by_default(&self, page_default: bool) -> bool {
        self.default_editable.unwrap_or(page_default)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|field| field.name)
    }
}

const fn text(name: &'static str, label_key: &'static str, required: bool) -> FieldDef {
    FieldDef {
        name,
        label_key,
        kind: FieldKind::Text,
        required,
        format: None,
    }
}

const fn formatted(
    name: &'static str,
    label_key: &'static str,
    required: bool,
    format: FieldFormat,
) -> FieldDef {
    FieldDef {
        name,
        label_key,
        kind: FieldKind::Text,
        required,
        format: Some(format),
    }
}

const fn secret(
    name: &'static str,
    label_key: &'static str,
    format: Option<FieldFormat>,
) -> FieldDef {
    FieldDef {
        name,
        label_key,
        kind: FieldKind::Secret,
        required: true,
        format,
    }
}

const fn flag(name: &'static str, label_key: &'static str, required: bool) -> FieldDef {
    FieldDef {
        name,
        label_key,
        kind: FieldKind::Flag,
        required,
        format: None,
    }
}

const fn choice(
    name: &'static str,
    label_key: &'static str,
    options: &'static [&'static str],
) -> FieldDef {
    FieldDef {
        name,
        label_key,
        kind: FieldKind::Choice(options),
        required: true,
        format: None,
    }
}

const fn section(key: &'static str, title_key: &'static str, fields: &'static [FieldDef]) -> SectionDef {
    SectionDef {
        key,
        title_key,
        default_editable: None,
        fields,
    }
}

const ZIP: FieldFormat = FieldFormat::Digits { min: 5, max: 5 };
const PHONE: FieldFormat = FieldFormat::Digits { min: 10, max: 10 };

// Field groups referenced by the visibility rules

pub const BILLING_ADDRESS_FIELDS: [&str; 4] =
    ["billingStreet", "billingCity", "billingState", "billingZip"];
pub const SHIPPING_ADDRESS_FIELDS: [&str; 4] =
    ["shippingStreet", "shippingCity", "shippingState", "shippingZip"];
pub const ACH_FIELDS: [&str; 3] = ["bankAccountHolder", "routingNumber", "accountNumber"];
pub const CARD_FIELDS: [&str; 4] = ["cardholderName", "cardNumber", "cardExpiry", "cardCvv"];
pub const LOYALTY_TERMS_FIELDS: [&str; 2] = ["loyaltyContactEmail", "loyaltyTermsAccepted"];
pub const TAX_CATEGORY_FIELDS: [&str; 4] = [
    "categoryResale",
    "categoryNonprofit",
    "categoryGovernment",
    "categoryMedical",
];

pub const PAYMENT_METHOD_ACH: &str = "ACH";
pub const PAYMENT_METHOD_CARD: &str = "CreditCard";
pub const ENROLLMENT_ENROLL: &str = "Enroll";
pub const ENROLLMENT_DECLINE: &str = "Decline";
pub const EXEMPTION_TAXABLE: &str = "taxable";
pub const EXEMPTION_EXEMPT: &str = "exempt";

const ACCOUNT_FIELDS: &[FieldDef] = &[
    text("firstName", "field.firstName", true),
    text("lastName", "field.lastName", true),
    formatted("email", "field.email", true, FieldFormat::Email),
    formatted("phone", "field.phone", false, PHONE),
    text("businessName", "field.businessName", true),
];

const NEW_PASSWORD_FIELDS: &[FieldDef] = &[
    secret("password", "field.password", Some(FieldFormat::Password)),
    secret(
        "confirmPassword",
        "field.confirmPassword",
        Some(FieldFormat::Matches("password")),
    ),
];

const LOGIN_FIELDS: &[FieldDef] = &[
    formatted("email", "field.email", true, FieldFormat::Email),
    secret("password", "field.password", None),
];

const PRACTICE_FIELDS: &[FieldDef] = &[
    text("practiceName", "field.practiceName", true),
    choice(
        "practiceType",
        "field.practiceType",
        &["Clinic", "Hospital", "Pharmacy", "Other"],
    ),
    formatted(
        "taxId",
        "field.taxId",
        true,
        FieldFormat::Digits { min: 9, max: 9 },
    ),
];

const BILLING_FIELDS: &[FieldDef] = &[
    text("billingStreet", "field.street", true),
    text("billingCity", "field.city", true),
    text("billingState", "field.state", true),
    formatted("billingZip", "field.zip", true, ZIP),
];

const SHIPPING_FIELDS: &[FieldDef] = &[
    flag("shippingSameAsBilling", "field.shippingSameAsBilling", false),
    text("shippingStreet", "field.street", true),
    text("shippingCity", "field.city", true),
    text("shippingState", "field.state", true),
    formatted("shippingZip", "field.zip", true, ZIP),
];

const LICENSE_FIELDS: &[FieldDef] = &[
    text("practitionerName", "field.practitionerName", true),
    text("licenseNumber", "field.licenseNumber", true),
    text("licenseState", "field.licenseState", true),
    formatted(
        "licenseExpiration",
        "field.licenseExpiration",
        true,
        FieldFormat::Date,
    ),
    text("deaNumber", "field.deaNumber", false),
];

const BUSINESS_FIELDS: &[FieldDef] = &[
    text("legalBusinessName", "field.legalBusinessName", true),
    formatted(
        "yearsInBusiness",
        "field.yearsInBusiness",
        true,
        FieldFormat::Digits { min: 1, max: 3 },
    ),
    formatted(
        "requestedCreditLimit",
        "field.requestedCreditLimit",
        true,
        FieldFormat::Digits { min: 1, max: 9 },
    ),
];

const REFERENCE_FIELDS: &[FieldDef] = &[
    text("bankName", "field.bankName", true),
    formatted("bankPhone", "field.bankPhone", true, PHONE),
    text("tradeReferenceName", "field.tradeReferenceName", false),
    formatted("tradeReferencePhone", "field.tradeReferencePhone", false, PHONE),
];

const AUTO_PAY_ENROLLMENT_FIELDS: &[FieldDef] =
    &[flag("autoPayEnrolled", "field.autoPayEnrolled", false)];

const PAYMENT_FIELDS: &[FieldDef] = &[
    choice(
        "paymentMethodType",
        "field.paymentMethodType",
        &[PAYMENT_METHOD_ACH, PAYMENT_METHOD_CARD],
    ),
    text("bankAccountHolder", "field.bankAccountHolder", true),
    formatted(
        "routingNumber",
        "field.routingNumber",
        true,
        FieldFormat::Digits { min: 9, max: 9 },
    ),
    secret(
        "accountNumber",
        "field.accountNumber",
        Some(FieldFormat::Digits { min: 4, max: 17 }),
    ),
    text("cardholderName", "field.cardholderName", true),
    secret(
        "cardNumber",
        "field.cardNumber",
        Some(FieldFormat::Digits { min: 13, max: 19 }),
    ),
    formatted("cardExpiry", "field.cardExpiry", true, FieldFormat::CardExpiry),
    secret(
        "cardCvv",
        "field.cardCvv",
        Some(FieldFormat::Digits { min: 3, max: 4 }),
    ),
];

const LOYALTY_DECISION_FIELDS: &[FieldDef] = &[choice(
    "enrollmentDecision",
    "field.enrollmentDecision",
    &[ENROLLMENT_ENROLL, ENROLLMENT_DECLINE],
)];

const LOYALTY_TERMS: &[FieldDef] = &[
    formatted(
        "loyaltyContactEmail",
        "field.loyaltyContactEmail",
        true,
        FieldFormat::Email,
    ),
    flag("loyaltyTermsAccepted", "field.loyaltyTermsAccepted", true),
];

const EXEMPTION_FIELDS: &[FieldDef] = &[
    choice(
        "exemptionStatus",
        "field.exemptionStatus",
        &[EXEMPTION_TAXABLE, EXEMPTION_EXEMPT],
    ),
    text("certificateFile", "field.certificateFile", true),
    flag("categoryResale", "field.categoryResale", false),
    flag("categoryNonprofit", "field.categoryNonprofit", false),
    flag("categoryGovernment", "field.categoryGovernment", false),
    flag("categoryMedical", "field.categoryMedical", false),
];

const CONSENT_FIELDS: &[FieldDef] = &[flag("finalConsent", "field.finalConsent", true)];

const REGISTER_SECTIONS: &[SectionDef] = &[section("account", "section.account", ACCOUNT_FIELDS)];
const CREATE_PASSWORD_SECTIONS: &[SectionDef] =
    &[section("credentials", "section.credentials", NEW_PASSWORD_FIELDS)];
const LOGIN_SECTIONS: &[SectionDef] =
    &[section("credentials", "section.credentials", LOGIN_FIELDS)];
const ABOUT_YOU_SECTIONS: &[SectionDef] = &[
    section("practice", "section.practice", PRACTICE_FIELDS),
    section("billing", "section.billing", BILLING_FIELDS),
    section("shipping", "section.shipping", SHIPPING_FIELDS),
];
const LICENSING_SECTIONS: &[SectionDef] = &[section("license", "section.license", LICENSE_FIELDS)];
const CREDIT_SECTIONS: &[SectionDef] = &[
    section("business", "section.business", BUSINESS_FIELDS),
    section("references", "section.references", REFERENCE_FIELDS),
];
const AUTO_PAY_SECTIONS: &[SectionDef] = &[
    section(
        "enrollment",
        "section.autopayEnrollment",
        AUTO_PAY_ENROLLMENT_FIELDS,
    ),
    SectionDef {
        key: "payment",
        title_key: "section.paymentMethod",
        default_editable: Some(false),
        fields: PAYMENT_FIELDS,
    },
];
const LOYALTY_SECTIONS: &[SectionDef] = &[
    section("decision", "section.loyaltyDecision", LOYALTY_DECISION_FIELDS),
    section("terms", "section.loyaltyTerms", LOYALTY_TERMS),
];
const TAX_SECTIONS: &[SectionDef] = &[section("exemption", "section.exemption", EXEMPTION_FIELDS)];
const REVIEW_SECTIONS: &[SectionDef] = &[section("consent", "section.consent", CONSENT_FIELDS)];

const fn page(route: Route, title_key: &'static str, sections: &'static [SectionDef]) -> PageDef {
    PageDef {
        route,
        title_key,
        default_editable: true,
        sections,
    }
}

static REGISTER: PageDef = page(Route::Register, "page.register.title", REGISTER_SECTIONS);
static CREATE_PASSWORD: PageDef = page(
    Route::CreatePassword,
    "page.createPassword.title",
    CREATE_PASSWORD_SECTIONS,
);
static LOGIN: PageDef = page(Route::Login, "page.login.title", LOGIN_SECTIONS);
static ABOUT_YOU: PageDef = page(
    Route::Step(StepId::AboutYou),
    "step.about.title",
    ABOUT_YOU_SECTIONS,
);
static LICENSING: PageDef = page(
    Route::Step(StepId::Licensing),
    "step.licensing.title",
    LICENSING_SECTIONS,
);
static CREDIT_APPLICATION: PageDef = page(
    Route::Step(StepId::CreditApplication),
    "step.credit.title",
    CREDIT_SECTIONS,
);
static AUTO_PAY: PageDef = page(
    Route::Step(StepId::AutoPay),
    "step.autopay.title",
    AUTO_PAY_SECTIONS,
);
static LOYALTY: PageDef = page(
    Route::Step(StepId::Loyalty),
    "step.loyalty.title",
    LOYALTY_SECTIONS,
);
static TAX_EXEMPTION: PageDef = page(
    Route::Step(StepId::TaxExemption),
    "step.tax.title",
    TAX_SECTIONS,
);
static REVIEW: PageDef = page(
    Route::Step(StepId::Review),
    "step.review.title",
    REVIEW_SECTIONS,
);

/// Definition of the page served at `route`
pub fn page_def(route: Route) -> &'static PageDef {
    match route {
        Route::Register => &REGISTER,
        Route::CreatePassword => &CREATE_PASSWORD,
        Route::Login => &LOGIN,
        Route::Step(StepId::AboutYou) => &ABOUT_YOU,
        Route::Step(StepId::Licensing) => &LICENSING,
        Route::Step(StepId::CreditApplication) => &CREDIT_APPLICATION,
        Route::Step(StepId::AutoPay) => &AUTO_PAY,
        Route::Step(StepId::Loyalty) => &LOYALTY,
        Route::Step(StepId::TaxExemption) => &TAX_EXEMPTION,
        Route::Step(StepId::Review) => &REVIEW,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_route_has_matching_page() {
        for route in Route::all() {
            assert_eq!(page_def(route).route, route);
        }
    }

    #[test]
    fn test_field_names_unique_per_page() {
        for route in Route::all() {
            let page = page_def(route);
            let mut seen = HashSet::new();
            for field in page.fields() {
                assert!(seen.insert(field.name), "{} duplicated on {}", field.name, route);
            }
        }
    }

    #[test]
    fn test_field_groups_exist_on_their_pages() {
        let about = page_def(Route::Step(StepId::AboutYou));
        for name in BILLING_ADDRESS_FIELDS.iter().chain(SHIPPING_ADDRESS_FIELDS.iter()) {
            assert!(about.field(name).is_some(), "{name} missing");
        }
        let autopay = page_def(Route::Step(StepId::AutoPay));
        for name in ACH_FIELDS.iter().chain(CARD_FIELDS.iter()) {
            assert_eq!(autopay.section_of(name).map(|s| s.key), Some("payment"));
        }
        let loyalty = page_def(Route::Step(StepId::Loyalty));
        for name in LOYALTY_TERMS_FIELDS {
            assert_eq!(loyalty.section_of(name).map(|s| s.key), Some("terms"));
        }
        let tax = page_def(Route::Step(StepId::TaxExemption));
        for name in TAX_CATEGORY_FIELDS {
            assert!(tax.field(name).is_some());
        }
    }

    #[test]
    fn test_autopay_payment_section_starts_locked() {
        let page = page_def(Route::Step(StepId::AutoPay));
        let enrollment = page.section("enrollment").unwrap();
        let payment = page.section("payment").unwrap();
        assert!(enrollment.is_editable_by_default(page.default_editable));
        assert!(!payment.is_editable_by_default(page.default_editable));
    }

    #[test]
    fn test_section_of_unknown_field() {
        let page = page_def(Route::Register);
        assert!(page.section_of("nope").is_none());
        assert!(page.field("nope").is_none());
    }
}
