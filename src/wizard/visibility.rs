//! Conditional field disclosure
//!
//! Visibility is a pure function of the current values. Each rule names the
//! page it belongs to, the fields it governs and a predicate over the page's
//! values; no rule looks at the previous visibility, so `resolve` is
//! idempotent.
//!
//! Value changes can also carry side effects on other fields (mirroring the
//! billing address, discarding a payment sub-form when the method switches).
//! Those live in the change-effect table and run through `apply_change`.

use super::catalog::{
    PageDef, ACH_FIELDS, BILLING_ADDRESS_FIELDS, CARD_FIELDS, ENROLLMENT_DECLINE,
    EXEMPTION_EXEMPT, LOYALTY_TERMS_FIELDS, PAYMENT_METHOD_ACH, PAYMENT_METHOD_CARD,
    SHIPPING_ADDRESS_FIELDS,
};
use super::step::{Route, StepId};
use super::values::{FieldValue, FormValues};
use std::collections::HashMap;

/// How a field is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Visibility {
    #[default]
    Shown,
    /// Rendered read-only
    Disabled,
    Hidden,
}

/// Resolved visibility for every field a rule touched; untouched fields are shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilitySet {
    states: HashMap<&'static str, Visibility>,
}

impl VisibilitySet {
    pub fn get(&self, field: &str) -> Visibility {
        self.states.get(field).copied().unwrap_or_default()
    }

    pub fn is_visible(&self, field: &str) -> bool {
        self.get(field) != Visibility::Hidden
    }

    /// Visible and accepting input
    pub fn is_enabled(&self, field: &str) -> bool {
        self.get(field) == Visibility::Shown
    }

    /// Combined state of a group of fields: the least restrictive member wins
    pub fn group<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> Visibility {
        fields
            .into_iter()
            .map(|field| self.get(field))
            .min()
            .unwrap_or_default()
    }

    fn restrict(&mut self, field: &'static str, visibility: Visibility) {
        let entry = self.states.entry(field).or_default();
        *entry = (*entry).max(visibility);
    }
}

struct VisibilityRule {
    page: Route,
    fields: &'static [&'static str],
    when: fn(&FormValues) -> Visibility,
}

const ABOUT_YOU: Route = Route::Step(StepId::AboutYou);
const AUTO_PAY: Route = Route::Step(StepId::AutoPay);
const LOYALTY: Route = Route::Step(StepId::Loyalty);
const TAX_EXEMPTION: Route = Route::Step(StepId::TaxExemption);

const EXEMPTION_DETAIL_FIELDS: [&str; 5] = [
    "certificateFile",
    "categoryResale",
    "categoryNonprofit",
    "categoryGovernment",
    "categoryMedical",
];

const PAYMENT_SECTION_FIELDS: [&str; 8] = [
    "paymentMethodType",
    "bankAccountHolder",
    "routingNumber",
    "accountNumber",
    "cardholderName",
    "cardNumber",
    "cardExpiry",
    "cardCvv",
];

fn shipping_mirrors_billing(values: &FormValues) -> Visibility {
    if values.flag("shippingSameAsBilling") {
        Visibility::Disabled
    } else {
        Visibility::Shown
    }
}

fn ach_selected(values: &FormValues) -> Visibility {
    if values.choice("paymentMethodType") == Some(PAYMENT_METHOD_ACH) {
        Visibility::Shown
    } else {
        Visibility::Hidden
    }
}

fn card_selected(values: &FormValues) -> Visibility {
    if values.choice("paymentMethodType") == Some(PAYMENT_METHOD_CARD) {
        Visibility::Shown
    } else {
        Visibility::Hidden
    }
}

fn auto_pay_enrolled(values: &FormValues) -> Visibility {
    if values.flag("autoPayEnrolled") {
        Visibility::Shown
    } else {
        Visibility::Disabled
    }
}

fn loyalty_declined(values: &FormValues) -> Visibility {
    if values.choice("enrollmentDecision") == Some(ENROLLMENT_DECLINE) {
        Visibility::Disabled
    } else {
        Visibility::Shown
    }
}

fn exemption_claimed(values: &FormValues) -> Visibility {
    if values.choice("exemptionStatus") == Some(EXEMPTION_EXEMPT) {
        Visibility::Shown
    } else {
        Visibility::Hidden
    }
}

static VISIBILITY_RULES: &[VisibilityRule] = &[
    VisibilityRule {
        page: ABOUT_YOU,
        fields: &SHIPPING_ADDRESS_FIELDS,
        when: shipping_mirrors_billing,
    },
    VisibilityRule {
        page: AUTO_PAY,
        fields: &PAYMENT_SECTION_FIELDS,
        when: auto_pay_enrolled,
    },
    VisibilityRule {
        page: AUTO_PAY,
        fields: &ACH_FIELDS,
        when: ach_selected,
    },
    VisibilityRule {
        page: AUTO_PAY,
        fields: &CARD_FIELDS,
        when: card_selected,
    },
    VisibilityRule {
        page: LOYALTY,
        fields: &LOYALTY_TERMS_FIELDS,
        when: loyalty_declined,
    },
    VisibilityRule {
        page: TAX_EXEMPTION,
        fields: &EXEMPTION_DETAIL_FIELDS,
        when: exemption_claimed,
    },
];

/// Resolve which fields of `page` are shown, disabled or hidden
pub fn resolve(page: Route, values: &FormValues) -> VisibilitySet {
    let mut set = VisibilitySet::default();
    for rule in VISIBILITY_RULES.iter().filter(|rule| rule.page == page) {
        let visibility = (rule.when)(values);
        for field in rule.fields {
            set.restrict(*field, visibility);
        }
    }
    set
}

/// Side effect of a value change on other fields of the same page
struct ChangeEffect {
    page: Route,
    triggers: &'static [&'static str],
    run: fn(&mut FormValues, &str),
}

fn sync_shipping_flag(values: &mut FormValues, _trigger: &str) {
    if values.flag("shippingSameAsBilling") {
        values.mirror(&BILLING_ADDRESS_FIELDS, &SHIPPING_ADDRESS_FIELDS);
    } else {
        values.clear_all(SHIPPING_ADDRESS_FIELDS);
    }
}

fn mirror_billing_edit(values: &mut FormValues, _trigger: &str) {
    if values.flag("shippingSameAsBilling") {
        values.mirror(&BILLING_ADDRESS_FIELDS, &SHIPPING_ADDRESS_FIELDS);
    }
}

fn reset_payment_sub_forms(values: &mut FormValues, _trigger: &str) {
    values.clear_all(ACH_FIELDS.iter().chain(CARD_FIELDS.iter()).copied());
}

fn reset_payment_on_opt_out(values: &mut FormValues, _trigger: &str) {
    if !values.flag("autoPayEnrolled") {
        values.clear_all(PAYMENT_SECTION_FIELDS);
    }
}

fn reset_loyalty_terms(values: &mut FormValues, _trigger: &str) {
    values.clear_all(LOYALTY_TERMS_FIELDS);
}

fn reset_exemption_details(values: &mut FormValues, _trigger: &str) {
    if values.choice("exemptionStatus") != Some(EXEMPTION_EXEMPT) {
        values.clear_all(EXEMPTION_DETAIL_FIELDS);
    }
}

static CHANGE_EFFECTS: &[ChangeEffect] = &[
    ChangeEffect {
        page: ABOUT_YOU,
        triggers: &["shippingSameAsBilling"],
        run: sync_shipping_flag,
    },
    ChangeEffect {
        page: ABOUT_YOU,
        triggers: &BILLING_ADDRESS_FIELDS,
        run: mirror_billing_edit,
    },
    ChangeEffect {
        page: AUTO_PAY,
        triggers: &["paymentMethodType"],
        run: reset_payment_sub_forms,
    },
    ChangeEffect {
        page: AUTO_PAY,
        triggers: &["autoPayEnrolled"],
        run: reset_payment_on_opt_out,
    },
    ChangeEffect {
        page: LOYALTY,
        triggers: &["enrollmentDecision"],
        run: reset_loyalty_terms,
    },
    ChangeEffect {
        page: TAX_EXEMPTION,
        triggers: &["exemptionStatus"],
        run: reset_exemption_details,
    },
];

/// Set `field` to `value` and run the page's change effects.
///
/// Effects only fire when the value actually changed. Returns whether it did.
pub fn apply_change(page: Route, values: &mut FormValues, field: &str, value: FieldValue) -> bool {
    let previous = values.set(field, value);
    if previous.as_ref() == values.get(field) {
        return false;
    }
    for effect in CHANGE_EFFECTS
        .iter()
        .filter(|effect| effect.page == page && effect.triggers.iter().any(|t| *t == field))
    {
        (effect.run)(values, field);
    }
    true
}

/// Fields of `page` that are visible and enabled, in declaration order
pub fn active_fields(page: &PageDef, visibility: &VisibilitySet) -> Vec<&'static str> {
    page.fields()
        .filter(|field| visibility.is_enabled(field.name))
        .map(|field| field.name)
        .collect()
}
