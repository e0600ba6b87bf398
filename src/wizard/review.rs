//! Read-only summary of the committed application and the final consent gate

use super::catalog::{page_def, FieldDef, FieldKind};
use super::controller::{Navigator, WizardController};
use super::error::WizardError;
use super::step::StepId;
use super::values::{AggregateApplication, FieldValue, FormValues};
use super::visibility::{self, Visibility};
use crate::i18n::Translator;

const EMPTY_DISPLAY: &str = "-";
const MASK_CHAR: char = '•';
/// Secrets at least this long keep their last four characters visible
const REVEAL_TAIL_MIN_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub field: &'static str,
    pub label: String,
    pub value: String,
}

/// One committed step as shown on the review page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSection {
    pub step: StepId,
    pub title: String,
    pub rows: Vec<ReviewRow>,
}

/// `shippingSameAsBilling` -> `Shipping Same As Billing`
pub fn humanize(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

fn mask_secret(value: &str) -> String {
    let len = value.chars().count();
    if len >= REVEAL_TAIL_MIN_LEN {
        let tail: String = value.chars().skip(len - 4).collect();
        format!("{}{tail}", MASK_CHAR.to_string().repeat(len - 4))
    } else {
        MASK_CHAR.to_string().repeat(len)
    }
}

/// Text shown for a field's value outside its input widget
pub fn display_value(field: &FieldDef, value: &FieldValue, translator: &Translator) -> String {
    match value {
        FieldValue::Flag(true) => "Yes".to_string(),
        FieldValue::Flag(false) => "No".to_string(),
        _ if value.is_blank() => EMPTY_DISPLAY.to_string(),
        FieldValue::Choice(Some(option)) => {
            let key = format!("choice.{option}");
            if translator.contains(&key) {
                translator.t(&key).to_string()
            } else {
                option.clone()
            }
        }
        FieldValue::Text(text) if field.kind == FieldKind::Secret => mask_secret(text.trim()),
        other => other.as_text().trim().to_string(),
    }
}

fn row_label(field: &FieldDef, translator: &Translator) -> String {
    if translator.contains(field.label_key) {
        translator.t(field.label_key).to_string()
    } else {
        humanize(field.name)
    }
}

fn summarize_step(step: StepId, values: &FormValues, translator: &Translator) -> ReviewSection {
    let route = step.route();
    let page = page_def(route);
    let visibility = visibility::resolve(route, values);
    let rows = page
        .fields()
        .filter(|field| match visibility.get(field.name) {
            Visibility::Shown => true,
            // Inapplicable groups (e.g. payment details without AutoPay) are
            // only listed when they still carry a value
            Visibility::Disabled => !values.is_blank(field.name),
            Visibility::Hidden => false,
        })
        .map(|field| ReviewRow {
            field: field.name,
            label: row_label(field, translator),
            value: display_value(field, &field.value_in(values), translator),
        })
        .collect();
    ReviewSection {
        step,
        title: translator.t(step.label_key()).to_string(),
        rows,
    }
}

/// Summary of every committed step except the review itself, in step order
pub fn summarize(aggregate: &AggregateApplication, translator: &Translator) -> Vec<ReviewSection> {
    aggregate
        .iter()
        .filter(|(step, values)| *step != StepId::Review && !values.is_empty())
        .map(|(step, values)| summarize_step(step, values, translator))
        .collect()
}

/// Return to a step from its summary block; its values are untouched
pub fn on_edit(
    wizard: &mut WizardController,
    step: StepId,
    navigator: &mut dyn Navigator,
) -> Result<StepId, WizardError> {
    wizard.jump_to(step, navigator)
}

/// Final submission is allowed only with explicit consent
pub fn ensure_consent(consent_given: bool) -> Result<(), WizardError> {
    if consent_given {
        Ok(())
    } else {
        Err(WizardError::ConsentRequired)
    }
}

/// Plain-text rendering for the clipboard
pub fn to_plain_text(summary: &[ReviewSection]) -> String {
    let mut out = String::new();
    for section in summary {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&section.title);
        out.push('\n');
        for row in &section.rows {
            out.push_str(&format!("  {}: {}\n", row.label, row.value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::step::Route;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct NullNavigator {
        visits: Vec<Route>,
    }

    impl Navigator for NullNavigator {
        fn go_to(&mut self, route: Route) {
            self.visits.push(route);
        }
    }

    fn row(field: &'static str, label: &str, value: &str) -> ReviewRow {
        ReviewRow {
            field,
            label: label.to_string(),
            value: value.to_string(),
        }
    }

    fn licensing_values() -> FormValues {
        let mut values = FormValues::for_page(page_def(StepId::Licensing.route()));
        values.set_text("practitionerName", "Dr. Ada");
        values.set_text("licenseNumber", "L-123");
        values.set_text("licenseState", "IL");
        values.set_text("licenseExpiration", "2030-01-31");
        values
    }

    mod labels {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_camel_case_split() {
            assert_eq!(humanize("shippingSameAsBilling"), "Shipping Same As Billing");
            assert_eq!(humanize("email"), "Email");
            assert_eq!(humanize(""), "");
        }
    }

    mod display {
        use super::*;
        use pretty_assertions::assert_eq;

        fn field(name: &str) -> &'static FieldDef {
            page_def(StepId::AutoPay.route()).field(name).unwrap()
        }

        #[test]
        fn test_flags_become_yes_no() {
            let translator = Translator::default();
            let enrolled = field("autoPayEnrolled");
            assert_eq!(display_value(enrolled, &FieldValue::Flag(true), &translator), "Yes");
            assert_eq!(display_value(enrolled, &FieldValue::Flag(false), &translator), "No");
        }

        #[test]
        fn test_long_secret_keeps_last_four() {
            let translator = Translator::default();
            let value = FieldValue::Text("4111111111111111".to_string());
            assert_eq!(
                display_value(field("cardNumber"), &value, &translator),
                "••••••••••••1111"
            );
        }

        #[test]
        fn test_short_secret_fully_masked() {
            let translator = Translator::default();
            let value = FieldValue::Text("123".to_string());
            assert_eq!(display_value(field("cardCvv"), &value, &translator), "•••");
        }

        #[test]
        fn test_choice_translated_when_known() {
            let translator = Translator::from_json(r#"{"choice": {"ACH": "Bank"}}"#).unwrap();
            let method = field("paymentMethodType");
            let ach = FieldValue::Choice(Some("ACH".to_string()));
            let card = FieldValue::Choice(Some("CreditCard".to_string()));
            assert_eq!(display_value(method, &ach, &translator), "Bank");
            assert_eq!(display_value(method, &card, &translator), "CreditCard");
        }

        #[test]
        fn test_blank_shows_placeholder() {
            let translator = Translator::default();
            let value = FieldValue::Text("  ".to_string());
            assert_eq!(display_value(field("cardholderName"), &value, &translator), "-");
        }
    }

    mod summary {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_rows_in_declaration_order_with_humanized_labels() {
            let mut aggregate = AggregateApplication::default();
            aggregate.commit(StepId::Licensing, licensing_values());

            let summary = summarize(&aggregate, &Translator::default());
            assert_eq!(
                summary,
                vec![ReviewSection {
                    step: StepId::Licensing,
                    title: "step.licensing.title".to_string(),
                    rows: vec![
                        row("practitionerName", "Practitioner Name", "Dr. Ada"),
                        row("licenseNumber", "License Number", "L-123"),
                        row("licenseState", "License State", "IL"),
                        row("licenseExpiration", "License Expiration", "2030-01-31"),
                        row("deaNumber", "Dea Number", "-"),
                    ],
                }]
            );
        }

        #[test]
        fn test_uses_translated_labels() {
            let mut aggregate = AggregateApplication::default();
            aggregate.commit(StepId::Licensing, licensing_values());
            let translator = Translator::embedded().unwrap();

            let summary = summarize(&aggregate, &translator);
            assert_eq!(summary[0].title, "Practitioner Licensing");
            assert_eq!(summary[0].rows[0].label, "Practitioner Name");
        }

        #[test]
        fn test_hidden_fields_skipped() {
            let mut values = FormValues::for_page(page_def(StepId::AutoPay.route()));
            values.set("autoPayEnrolled", FieldValue::Flag(true));
            values.set("paymentMethodType", FieldValue::Choice(Some("ACH".to_string())));
            values.set_text("bankAccountHolder", "Ada");
            values.set_text("routingNumber", "123456789");
            values.set_text("accountNumber", "000123456789");
            let mut aggregate = AggregateApplication::default();
            aggregate.commit(StepId::AutoPay, values);

            let summary = summarize(&aggregate, &Translator::default());
            let fields: Vec<_> = summary[0].rows.iter().map(|r| r.field).collect();
            assert_eq!(
                fields,
                vec![
                    "autoPayEnrolled",
                    "paymentMethodType",
                    "bankAccountHolder",
                    "routingNumber",
                    "accountNumber",
                ]
            );
            assert_eq!(summary[0].rows[4].value, "••••••••6789");
        }

        #[test]
        fn test_declined_autopay_lists_only_enrollment() {
            let values = FormValues::for_page(page_def(StepId::AutoPay.route()));
            let mut aggregate = AggregateApplication::default();
            aggregate.commit(StepId::AutoPay, values);

            let summary = summarize(&aggregate, &Translator::default());
            assert_eq!(summary[0].rows, vec![row("autoPayEnrolled", "Auto Pay Enrolled", "No")]);
        }

        #[test]
        fn test_review_step_and_uncommitted_steps_excluded() {
            let mut aggregate = AggregateApplication::default();
            aggregate.commit(StepId::Licensing, licensing_values());
            aggregate.commit(StepId::Review, FormValues::default());

            let steps: Vec<_> = summarize(&aggregate, &Translator::default())
                .into_iter()
                .map(|s| s.step)
                .collect();
            assert_eq!(steps, vec![StepId::Licensing]);
        }
    }

    mod actions {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_consent_gate() {
            assert_eq!(ensure_consent(false), Err(WizardError::ConsentRequired));
            assert_eq!(ensure_consent(true), Ok(()));
        }

        #[test]
        fn test_edit_jumps_to_visited_step() {
            let mut wizard = WizardController::new();
            let mut nav = NullNavigator::default();
            wizard.advance(Some(StepId::Review), &mut nav).unwrap();

            assert_eq!(on_edit(&mut wizard, StepId::AboutYou, &mut nav), Ok(StepId::AboutYou));
            assert_eq!(nav.visits.last(), Some(&Route::Step(StepId::AboutYou)));
            assert!(wizard.is_completed(StepId::AboutYou));
        }

        #[test]
        fn test_edit_unvisited_step_rejected() {
            let mut wizard = WizardController::new();
            let mut nav = NullNavigator::default();
            assert_eq!(
                on_edit(&mut wizard, StepId::Loyalty, &mut nav),
                Err(WizardError::NotVisited(StepId::Loyalty))
            );
        }

        #[test]
        fn test_plain_text_layout() {
            let summary = vec![
                ReviewSection {
                    step: StepId::AboutYou,
                    title: "About You".to_string(),
                    rows: vec![row("practiceName", "Practice Name", "Acme")],
                },
                ReviewSection {
                    step: StepId::Loyalty,
                    title: "Loyalty".to_string(),
                    rows: vec![row("enrollmentDecision", "Decision", "Decline")],
                },
            ];
            assert_eq!(
                to_plain_text(&summary),
                "About You\n  Practice Name: Acme\n\nLoyalty\n  Decision: Decline\n"
            );
        }
    }
}
